use minilang_ast::{FunctionDecl, Param, Program};
use minilang_errors::Result;

use super::ParserContext;
use crate::tokenizer::Token;

impl ParserContext {
    /// `Program := FunctionDecl*`, consuming until `Eof` (§4.2).
    pub(crate) fn parse_program(&mut self) -> Result<Program> {
        let start = self.token.span;
        let mut declarations = Vec::new();
        while !self.check(&Token::Eof) {
            declarations.push(self.parse_function_decl()?);
        }
        let span = start + self.prev_token.span;
        Ok(Program { declarations, span })
    }

    /// `FunctionDecl := 'fn' IDENT '(' Params? ')' ('->' Type)? FunctionExprBlock`.
    fn parse_function_decl(&mut self) -> Result<FunctionDecl> {
        let start = self.expect(&Token::Fn)?;
        let (name, _) = self.expect_identifier()?;

        self.expect(&Token::LeftParen)?;
        let (params, _) = self.parse_comma_list(&Token::RightParen, Self::parse_parameter)?;

        let return_type = if self.eat(&Token::Arrow) { Some(self.parse_type()?) } else { None };

        let body = self.parse_function_expression_block()?;
        let span = start + body.span;
        Ok(FunctionDecl { name, params, return_type, body, span })
    }

    /// `Param := 'mut'? IDENT ':' Type`.
    fn parse_parameter(&mut self) -> Result<Param> {
        let start = self.token.span;
        let mutable = self.eat(&Token::Mut);
        let (name, _) = self.expect_identifier()?;
        self.expect(&Token::Colon)?;
        let type_ = self.parse_type()?;
        Ok(Param { mutable, name, type_, span: start + self.prev_token.span })
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse_source;
    use minilang_ast::Type;

    #[test]
    fn parses_function_with_params_and_return_type() {
        let program = parse_source("fn add(a: i32, b: i32) -> i32 { a + b }").unwrap();
        assert_eq!(program.declarations.len(), 1);
        let f = &program.declarations[0];
        assert_eq!(f.name.as_str(), "add");
        assert_eq!(f.params.len(), 2);
        assert_eq!(f.return_type, Some(Type::I32));
    }

    #[test]
    fn parses_void_function_with_no_params() {
        let program = parse_source("fn main() { let x: i32 = 1; }").unwrap();
        let f = &program.declarations[0];
        assert_eq!(f.params.len(), 0);
        assert_eq!(f.return_type, None);
    }

    #[test]
    fn parses_multiple_declarations() {
        let program = parse_source("fn a() {} fn b() {}").unwrap();
        assert_eq!(program.declarations.len(), 2);
    }

    #[test]
    fn mutable_parameter() {
        let program = parse_source("fn f(mut a: i32) {}").unwrap();
        assert!(program.declarations[0].params[0].mutable);
    }
}
