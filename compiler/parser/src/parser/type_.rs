use minilang_ast::{ArrayType, ReferenceType, Type, TupleType};
use minilang_errors::{ParseError, Result};

use super::ParserContext;
use crate::tokenizer::Token;

impl ParserContext {
    /// `Type := 'i32' | '&' 'mut'? Type | '[' Type ';' INT ']' | '(' TupleTypeTail ')'` (§4.2).
    pub(crate) fn parse_type(&mut self) -> Result<Type> {
        if self.eat(&Token::Ampersand) {
            let mutable = self.eat(&Token::Mut);
            let inner = self.parse_type()?;
            return Ok(Type::Reference(ReferenceType { mutable, inner: Box::new(inner) }));
        }

        if self.eat(&Token::LeftSquare) {
            let inner = self.parse_type()?;
            self.expect(&Token::Semicolon)?;
            let size = self.expect_int_literal()?;
            self.expect(&Token::RightSquare)?;
            return Ok(Type::Array(ArrayType { inner: Box::new(inner), size }));
        }

        if self.eat(&Token::LeftParen) {
            return self.parse_tuple_type_tail();
        }

        if self.eat(&Token::I32) {
            return Ok(Type::I32);
        }

        self.unexpected("a type")
    }

    /// `TupleTypeTail` after the opening `(` has already been consumed:
    /// `')'` for the unit type, or one-or-more comma-separated types with a
    /// trailing comma required for a single element (§4.2's explicitly
    /// called-out edge case — `(T)` alone is never a tuple).
    fn parse_tuple_type_tail(&mut self) -> Result<Type> {
        if self.eat(&Token::RightParen) {
            return Ok(Type::UNIT);
        }

        let span = self.token.span;
        let first = self.parse_type()?;
        if !self.eat(&Token::Comma) {
            return Err(ParseError::SingletonTupleType { span }.into());
        }

        let mut elements = vec![first];
        while !self.check(&Token::RightParen) {
            elements.push(self.parse_type()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RightParen)?;
        Ok(Type::Tuple(TupleType { elements }))
    }

    fn expect_int_literal(&mut self) -> Result<u32> {
        if let Token::Int(value) = self.token.token {
            self.bump();
            Ok(value)
        } else {
            self.unexpected("an integer literal")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn parse_type_str(s: &str) -> Result<Type> {
        let mut ctx = ParserContext::new(tokenize(s).unwrap());
        ctx.parse_type()
    }

    #[test]
    fn primitive_and_reference_types() {
        assert_eq!(parse_type_str("i32").unwrap(), Type::I32);
        assert_eq!(
            parse_type_str("&mut i32").unwrap(),
            Type::Reference(ReferenceType { mutable: true, inner: Box::new(Type::I32) })
        );
        assert_eq!(
            parse_type_str("&i32").unwrap(),
            Type::Reference(ReferenceType { mutable: false, inner: Box::new(Type::I32) })
        );
    }

    #[test]
    fn array_type() {
        assert_eq!(
            parse_type_str("[i32; 3]").unwrap(),
            Type::Array(ArrayType { inner: Box::new(Type::I32), size: 3 })
        );
    }

    #[test]
    fn unit_and_multi_element_tuple_types() {
        assert_eq!(parse_type_str("()").unwrap(), Type::UNIT);
        assert_eq!(
            parse_type_str("(i32, i32)").unwrap(),
            Type::Tuple(TupleType { elements: vec![Type::I32, Type::I32] })
        );
    }

    #[test]
    fn single_element_tuple_requires_trailing_comma() {
        assert!(parse_type_str("(i32)").is_err());
        assert_eq!(
            parse_type_str("(i32,)").unwrap(),
            Type::Tuple(TupleType { elements: vec![Type::I32] })
        );
    }
}
