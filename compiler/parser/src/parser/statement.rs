use minilang_ast::{
    Assignment, Block, BlockElement, BreakStmt, ContinueStmt, ElseBranch, EmptyStmt, Expression,
    ExprStmt, ForStmt, FunctionExprBlock, IfStmt, LoopStmt, ReturnStmt, Statement, VarDecl,
    WhileStmt,
};
use minilang_errors::Result;

use super::ParserContext;
use crate::tokenizer::Token;

impl ParserContext {
    /// `Block := '{' Statement* '}'`, a pure statement list with no value
    /// (the body of `if`/`while`/`for`/`loop` used as *statements*, §4.2).
    pub(crate) fn parse_block(&mut self) -> Result<Block> {
        let start = self.expect(&Token::LeftCurly)?;
        let mut statements = Vec::new();
        while !self.check(&Token::RightCurly) {
            statements.push(self.parse_statement()?);
        }
        let end = self.expect(&Token::RightCurly)?;
        Ok(Block { statements, span: start + end })
    }

    /// Dispatches on the current token using the same lookahead order as the
    /// reference implementation's `parse_statement`: a 4-token tuple-access
    /// assignment lookahead first (nothing else starts with `IDENT . INT =`),
    /// then keyword-led constructs, then array-index and plain-identifier
    /// assignment lookaheads, then deref-assignment, then the empty statement,
    /// finally falling back to a bare expression statement.
    pub(crate) fn parse_statement(&mut self) -> Result<Statement> {
        if self.looks_like_tuple_access_assignment() {
            return self.parse_tuple_access_assignment();
        }

        match &self.token.token {
            Token::Break => return self.parse_break_stmt(),
            Token::Continue => return self.parse_continue_stmt(),
            Token::Return => return self.parse_return_stmt(),
            Token::Let => return self.parse_variable_decl(),
            Token::If => return Ok(Statement::If(self.parse_if()?)),
            Token::While => return Ok(Statement::While(self.parse_while()?)),
            Token::For => return Ok(Statement::For(self.parse_for()?)),
            Token::Loop => return Ok(Statement::Loop(self.parse_loop_stmt()?)),
            Token::Semicolon => {
                let span = self.token.span;
                self.bump();
                return Ok(Statement::Empty(EmptyStmt { span }));
            }
            _ => {}
        }

        if self.looks_like_index_assignment() {
            return self.parse_index_assignment();
        }
        if self.looks_like_identifier_assignment() {
            return self.parse_identifier_assignment();
        }
        if self.looks_like_deref_assignment() {
            return self.parse_deref_assignment();
        }

        // A nested `{ ... }` is always its own statement, never wrapped.
        if self.check(&Token::LeftCurly) {
            return Ok(Statement::Block(self.parse_block()?));
        }

        let start = self.token.span;
        let expr = self.parse_expression()?;
        let end = self.expect(&Token::Semicolon)?;
        Ok(Statement::ExprStmt(ExprStmt { expr, span: start + end }))
    }

    fn looks_like_tuple_access_assignment(&self) -> bool {
        matches!(self.token.token, Token::Ident(_))
            && self.look_ahead(1, |t| *t == Token::Dot)
            && self.look_ahead(2, |t| matches!(t, Token::Int(_)))
            && self.look_ahead(3, |t| *t == Token::Assign)
    }

    fn parse_tuple_access_assignment(&mut self) -> Result<Statement> {
        let start = self.token.span;
        let target = self.parse_postfix_primary()?;
        self.expect(&Token::Assign)?;
        let value = self.parse_expression()?;
        let span_end = self.expect(&Token::Semicolon)?;
        Ok(Statement::Assignment(Assignment { target, value, span: start + span_end }))
    }

    fn looks_like_index_assignment(&self) -> bool {
        matches!(self.token.token, Token::Ident(_))
            && self.look_ahead(1, |t| *t == Token::LeftSquare)
    }

    fn parse_index_assignment(&mut self) -> Result<Statement> {
        let start = self.token.span;
        let target = self.parse_postfix_primary()?;
        self.expect(&Token::Assign)?;
        let value = self.parse_expression()?;
        let span_end = self.expect(&Token::Semicolon)?;
        Ok(Statement::Assignment(Assignment { target, value, span: start + span_end }))
    }

    fn looks_like_identifier_assignment(&self) -> bool {
        matches!(self.token.token, Token::Ident(_)) && self.look_ahead(1, |t| *t == Token::Assign)
    }

    fn parse_identifier_assignment(&mut self) -> Result<Statement> {
        let start = self.token.span;
        let (name, name_span) = self.expect_identifier()?;
        self.expect(&Token::Assign)?;
        let value = self.parse_expression()?;
        let span_end = self.expect(&Token::Semicolon)?;
        Ok(Statement::Assignment(Assignment {
            target: Expression::Identifier { name, span: name_span },
            value,
            span: start + span_end,
        }))
    }

    fn looks_like_deref_assignment(&self) -> bool {
        self.check(&Token::Star) && self.look_ahead(2, |t| *t == Token::Assign)
    }

    fn parse_deref_assignment(&mut self) -> Result<Statement> {
        let start = self.token.span;
        let target = self.parse_unary()?;
        self.expect(&Token::Assign)?;
        let value = self.parse_expression()?;
        let span_end = self.expect(&Token::Semicolon)?;
        Ok(Statement::Assignment(Assignment { target, value, span: start + span_end }))
    }

    /// `'let' 'mut'? IDENT (':' Type)? ('=' Expr)? ';'`.
    fn parse_variable_decl(&mut self) -> Result<Statement> {
        let start = self.expect(&Token::Let)?;
        let mutable = self.eat(&Token::Mut);
        let (name, _) = self.expect_identifier()?;
        let var_type = if self.eat(&Token::Colon) { Some(self.parse_type()?) } else { None };
        let init = if self.eat(&Token::Assign) { Some(self.parse_expression()?) } else { None };
        let end = self.expect(&Token::Semicolon)?;
        Ok(Statement::VarDecl(VarDecl { mutable, name, var_type, init, span: start + end }))
    }

    fn parse_break_stmt(&mut self) -> Result<Statement> {
        let start = self.expect(&Token::Break)?;
        let expression =
            if self.check(&Token::Semicolon) { None } else { Some(self.parse_expression()?) };
        let end = self.expect(&Token::Semicolon)?;
        Ok(Statement::Break(BreakStmt { expression, span: start + end }))
    }

    fn parse_continue_stmt(&mut self) -> Result<Statement> {
        let start = self.expect(&Token::Continue)?;
        let end = self.expect(&Token::Semicolon)?;
        Ok(Statement::Continue(ContinueStmt { span: start + end }))
    }

    fn parse_return_stmt(&mut self) -> Result<Statement> {
        let start = self.expect(&Token::Return)?;
        let expression =
            if self.check(&Token::Semicolon) { None } else { Some(self.parse_expression()?) };
        let end = self.expect(&Token::Semicolon)?;
        Ok(Statement::Return(ReturnStmt { expression, span: start + end }))
    }

    /// `'if' Expr Block ('else' (If | Block))?` used as a statement (§4.2);
    /// `else` is optional here, unlike the expression form.
    pub(crate) fn parse_if(&mut self) -> Result<IfStmt> {
        let start = self.expect(&Token::If)?;
        let condition = self.parse_comparison()?;
        let then = self.parse_block()?;
        let (otherwise, end) = if self.eat(&Token::Else) {
            if self.check(&Token::If) {
                let nested = self.parse_if()?;
                let span = nested.span;
                (Some(Box::new(ElseBranch::If(nested))), span)
            } else {
                let block = self.parse_block()?;
                let span = block.span;
                (Some(Box::new(ElseBranch::Block(block))), span)
            }
        } else {
            (None, then.span)
        };
        Ok(IfStmt { condition, then, otherwise, span: start + end })
    }

    fn parse_while(&mut self) -> Result<WhileStmt> {
        let start = self.expect(&Token::While)?;
        let condition = self.parse_comparison()?;
        let body = self.parse_block()?;
        Ok(WhileStmt { span: start + body.span, condition, body })
    }

    /// `'for' 'mut'? IDENT (':' Type)? 'in' Expr '..' Expr Block`.
    fn parse_for(&mut self) -> Result<ForStmt> {
        let start = self.expect(&Token::For)?;
        let mutable = self.eat(&Token::Mut);
        let (var, _) = self.expect_identifier()?;
        let var_type = if self.eat(&Token::Colon) { Some(self.parse_type()?) } else { None };
        self.expect(&Token::In)?;
        let range_start = self.parse_comparison()?;
        self.expect(&Token::DotDot)?;
        let end_expr = self.parse_comparison()?;
        let body = self.parse_block()?;
        Ok(ForStmt {
            mutable,
            var,
            var_type,
            start: range_start,
            end: end_expr,
            span: start + body.span,
            body,
        })
    }

    fn parse_loop_stmt(&mut self) -> Result<LoopStmt> {
        let start = self.expect(&Token::Loop)?;
        let body = self.parse_block()?;
        Ok(LoopStmt { span: start + body.span, body })
    }

    /// `FunctionExprBlock := '{' BlockElement* '}'`, a value-bearing block: a
    /// function body, or the arms of an `IfExpr`/body of a `LoopExpr` (§4.2).
    /// Every element but a trailing bare expression behaves like a statement;
    /// a nested bare `{ ... }` is always kept as its own [`BlockElement::Expr`]
    /// regardless of position, matching the reference parser's handling of
    /// inner blocks.
    pub(crate) fn parse_function_expression_block(&mut self) -> Result<FunctionExprBlock> {
        let start = self.expect(&Token::LeftCurly)?;
        let mut elements = Vec::new();
        while !self.check(&Token::RightCurly) {
            elements.push(self.parse_block_element()?);
        }
        let end = self.expect(&Token::RightCurly)?;
        Ok(FunctionExprBlock { elements, span: start + end })
    }

    fn parse_block_element(&mut self) -> Result<BlockElement> {
        if self.check(&Token::Semicolon) {
            let span = self.token.span;
            self.bump();
            return Ok(BlockElement::Stmt(Statement::Empty(EmptyStmt { span })));
        }

        match &self.token.token {
            Token::Let => return Ok(BlockElement::Stmt(self.parse_variable_decl()?)),
            Token::If => return Ok(BlockElement::Stmt(Statement::If(self.parse_if()?))),
            Token::While => return Ok(BlockElement::Stmt(Statement::While(self.parse_while()?))),
            Token::For => return Ok(BlockElement::Stmt(Statement::For(self.parse_for()?))),
            Token::Loop => return Ok(BlockElement::Stmt(Statement::Loop(self.parse_loop_stmt()?))),
            Token::Return => return Ok(BlockElement::Stmt(self.parse_return_stmt()?)),
            Token::Break => return Ok(BlockElement::Stmt(self.parse_break_stmt()?)),
            Token::Continue => return Ok(BlockElement::Stmt(self.parse_continue_stmt()?)),
            _ => {}
        }

        if self.looks_like_tuple_access_assignment() {
            return Ok(BlockElement::Stmt(self.parse_tuple_access_assignment()?));
        }
        if self.looks_like_index_assignment() {
            return Ok(BlockElement::Stmt(self.parse_index_assignment()?));
        }
        if self.looks_like_identifier_assignment() {
            return Ok(BlockElement::Stmt(self.parse_identifier_assignment()?));
        }
        if self.looks_like_deref_assignment() {
            return Ok(BlockElement::Stmt(self.parse_deref_assignment()?));
        }

        // A nested bare block is always its own element, whether or not a
        // value follows it.
        if self.check(&Token::LeftCurly) {
            let block = self.parse_function_expression_block()?;
            return Ok(BlockElement::Expr(Expression::Block(block)));
        }

        let start = self.token.span;
        let expr = self.parse_expression()?;
        if self.eat(&Token::Semicolon) {
            let span = start + self.prev_token.span;
            Ok(BlockElement::Stmt(Statement::ExprStmt(ExprStmt { expr, span })))
        } else {
            Ok(BlockElement::Expr(expr))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse_source;
    use minilang_ast::{Expression, Statement};

    fn first_function_body_elements(
        source: &str,
    ) -> Vec<minilang_ast::BlockElement> {
        parse_source(source).unwrap().declarations.remove(0).body.elements
    }

    #[test]
    fn var_decl_with_type_and_init() {
        let elements = first_function_body_elements("fn f() { let mut a: i32 = 1; }");
        assert!(matches!(
            &elements[0],
            minilang_ast::BlockElement::Stmt(Statement::VarDecl(v))
                if v.mutable && v.name.as_str() == "a"
        ));
    }

    #[test]
    fn identifier_assignment() {
        let elements = first_function_body_elements("fn f() { let mut a: i32 = 1; a = 2; }");
        assert!(matches!(&elements[1], minilang_ast::BlockElement::Stmt(Statement::Assignment(_))));
    }

    #[test]
    fn tuple_access_assignment() {
        let elements =
            first_function_body_elements("fn f() { let mut t: (i32, i32) = (1, 2,); t.0 = 9; }");
        match &elements[1] {
            minilang_ast::BlockElement::Stmt(Statement::Assignment(a)) => {
                assert!(matches!(a.target, Expression::TupleAccess(_)));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn index_assignment() {
        let elements =
            first_function_body_elements("fn f() { let mut a: [i32; 2] = [1, 2]; a[0] = 9; }");
        match &elements[1] {
            minilang_ast::BlockElement::Stmt(Statement::Assignment(a)) => {
                assert!(matches!(a.target, Expression::Index(_)));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn deref_assignment() {
        let elements =
            first_function_body_elements("fn f() { let mut a: i32 = 1; let b = &mut a; *b = 2; }");
        match &elements[2] {
            minilang_ast::BlockElement::Stmt(Statement::Assignment(a)) => {
                assert!(matches!(a.target, Expression::Deref(_)));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn deref_used_as_a_bare_expression_statement_is_not_an_assignment() {
        let elements =
            first_function_body_elements("fn f() { let mut a: i32 = 1; let b = &a; *b; }");
        match &elements[2] {
            minilang_ast::BlockElement::Stmt(Statement::ExprStmt(e)) => {
                assert!(matches!(e.expr, Expression::Deref(_)));
            }
            other => panic!("expected a deref expression statement, got {other:?}"),
        }
    }

    #[test]
    fn deref_followed_by_an_operator_is_not_an_assignment() {
        let elements =
            first_function_body_elements("fn f() { let mut a: i32 = 1; let b = &a; *b + 1; }");
        assert!(matches!(
            &elements[2],
            minilang_ast::BlockElement::Stmt(Statement::ExprStmt(_))
        ));
    }

    #[test]
    fn trailing_expression_is_the_blocks_value() {
        let elements = first_function_body_elements("fn f() -> i32 { let a: i32 = 1; a }");
        assert!(matches!(elements.last().unwrap(), minilang_ast::BlockElement::Expr(_)));
    }

    #[test]
    fn else_if_chain() {
        let elements = first_function_body_elements(
            "fn f() { if 1 { } else if 2 { } else { } }",
        );
        match &elements[0] {
            minilang_ast::BlockElement::Stmt(Statement::If(s)) => {
                assert!(matches!(
                    s.otherwise.as_deref(),
                    Some(minilang_ast::ElseBranch::If(_))
                ));
            }
            other => panic!("expected if statement, got {other:?}"),
        }
    }

    #[test]
    fn nested_bare_block_is_its_own_element() {
        let elements = first_function_body_elements("fn f() { { 1; } 2 }");
        assert_eq!(elements.len(), 2);
        assert!(matches!(&elements[0], minilang_ast::BlockElement::Expr(Expression::Block(_))));
    }
}
