use minilang_ast::{
    ArrayLiteral, BinaryExpression, BinaryOperation, BlockElement, CallExpression, DerefExpr,
    Expression, FunctionExprBlock, IfExpr, IndexExpr, LoopExpr, RefExpr, TupleAccess, TupleIndex,
    TupleLiteral,
};
use minilang_errors::{ParseError, Result};
use minilang_span::Span;

use super::ParserContext;
use crate::tokenizer::Token;

impl ParserContext {
    /// `Expression := IfExpr | LoopExpr | Comparison` (§4.2). `if`/`loop` are
    /// only ever valid in this top-level position — arithmetic operands go
    /// straight through [`Self::parse_comparison`] down to
    /// [`Self::parse_factor`], which rejects any keyword as a primary.
    pub(crate) fn parse_expression(&mut self) -> Result<Expression> {
        match self.token.token {
            Token::If => self.parse_if_expression(),
            Token::Loop => self.parse_loop_expr(),
            _ => self.parse_comparison(),
        }
    }

    /// `'if' Comparison FunctionExprBlock 'else' (IfExpr | FunctionExprBlock)`.
    /// Unlike the statement form, `else` is mandatory — both arms must agree
    /// on the value type (checked later, not here). An `else if` chain is
    /// represented by wrapping the nested `IfExpr` as the sole element of a
    /// one-element `FunctionExprBlock`, since [`IfExpr::otherwise`] is always
    /// a block, never another `IfExpr` directly.
    pub(crate) fn parse_if_expression(&mut self) -> Result<Expression> {
        let start = self.expect(&Token::If)?;
        let condition = Box::new(self.parse_comparison()?);
        let then = Box::new(self.parse_function_expression_block()?);
        self.expect(&Token::Else)?;
        let otherwise = if self.check(&Token::If) {
            let nested_start = self.token.span;
            let nested = self.parse_if_expression()?;
            let span = nested_start + nested.span();
            Box::new(FunctionExprBlock { elements: vec![BlockElement::Expr(nested)], span })
        } else {
            Box::new(self.parse_function_expression_block()?)
        };
        let span = start + otherwise.span;
        Ok(Expression::If(IfExpr { condition, then, otherwise, span }))
    }

    fn parse_loop_expr(&mut self) -> Result<Expression> {
        let start = self.expect(&Token::Loop)?;
        let body = self.parse_function_expression_block()?;
        let span = start + body.span;
        Ok(Expression::Loop(LoopExpr { body, span }))
    }

    /// `Comparison := Additive (('<'|'<='|'>'|'>='|'=='|'!=') Additive)*`,
    /// left-associative.
    pub(crate) fn parse_comparison(&mut self) -> Result<Expression> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.token.token {
                Token::Lt => BinaryOperation::Lt,
                Token::Le => BinaryOperation::Le,
                Token::Gt => BinaryOperation::Gt,
                Token::Ge => BinaryOperation::Ge,
                Token::EqEq => BinaryOperation::Eq,
                Token::Ne => BinaryOperation::Ne,
                _ => break,
            };
            self.bump();
            let right = self.parse_additive()?;
            let span = left.span() + right.span();
            left = Expression::Binary(BinaryExpression {
                operator: op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            });
        }
        Ok(left)
    }

    /// `Additive := Multiplicative (('+'|'-') Multiplicative)*`.
    fn parse_additive(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.token.token {
                Token::Plus => BinaryOperation::Add,
                Token::Minus => BinaryOperation::Sub,
                _ => break,
            };
            self.bump();
            let right = self.parse_multiplicative()?;
            let span = left.span() + right.span();
            left = Expression::Binary(BinaryExpression {
                operator: op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            });
        }
        Ok(left)
    }

    /// `Multiplicative := Unary (('*'|'/') Unary)*`.
    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.token.token {
                Token::Star => BinaryOperation::Mul,
                Token::Slash => BinaryOperation::Div,
                _ => break,
            };
            self.bump();
            let right = self.parse_unary()?;
            let span = left.span() + right.span();
            left = Expression::Binary(BinaryExpression {
                operator: op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            });
        }
        Ok(left)
    }

    /// `Unary := '*' Unary | '&' 'mut'? Unary | Postfix`.
    pub(crate) fn parse_unary(&mut self) -> Result<Expression> {
        if self.eat(&Token::Star) {
            let start = self.prev_token.span;
            let operand = self.parse_unary()?;
            let span = start + operand.span();
            return Ok(Expression::Deref(DerefExpr { operand: Box::new(operand), span }));
        }
        if self.eat(&Token::Ampersand) {
            let start = self.prev_token.span;
            let mutable = self.eat(&Token::Mut);
            let operand = self.parse_unary()?;
            let span = start + operand.span();
            return Ok(Expression::Ref(RefExpr { mutable, operand: Box::new(operand), span }));
        }
        self.parse_postfix()
    }

    /// `Postfix := Factor ('[' Expr ']' | '.' (INT|IDENT))*`. Both postfix
    /// forms chain freely (`a[0].1`, `a.0.1`, ...), following the grammar's
    /// literal `*`-repetition rather than the single-dot-access limit of the
    /// original reference implementation's parser.
    fn parse_postfix(&mut self) -> Result<Expression> {
        let mut expr = self.parse_factor()?;
        loop {
            if self.eat(&Token::LeftSquare) {
                let index = self.parse_expression()?;
                let end = self.expect(&Token::RightSquare)?;
                let span = expr.span() + end;
                expr = Expression::Index(IndexExpr {
                    target: Box::new(expr),
                    index: Box::new(index),
                    span,
                });
                continue;
            }
            if self.eat(&Token::Dot) {
                let (index, idx_span) = self.parse_tuple_index()?;
                let span = expr.span() + idx_span;
                expr =
                    Expression::TupleAccess(TupleAccess { target: Box::new(expr), index, span });
                continue;
            }
            break;
        }
        Ok(expr)
    }

    /// Entry point used by the statement-level assignment-target lookaheads
    /// (`a.0 = ...`, `a[0] = ...`), which parse the same postfix-chain grammar
    /// but stop before consuming the trailing `=`.
    pub(crate) fn parse_postfix_primary(&mut self) -> Result<Expression> {
        self.parse_postfix()
    }

    fn parse_tuple_index(&mut self) -> Result<(TupleIndex, Span)> {
        match self.token.token.clone() {
            Token::Int(n) => {
                let span = self.token.span;
                self.bump();
                Ok((TupleIndex::Int(n), span))
            }
            Token::Ident(name) => {
                let span = self.token.span;
                self.bump();
                Ok((TupleIndex::Name(name), span))
            }
            _ => self.unexpected("an integer or field name"),
        }
    }

    /// `Factor := Block | ArrayLiteral | '(' TupleOrGroup ')' | INT | IDENT
    /// ('(' Args ')')?`. A bare keyword is always rejected here — this is
    /// what keeps `if`/`loop` out of arithmetic operand position.
    fn parse_factor(&mut self) -> Result<Expression> {
        if self.check(&Token::LeftCurly) {
            let block = self.parse_function_expression_block()?;
            return Ok(Expression::Block(block));
        }
        if self.check(&Token::LeftSquare) {
            return self.parse_array_literal();
        }
        if self.check(&Token::LeftParen) {
            return self.parse_paren_expr();
        }
        if let Token::Int(value) = self.token.token {
            let span = self.token.span;
            self.bump();
            return Ok(Expression::Literal { value: value as i32, span });
        }
        if matches!(self.token.token, Token::Ident(_)) {
            return self.parse_identifier_or_call();
        }
        if self.token.token.is_keyword() {
            let span = self.token.span;
            return Err(
                ParseError::KeywordInExpression { keyword: self.token.token.to_string(), span }
                    .into(),
            );
        }
        self.unexpected("an expression")
    }

    /// `'[' (Expr (',' Expr)* ','?)? ']'`, empty array allowed.
    fn parse_array_literal(&mut self) -> Result<Expression> {
        let start = self.expect(&Token::LeftSquare)?;
        let (elements, end) =
            self.parse_comma_list(&Token::RightSquare, Self::parse_expression)?;
        Ok(Expression::ArrayLiteral(ArrayLiteral { elements, span: start + end }))
    }

    /// `'(' ')'` is the unit tuple; `'(' Expr ')'` (no comma) is a plain
    /// grouped expression; `'(' Expr (',' Expr)* ','? ')'` is a tuple literal.
    fn parse_paren_expr(&mut self) -> Result<Expression> {
        let start = self.expect(&Token::LeftParen)?;
        if self.eat(&Token::RightParen) {
            let span = start + self.prev_token.span;
            return Ok(Expression::TupleLiteral(TupleLiteral { elements: vec![], span }));
        }

        let first = self.parse_expression()?;
        if !self.eat(&Token::Comma) {
            self.expect(&Token::RightParen)?;
            return Ok(first);
        }

        let mut elements = vec![first];
        while !self.check(&Token::RightParen) {
            elements.push(self.parse_expression()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        let end = self.expect(&Token::RightParen)?;
        Ok(Expression::TupleLiteral(TupleLiteral { elements, span: start + end }))
    }

    fn parse_identifier_or_call(&mut self) -> Result<Expression> {
        let (name, span) = self.expect_identifier()?;
        if self.eat(&Token::LeftParen) {
            let (arguments, end) =
                self.parse_comma_list(&Token::RightParen, Self::parse_expression)?;
            return Ok(Expression::Call(CallExpression { callee: name, arguments, span: span + end }));
        }
        Ok(Expression::Identifier { name, span })
    }
}

#[cfg(test)]
mod tests {
    use super::super::ParserContext;
    use crate::tokenizer::tokenize;
    use minilang_ast::{BinaryOperation, Expression, TupleIndex};

    fn parse_expr(s: &str) -> Expression {
        let mut ctx = ParserContext::new(tokenize(s).unwrap());
        ctx.parse_expression().unwrap()
    }

    #[test]
    fn precedence_multiplies_before_adding() {
        let expr = parse_expr("1 + 2 * 3");
        match expr {
            Expression::Binary(b) => {
                assert_eq!(b.operator, BinaryOperation::Add);
                assert!(matches!(*b.right, Expression::Binary(ref r) if r.operator == BinaryOperation::Mul));
            }
            other => panic!("expected binary expression, got {other:?}"),
        }
    }

    #[test]
    fn chained_postfix_index_and_tuple_access() {
        let expr = parse_expr("a[0].1");
        match expr {
            Expression::TupleAccess(t) => {
                assert_eq!(t.index, TupleIndex::Int(1));
                assert!(matches!(*t.target, Expression::Index(_)));
            }
            other => panic!("expected tuple access, got {other:?}"),
        }
    }

    #[test]
    fn chained_tuple_access_dot_dot() {
        let expr = parse_expr("a.0.1");
        match expr {
            Expression::TupleAccess(outer) => {
                assert_eq!(outer.index, TupleIndex::Int(1));
                assert!(matches!(*outer.target, Expression::TupleAccess(_)));
            }
            other => panic!("expected tuple access, got {other:?}"),
        }
    }

    #[test]
    fn grouped_expression_is_not_a_tuple() {
        let expr = parse_expr("(1 + 2) * 3");
        match expr {
            Expression::Binary(b) => assert_eq!(b.operator, BinaryOperation::Mul),
            other => panic!("expected binary expression, got {other:?}"),
        }
    }

    #[test]
    fn tuple_literal_requires_a_comma() {
        assert!(matches!(parse_expr("(1, 2)"), Expression::TupleLiteral(_)));
        assert!(matches!(parse_expr("()"), Expression::TupleLiteral(t) if t.elements.is_empty()));
    }

    #[test]
    fn ref_and_deref() {
        assert!(matches!(parse_expr("&mut a"), Expression::Ref(r) if r.mutable));
        assert!(matches!(parse_expr("&a"), Expression::Ref(r) if !r.mutable));
        assert!(matches!(parse_expr("*a"), Expression::Deref(_)));
    }

    #[test]
    fn call_expression() {
        match parse_expr("add(1, 2)") {
            Expression::Call(c) => {
                assert_eq!(c.callee.as_str(), "add");
                assert_eq!(c.arguments.len(), 2);
            }
            other => panic!("expected call expression, got {other:?}"),
        }
    }

    #[test]
    fn keyword_is_rejected_as_a_primary_expression() {
        let mut ctx = ParserContext::new(tokenize("1 + loop { }").unwrap());
        assert!(ctx.parse_expression().is_err());
    }

    #[test]
    fn if_expression_requires_an_else_branch() {
        let mut ctx = ParserContext::new(tokenize("if a { 1 }").unwrap());
        assert!(ctx.parse_expression().is_err());
    }

    #[test]
    fn else_if_chain_nests_as_a_single_element_block() {
        let expr = parse_expr("if a { 1 } else if b { 2 } else { 3 }");
        match expr {
            Expression::If(if_expr) => {
                assert_eq!(if_expr.otherwise.elements.len(), 1);
                assert!(matches!(
                    if_expr.otherwise.elements[0],
                    minilang_ast::BlockElement::Expr(Expression::If(_))
                ));
            }
            other => panic!("expected if expression, got {other:?}"),
        }
    }
}
