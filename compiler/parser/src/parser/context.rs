use minilang_errors::{ParseError, Result};
use minilang_span::{Span, Symbol};

use crate::tokenizer::{SpannedToken, Token};

/// Owns the full token vector and a one-token cursor (`token`/`prev_token`).
/// Grounded on `leo-parser`'s `ParserContext`: tokens are reversed once up
/// front so advancing is an O(1) pop from the back, and `token`/`prev_token`
/// are primed by one initial [`ParserContext::bump`] call.
pub struct ParserContext {
    tokens: Vec<SpannedToken>,
    pub(crate) token: SpannedToken,
    pub(crate) prev_token: SpannedToken,
}

impl ParserContext {
    pub fn new(mut tokens: Vec<SpannedToken>) -> Self {
        tokens.reverse();
        let mut context =
            Self { tokens, token: SpannedToken::dummy(), prev_token: SpannedToken::dummy() };
        context.bump();
        context
    }

    /// Advances the cursor by one token, pulling from the back of the
    /// (reversed) token vector once it runs out, substituting `Eof`.
    pub(crate) fn bump(&mut self) {
        assert!(
            !matches!(self.prev_token.token, Token::Eof),
            "attempted to bump the parser past EOF"
        );
        self.prev_token = std::mem::replace(
            &mut self.token,
            self.tokens.pop().unwrap_or_else(|| {
                let end = self.prev_token.span.hi;
                SpannedToken { token: Token::Eof, span: Span::new(end, end) }
            }),
        );
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        &self.token.token == token
    }

    /// Consumes the current token if it matches; reports whether it did.
    pub(crate) fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_any(&mut self, tokens: &[Token]) -> bool {
        if tokens.iter().any(|t| self.check(t)) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Looks `dist` tokens ahead without consuming anything. A lookahead
    /// past the end of input sees a synthetic `Eof`, matching §4.2's
    /// up-to-4-token assignment-target lookahead.
    pub(crate) fn look_ahead<R>(&self, dist: usize, looker: impl FnOnce(&Token) -> R) -> R {
        if dist == 0 {
            return looker(&self.token.token);
        }
        let idx = self.tokens.len().checked_sub(dist);
        match idx {
            Some(i) => looker(&self.tokens[i].token),
            None => looker(&Token::Eof),
        }
    }

    pub(crate) fn expect(&mut self, token: &Token) -> Result<Span> {
        if self.check(token) {
            let span = self.token.span;
            self.bump();
            Ok(span)
        } else {
            self.unexpected(&token.to_string())
        }
    }

    pub(crate) fn expect_any(&mut self, tokens: &[Token]) -> Result<Span> {
        if self.eat_any(tokens) {
            Ok(self.prev_token.span)
        } else {
            let expected = tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" or ");
            self.unexpected(&expected)
        }
    }

    pub(crate) fn eat_identifier(&mut self) -> Option<(Symbol, Span)> {
        if let Token::Ident(name) = self.token.token.clone() {
            let span = self.token.span;
            self.bump();
            Some((name, span))
        } else {
            None
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<(Symbol, Span)> {
        match self.eat_identifier() {
            Some(x) => Ok(x),
            None => self.unexpected("identifier"),
        }
    }

    pub(crate) fn unexpected<T>(&self, expected: &str) -> Result<T> {
        if matches!(self.token.token, Token::Eof) {
            Err(ParseError::UnexpectedEof { expected: expected.to_string() }.into())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.token.token.to_string(),
                span: self.token.span,
            }
            .into())
        }
    }

    /// Parses a comma-separated list until `close` is seen, consuming
    /// `close`. A trailing comma is accepted (the element parser is run
    /// again only after seeing a comma, and stops as soon as `close` shows
    /// up), mirroring the comma-list shape used throughout §4.2's grammar
    /// (parameter lists, argument lists, array/tuple literal elements).
    pub(crate) fn parse_comma_list<T>(
        &mut self,
        close: &Token,
        mut element: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<(Vec<T>, Span)> {
        let mut items = Vec::new();
        if self.check(close) {
            let span = self.token.span;
            self.bump();
            return Ok((items, span));
        }
        items.push(element(self)?);
        while self.eat(&Token::Comma) {
            if self.check(close) {
                break;
            }
            items.push(element(self)?);
        }
        let span = self.expect(close)?;
        Ok((items, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn bump_replaces_current_with_next_and_keeps_prev() {
        let tokens = tokenize("fn f").unwrap();
        let mut ctx = ParserContext::new(tokens);
        assert_eq!(ctx.token.token, Token::Fn);
        ctx.bump();
        assert_eq!(ctx.prev_token.token, Token::Fn);
        assert!(matches!(ctx.token.token, Token::Ident(_)));
    }

    #[test]
    fn look_ahead_past_input_sees_eof() {
        let tokens = tokenize("fn").unwrap();
        let ctx = ParserContext::new(tokens);
        ctx.look_ahead(5, |t| assert_eq!(*t, Token::Eof));
    }
}
