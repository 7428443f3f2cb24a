mod lexer;
mod token;

pub use token::{Token, TokenKind, SpannedToken, KEYWORDS};

use minilang_errors::LexError;
use minilang_span::Span;

/// Turns `source` into its token stream (§4.1). Whitespace is dropped and
/// comments are filtered before returning, matching §6.1's `lex` contract;
/// there is no trailing `Eof` token in the result — [`crate::ParserContext`]
/// adds its own sentinel once it owns the vector.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    let mut tokens = Vec::new();
    let mut pos: u32 = 0;
    let mut rest = source;

    while !rest.is_empty() {
        let leading = rest.len() - rest.trim_start().len();
        if leading > 0 {
            pos += leading as u32;
            rest = &rest[leading..];
            continue;
        }

        let (len, token) = lexer::eat(rest, pos)?;
        let span = Span::new(pos, pos + len as u32);
        if let Some(token) = token {
            tokens.push(SpannedToken { token, span });
        }
        pos += len as u32;
        rest = &rest[len..];
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_are_filtered_and_whitespace_ignored() {
        let tokens = tokenize("let  x = 1; // trailing\n/* block */ x;").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.token.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Let,
                Token::Ident("x".into()),
                Token::Assign,
                Token::Int(1),
                Token::Semicolon,
                Token::Ident("x".into()),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn function_signature_tokenizes_in_order() {
        let tokens = tokenize("fn foo(mut a: i32, b: &mut i32) -> i32 {}").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.token.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Fn,
                Token::Ident("foo".into()),
                Token::LeftParen,
                Token::Mut,
                Token::Ident("a".into()),
                Token::Colon,
                Token::I32,
                Token::Comma,
                Token::Ident("b".into()),
                Token::Colon,
                Token::Ampersand,
                Token::Mut,
                Token::I32,
                Token::RightParen,
                Token::Arrow,
                Token::I32,
                Token::LeftCurly,
                Token::RightCurly,
            ]
        );
    }

    #[test]
    fn unknown_character_fails_the_whole_lex() {
        assert!(tokenize("let x = 1 $ 2;").is_err());
    }

    #[test]
    fn re_lexing_token_lexemes_reproduces_the_stream() {
        let source = "fn f(a: i32) -> i32 { return a + 1; }";
        let first = tokenize(source).unwrap();
        let rebuilt = first.iter().map(|t| t.token.to_string()).collect::<Vec<_>>().join(" ");
        let second = tokenize(&rebuilt).unwrap();
        let first_kinds: Vec<_> = first.iter().map(|t| t.token.clone()).collect();
        let second_kinds: Vec<_> = second.iter().map(|t| t.token.clone()).collect();
        assert_eq!(first_kinds, second_kinds);
    }
}
