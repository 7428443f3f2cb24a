use minilang_errors::LexError;
use minilang_span::Span;

use super::token::Token;

fn eat_identifier(input: &str) -> Option<(usize, Token)> {
    let mut chars = input.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let mut len = first.len_utf8();
    for c in chars {
        if c.is_ascii_alphanumeric() || c == '_' {
            len += c.len_utf8();
        } else {
            break;
        }
    }
    let lexeme = &input[..len];
    let token = Token::keyword_for(lexeme).unwrap_or_else(|| Token::Ident(lexeme.into()));
    Some((len, token))
}

fn eat_integer(input: &str) -> Option<(usize, Token)> {
    let mut len = 0;
    for c in input.chars() {
        if c.is_ascii_digit() {
            len += 1;
        } else {
            break;
        }
    }
    if len == 0 {
        return None;
    }
    // MiniLang literals are non-negative decimal integers (§3.1); the
    // driver is responsible for anything larger than fits in the payload.
    let value: u32 = input[..len].parse().ok()?;
    Some((len, Token::Int(value)))
}

/// Skips a `//` line comment or a `/* ... */` block comment starting at the
/// front of `input`. Returns the number of bytes consumed, or an error if a
/// block comment runs off the end of input (§4.1: "fails if unterminated").
fn eat_comment(input: &str, start: Span) -> Option<Result<usize, LexError>> {
    let mut chars = input.chars().peekable();
    if chars.next()? != '/' {
        return None;
    }
    match chars.peek() {
        Some('/') => {
            let mut len = 2;
            let rest = &input[2..];
            for c in rest.chars() {
                if c == '\n' {
                    break;
                }
                len += c.len_utf8();
            }
            Some(Ok(len))
        }
        Some('*') => {
            let rest = &input[2..];
            let mut iter = rest.char_indices();
            loop {
                match iter.next() {
                    Some((i, '*')) if rest[i + 1..].starts_with('/') => {
                        break Some(Ok(2 + i + 2));
                    }
                    Some(_) => continue,
                    None => break Some(Err(LexError::UnterminatedBlockComment { span: start })),
                }
            }
        }
        _ => None,
    }
}

/// Scans exactly one token from the front of `input`, returning its length
/// in bytes and the token itself. `input` must be non-empty. This is the
/// single-pass, one-character-lookahead core of §4.1, grounded on
/// `leo-parser`'s `Token::eat` longest-match disambiguation.
pub(crate) fn eat(input: &str, pos: u32) -> Result<(usize, Option<Token>), LexError> {
    let start = Span::new(pos, pos);

    if let Some(result) = eat_comment(input, start) {
        return result.map(|len| (len, None));
    }
    if let Some((len, token)) = eat_identifier(input) {
        return Ok((len, Some(token)));
    }
    if let Some((len, token)) = eat_integer(input) {
        return Ok((len, Some(token)));
    }

    let mut chars = input.chars();
    let c0 = chars.next().expect("eat() called on empty input");
    let c1 = chars.next();

    // Two-character operators and punctuation win over their single-character
    // prefixes (§4.1: "operator disambiguation by longest match").
    let two_char = match (c0, c1) {
        ('=', Some('=')) => Some(Token::EqEq),
        ('!', Some('=')) => Some(Token::Ne),
        ('<', Some('=')) => Some(Token::Le),
        ('>', Some('=')) => Some(Token::Ge),
        ('-', Some('>')) => Some(Token::Arrow),
        ('.', Some('.')) => Some(Token::DotDot),
        _ => None,
    };
    if let Some(token) = two_char {
        return Ok((2, Some(token)));
    }

    let single = match c0 {
        '+' => Some(Token::Plus),
        '-' => Some(Token::Minus),
        '*' => Some(Token::Star),
        '/' => Some(Token::Slash),
        '<' => Some(Token::Lt),
        '>' => Some(Token::Gt),
        '&' => Some(Token::Ampersand),
        '=' => Some(Token::Assign),
        '(' => Some(Token::LeftParen),
        ')' => Some(Token::RightParen),
        '{' => Some(Token::LeftCurly),
        '}' => Some(Token::RightCurly),
        '[' => Some(Token::LeftSquare),
        ']' => Some(Token::RightSquare),
        ';' => Some(Token::Semicolon),
        ':' => Some(Token::Colon),
        ',' => Some(Token::Comma),
        '.' => Some(Token::Dot),
        _ => None,
    };
    if let Some(token) = single {
        return Ok((1, Some(token)));
    }

    Err(LexError::UnknownCharacter { ch: c0, span: start })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_match_wins_for_two_char_operators() {
        assert_eq!(eat("==", 0).unwrap().1, Some(Token::EqEq));
        assert_eq!(eat("=", 0).unwrap().1, Some(Token::Assign));
        assert_eq!(eat("<=x", 0).unwrap().1, Some(Token::Le));
    }

    #[test]
    fn identifiers_versus_keywords() {
        assert_eq!(eat("mut", 0).unwrap().1, Some(Token::Mut));
        assert_eq!(eat("mutable", 0).unwrap().1, Some(Token::Ident("mutable".into())));
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let err = eat("/* never closes", 0).unwrap_err();
        assert!(matches!(err, LexError::UnterminatedBlockComment { .. }));
    }

    #[test]
    fn unknown_character_is_an_error() {
        let err = eat("$", 0).unwrap_err();
        assert!(matches!(err, LexError::UnknownCharacter { ch: '$', .. }));
    }
}
