//! Recursive-descent tokenizer and parser for MiniLang (§4.1, §4.2).
//!
//! Grounded on `leo-parser`'s split between a standalone tokenizer module and
//! a `ParserContext` that owns a one-token cursor over the already-lexed
//! stream. There is no backtracking anywhere in this crate: every dispatch
//! point commits to a branch after at most a few tokens of lookahead, and the
//! first error encountered aborts the whole parse (§7).

mod parser;
mod tokenizer;

pub use parser::{parse, parse_source, ParserContext};
pub use tokenizer::{tokenize, SpannedToken, Token, TokenKind, KEYWORDS};
