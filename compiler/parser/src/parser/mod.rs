mod context;
mod expression;
mod program;
mod statement;
mod type_;

pub use context::ParserContext;

use minilang_ast::Program;
use minilang_errors::Result;

use crate::tokenizer::{tokenize, SpannedToken};

/// Parses a token stream produced by [`crate::tokenize`] into a [`Program`]
/// (§6.1's `parse`). Hand-written recursive descent, one-token lookahead
/// except where §4.2 calls for more; no backtracking, first mismatch aborts.
pub fn parse(tokens: Vec<SpannedToken>) -> Result<Program> {
    let mut context = ParserContext::new(tokens);
    context.parse_program()
}

/// Convenience wrapper over [`tokenize`] + [`parse`] for callers that only
/// have source text; the façade crate's `parse` takes an already-tokenized
/// stream per §6.1, so this lives here as a test/tooling helper instead of
/// on the public pipeline API. Used by this crate's own tests and by
/// `minilang-passes`'/`minilang-quadgen`'s test suites.
pub fn parse_source(source: &str) -> Result<Program> {
    let tokens = tokenize(source)?;
    parse(tokens)
}
