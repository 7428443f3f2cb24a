//! Thin façade over the MiniLang front-end pipeline (§6.1):
//!
//! ```text
//! source text → [lex] → tokens → [parse] → AST → [analyze] → validated AST → [generate] → quad list
//! ```
//!
//! Mirrors `leo-lang`'s `leo/lib.rs` minus the CLI binary: §1 names the CLI
//! driver, file I/O, and test harness as out of scope, so this crate ships as
//! a library only, re-exporting one function per stage plus the types
//! callers need to thread one stage's output into the next.

use minilang_ast::Program;
use minilang_errors::Result;
use minilang_parser::SpannedToken;

pub use minilang_ast as ast;
pub use minilang_errors::{Error, LexError, ParseError, SemanticError};
pub use minilang_quadgen::{Quad, QuadArg};

/// Turns source text into a token stream (§4.1). The first invalid character
/// or unterminated block comment aborts the scan (§7: first error wins).
pub fn lex(source: &str) -> Result<Vec<SpannedToken>> {
    tracing::debug!(bytes = source.len(), "lexing source");
    let tokens = minilang_parser::tokenize(source)?;
    tracing::debug!(tokens = tokens.len(), "lexing complete");
    Ok(tokens)
}

/// Parses an already-lexed token stream into an AST (§4.2).
pub fn parse(tokens: Vec<SpannedToken>) -> Result<Program> {
    tracing::debug!(tokens = tokens.len(), "parsing token stream");
    let program = minilang_parser::parse(tokens).inspect_err(|err| {
        tracing::warn!(%err, "parse failed");
    })?;
    tracing::debug!(functions = program.declarations.len(), "parsing complete");
    Ok(program)
}

/// Runs scope, type, mutability, initialization, control-flow and borrow
/// checking over a parsed program (§4.3). Returns `Ok(())` and leaves the
/// tree unchanged; failure aborts at the first semantic error (§7).
pub fn analyze(program: &Program) -> Result<()> {
    tracing::debug!(functions = program.declarations.len(), "analyzing program");
    minilang_passes::analyze(program).inspect_err(|err| {
        tracing::warn!(%err, "semantic analysis failed");
    })?;
    tracing::debug!("analysis complete");
    Ok(())
}

/// Lowers a validated program into a flat quad list (§4.4). Infallible: by
/// construction every caller of this function has already run [`analyze`]
/// successfully on `program`, and this stage never re-validates what it
/// walks (see SPEC_FULL.md §6).
pub fn generate(program: &Program) -> Vec<Quad> {
    tracing::debug!(functions = program.declarations.len(), "generating quads");
    let quads = minilang_quadgen::generate(program);
    tracing::debug!(quads = quads.len(), "generation complete");
    quads
}

/// Runs the whole pipeline over source text, returning the generated quad
/// list. A convenience composition of [`lex`], [`parse`], [`analyze`] and
/// [`generate`] for callers that don't need intermediate stage output.
pub fn compile(source: &str) -> Result<Vec<Quad>> {
    let tokens = lex(source)?;
    let program = parse(tokens)?;
    analyze(&program)?;
    Ok(generate(&program))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    #[test]
    fn pipeline_compiles_a_simple_function_to_quads() {
        init_tracing();
        let quads = compile("fn add(a: i32, b: i32) -> i32 { a + b }").expect("pipeline must succeed");
        assert!(quads.iter().any(|q| q.op == "add:"));
        assert!(quads.iter().any(|q| q.op == "return"));
    }

    #[test]
    fn lex_stage_reports_an_unknown_character() {
        let err = lex("fn f() { let x = 1 @ 2; }").unwrap_err();
        assert!(matches!(err, Error::Lex(LexError::UnknownCharacter { .. })));
    }

    #[test]
    fn analyze_stage_rejects_an_undeclared_variable() {
        let tokens = lex("fn f() { return y; }").unwrap();
        let program = parse(tokens).unwrap();
        let err = analyze(&program).unwrap_err();
        assert!(matches!(err, Error::Semantic(SemanticError::UndeclaredVariable { .. })));
    }

    #[test]
    fn generate_requires_only_a_reference_to_the_program() {
        let program = parse(lex("fn f() { }").unwrap()).unwrap();
        analyze(&program).unwrap();
        let quads = generate(&program);
        assert!(!quads.is_empty());
    }
}
