//! Error taxonomy for the MiniLang front-end (spec §7).
//!
//! Each stage gets its own `thiserror`-derived enum rather than one shared
//! type, because the lexer and parser run before any AST exists and can
//! only report a `Span` over raw text, while the semantic analyzer can name
//! the offending symbol. All three are unified under [`Error`] so `lex`,
//! `parse` and `analyze` can share one `Result` alias at the crate boundary.
//!
//! There is no multi-error accumulator here (contrast `leo_errors::Handler`):
//! every stage's first error aborts that stage (§7), so a plain `Result<T, Error>`
//! returned via `?` is the whole mechanism.

use minilang_span::Span;
use thiserror::Error;

/// Errors raised while turning source text into a token stream (§4.1).
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum LexError {
    #[error("invalid character '{ch}' at {span}")]
    UnknownCharacter { ch: char, span: Span },

    #[error("unterminated block comment starting at {span}")]
    UnterminatedBlockComment { span: Span },
}

/// Errors raised while turning a token stream into an AST (§4.2).
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at {span}")]
    UnexpectedToken { expected: String, found: String, span: Span },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("unexpected type keyword '{keyword}' in expression at {span}")]
    KeywordInExpression { keyword: String, span: Span },

    #[error("unsupported type starting at {found} ({span})")]
    UnsupportedType { found: String, span: Span },

    #[error("tuple type must have zero or at least two comma-separated elements ({span})")]
    SingletonTupleType { span: Span },
}

/// The closed taxonomy of semantic errors (§7). Each carries the rendered
/// message that is the actual external contract: no error codes are exposed.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum SemanticError {
    #[error("variable '{name}' is not declared ({span})")]
    UndeclaredVariable { name: String, span: Span },

    #[error("cannot assign to immutable variable '{name}' ({span})")]
    ImmutableAssignment { name: String, span: Span },

    #[error("type mismatch: {message} ({span})")]
    TypeMismatch { message: String, span: Span },

    #[error("return type error: {message} ({span})")]
    ReturnType { message: String, span: Span },

    #[error("invalid control flow: {message} ({span})")]
    InvalidControlFlow { message: String, span: Span },

    #[error("variable '{name}' is used before initialization ({span})")]
    UninitializedVariable { name: String, span: Span },

    #[error("borrow check failed: {message} ({span})")]
    BorrowCheck { message: String, span: Span },

    #[error("{message} ({span})")]
    GenericSemantic { message: String, span: Span },
}

impl SemanticError {
    pub fn span(&self) -> Span {
        match self {
            SemanticError::UndeclaredVariable { span, .. }
            | SemanticError::ImmutableAssignment { span, .. }
            | SemanticError::TypeMismatch { span, .. }
            | SemanticError::ReturnType { span, .. }
            | SemanticError::InvalidControlFlow { span, .. }
            | SemanticError::UninitializedVariable { span, .. }
            | SemanticError::BorrowCheck { span, .. }
            | SemanticError::GenericSemantic { span, .. } => *span,
        }
    }
}

/// The unified error type returned at the crate boundary.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_offending_symbol() {
        let err = SemanticError::ImmutableAssignment { name: "c".into(), span: Span::dummy() };
        assert!(err.to_string().contains('c'));
    }

    #[test]
    fn stage_errors_convert_into_the_unified_error() {
        let err: Error = LexError::UnknownCharacter { ch: '$', span: Span::dummy() }.into();
        assert!(matches!(err, Error::Lex(_)));
    }
}
