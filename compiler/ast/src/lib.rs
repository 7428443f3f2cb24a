//! The closed set of MiniLang AST node types (§3.2).
//!
//! Every node is a Rust struct or enum variant rather than leo-ast's
//! string-tagged record: the tagged-union representation the specification
//! describes maps directly onto exhaustively-matched sum types, so there is
//! no dynamic field lookup anywhere in this crate (§9, "Tagged AST nodes").

mod expression;
mod program;
mod statement;
mod types;

pub use expression::*;
pub use program::*;
pub use statement::*;
pub use types::*;

pub use minilang_span::{Span, Symbol};
