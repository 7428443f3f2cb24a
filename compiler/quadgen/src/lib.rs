//! Quadruple generation for MiniLang (§4.4): lowers a semantically validated
//! [`minilang_ast::Program`] into a flat list of `(op, arg1, arg2, result)`
//! instructions (§6.3).
//!
//! Grounded on `leo-passes::code_generation`'s shape — a single recursive
//! walk over an already-checked tree, assumed valid and never re-validated —
//! restructured around MiniLang's quadruple IR instead of Leo's bytecode.

mod generator;
mod quad;

pub use generator::generate;
pub use quad::{Quad, QuadArg};
