//! Semantic analysis for MiniLang (§4.3): scope, type, mutability,
//! initialization, control-flow and borrow checking over a parsed
//! [`minilang_ast::Program`].
//!
//! Grounded on `leo-passes`' split between a symbol table module and an
//! analysis-pass module, scaled down to MiniLang's single analysis pass over
//! a single kind of scope (no structs, traits, or generics to resolve).

mod analyzer;
mod function_table;
mod symbol_table;

pub use analyzer::analyze;
pub use function_table::FunctionTable;
pub use symbol_table::{ScopeStack, VariableSymbol};
