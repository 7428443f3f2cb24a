use minilang_span::{Span, Symbol};
use serde::{Deserialize, Serialize};

use crate::{expression::FunctionExprBlock, types::Type};

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Param {
    pub mutable: bool,
    pub name: Symbol,
    pub type_: Type,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub return_type: Option<Type>,
    pub body: FunctionExprBlock,
    pub span: Span,
}

impl FunctionDecl {
    /// The function's declared return type, with a void function's absent
    /// annotation normalized to unit.
    pub fn return_type_or_unit(&self) -> Type {
        self.return_type.clone().unwrap_or(Type::UNIT)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Program {
    pub declarations: Vec<FunctionDecl>,
    pub span: Span,
}
