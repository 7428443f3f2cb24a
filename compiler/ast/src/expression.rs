use minilang_span::{Span, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::statement::Statement;

/// A binary operator. The [`Display`](fmt::Display) form is exactly the quad
/// op mnemonic used by the generator (§6.3), so lowering never re-maps it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum BinaryOperation {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl BinaryOperation {
    /// True for the comparison operators, which MiniLang treats as ordinary
    /// `i32`-valued operators (there is no boolean type).
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperation::Lt
                | BinaryOperation::Le
                | BinaryOperation::Gt
                | BinaryOperation::Ge
                | BinaryOperation::Eq
                | BinaryOperation::Ne
        )
    }
}

impl fmt::Display for BinaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOperation::Add => "+",
            BinaryOperation::Sub => "-",
            BinaryOperation::Mul => "*",
            BinaryOperation::Div => "/",
            BinaryOperation::Lt => "<",
            BinaryOperation::Le => "<=",
            BinaryOperation::Gt => ">",
            BinaryOperation::Ge => ">=",
            BinaryOperation::Eq => "==",
            BinaryOperation::Ne => "!=",
        };
        f.write_str(s)
    }
}

/// The grammar in §4.2 never produces a `UnaryExpr`, but §9 requires one to
/// still be accepted if present; the operator is kept as the raw lexeme
/// rather than a closed enum so this node never needs updating if the
/// grammar later grows a prefix operator.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct UnaryOperation(pub Symbol);

impl fmt::Display for UnaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The tentatively-parsed field selector of a `TupleAccess`. `.0` always
/// yields [`TupleIndex::Int`]; `.foo` yields [`TupleIndex::Name`] and is
/// rejected by the semantic analyzer since MiniLang has no structs (§9).
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum TupleIndex {
    Int(u32),
    Name(Symbol),
}

impl fmt::Display for TupleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TupleIndex::Int(i) => write!(f, "{i}"),
            TupleIndex::Name(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub operator: BinaryOperation,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub operator: UnaryOperation,
    pub argument: Box<Expression>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct CallExpression {
    pub callee: Symbol,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct IfExpr {
    pub condition: Box<Expression>,
    pub then: Box<FunctionExprBlock>,
    pub otherwise: Box<FunctionExprBlock>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct LoopExpr {
    pub body: FunctionExprBlock,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct RefExpr {
    pub mutable: bool,
    pub operand: Box<Expression>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct DerefExpr {
    pub operand: Box<Expression>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct IndexExpr {
    pub target: Box<Expression>,
    pub index: Box<Expression>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct TupleAccess {
    pub target: Box<Expression>,
    pub index: TupleIndex,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct TupleLiteral {
    pub elements: Vec<Expression>,
    pub span: Span,
}

/// One element of a [`FunctionExprBlock`]: either a fully-formed statement
/// (always produced for anything followed by `;`, or any keyword-led
/// construct) or a bare expression. Only the *last* [`BlockElement::Expr`]
/// of a block — if the block ends on one — is the block's value; any earlier
/// bare expression (a nested `{ ... }` written without a trailing `;`) is
/// evaluated for effect only, exactly as the parser allows (§4.2).
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum BlockElement {
    Stmt(Statement),
    Expr(Expression),
}

/// `{ ... }` in a position where a value is expected: a function body, the
/// two arms of an `IfExpr`, or the body of a `LoopExpr`. Distinct from
/// [`crate::statement::Block`], which is a pure statement list with no value.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct FunctionExprBlock {
    pub elements: Vec<BlockElement>,
    pub span: Span,
}

impl FunctionExprBlock {
    /// The block's trailing bare expression, if the last element is one.
    pub fn tail_expr(&self) -> Option<&Expression> {
        match self.elements.last() {
            Some(BlockElement::Expr(e)) => Some(e),
            _ => None,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Expression {
    Literal { value: i32, span: Span },
    Identifier { name: Symbol, span: Span },
    Binary(BinaryExpression),
    Unary(UnaryExpr),
    Call(CallExpression),
    If(IfExpr),
    Loop(LoopExpr),
    Ref(RefExpr),
    Deref(DerefExpr),
    Index(IndexExpr),
    TupleAccess(TupleAccess),
    ArrayLiteral(ArrayLiteral),
    TupleLiteral(TupleLiteral),
    Block(FunctionExprBlock),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Literal { span, .. } => *span,
            Expression::Identifier { span, .. } => *span,
            Expression::Binary(e) => e.span,
            Expression::Unary(e) => e.span,
            Expression::Call(e) => e.span,
            Expression::If(e) => e.span,
            Expression::Loop(e) => e.span,
            Expression::Ref(e) => e.span,
            Expression::Deref(e) => e.span,
            Expression::Index(e) => e.span,
            Expression::TupleAccess(e) => e.span,
            Expression::ArrayLiteral(e) => e.span,
            Expression::TupleLiteral(e) => e.span,
            Expression::Block(e) => e.span,
        }
    }
}
