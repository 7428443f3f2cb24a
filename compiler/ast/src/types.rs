use serde::{Deserialize, Serialize};
use std::fmt;

/// A MiniLang type.
///
/// Types are pure values on AST edges — they carry no [`minilang_span::Span`]
/// — so that equality between two `Type`s is exactly the structural equality
/// the semantic analyzer needs (§4.3: "types are compared structurally").
#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// The sole primitive type.
    I32,
    /// `&T` or `&mut T`.
    Reference(ReferenceType),
    /// `[T; N]`.
    Array(ArrayType),
    /// `(T0, T1, ...)`. The empty tuple `()` is MiniLang's unit type.
    Tuple(TupleType),
}

impl Type {
    pub const UNIT: Type = Type::Tuple(TupleType { elements: Vec::new() });

    pub fn is_unit(&self) -> bool {
        matches!(self, Type::Tuple(t) if t.elements.is_empty())
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ReferenceType {
    pub mutable: bool,
    pub inner: Box<Type>,
}

#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ArrayType {
    pub inner: Box<Type>,
    pub size: u32,
}

#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TupleType {
    pub elements: Vec<Type>,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::I32 => write!(f, "i32"),
            Type::Reference(r) => {
                write!(f, "&{}{}", if r.mutable { "mut " } else { "" }, r.inner)
            }
            Type::Array(a) => write!(f, "[{}; {}]", a.inner, a.size),
            Type::Tuple(t) if t.elements.is_empty() => write!(f, "()"),
            Type::Tuple(t) => {
                write!(f, "(")?;
                for (i, elem) in t.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_type_equality_requires_matching_mutability() {
        let a = Type::Reference(ReferenceType { mutable: true, inner: Box::new(Type::I32) });
        let b = Type::Reference(ReferenceType { mutable: false, inner: Box::new(Type::I32) });
        assert_ne!(a, b);
    }

    #[test]
    fn array_type_equality_requires_matching_size() {
        let a = Type::Array(ArrayType { inner: Box::new(Type::I32), size: 3 });
        let b = Type::Array(ArrayType { inner: Box::new(Type::I32), size: 4 });
        assert_ne!(a, b);
    }

    #[test]
    fn empty_tuple_is_unit() {
        assert!(Type::UNIT.is_unit());
        assert!(!Type::I32.is_unit());
    }
}
