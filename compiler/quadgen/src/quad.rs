use std::fmt;

use minilang_span::Symbol;
use serde::{Deserialize, Serialize};

/// One operand of a [`Quad`]: either a name (identifier, temporary, label, or
/// a bare flag like `"mut"`) or an integer literal. Splitting this out of a
/// single `Option<String>` per field, as §3.4 describes it, avoids the
/// generator and its tests stringly-typing integer literals (SPEC_FULL §3).
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum QuadArg {
    Name(String),
    Int(i32),
}

impl fmt::Display for QuadArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuadArg::Name(name) => write!(f, "{name}"),
            QuadArg::Int(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for QuadArg {
    fn from(name: &str) -> Self {
        QuadArg::Name(name.to_string())
    }
}

impl From<String> for QuadArg {
    fn from(name: String) -> Self {
        QuadArg::Name(name)
    }
}

impl From<Symbol> for QuadArg {
    fn from(name: Symbol) -> Self {
        QuadArg::Name(name.to_string())
    }
}

impl From<&Symbol> for QuadArg {
    fn from(name: &Symbol) -> Self {
        QuadArg::Name(name.to_string())
    }
}

impl From<i32> for QuadArg {
    fn from(value: i32) -> Self {
        QuadArg::Int(value)
    }
}

/// A four-field instruction `(op, arg1, arg2, result)` (§3.4). `op` is a
/// plain `String` rather than a closed enum: §6.3's vocabulary mixes fixed
/// mnemonics (`"call"`, `"goto"`) with synthesized ones (`"L3:"`, `"foo:"`),
/// so a string is the natural representation — the same choice `leo-asm`
/// makes for its own textual instruction mnemonics.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Quad {
    pub op: String,
    pub arg1: Option<QuadArg>,
    pub arg2: Option<QuadArg>,
    pub result: Option<QuadArg>,
}

impl Quad {
    pub fn new(
        op: impl Into<String>,
        arg1: Option<QuadArg>,
        arg2: Option<QuadArg>,
        result: Option<QuadArg>,
    ) -> Self {
        Self { op: op.into(), arg1, arg2, result }
    }

    /// True for a label quad (`"Lk:"` or `"fname:"`) — a jump destination
    /// rather than an executable instruction.
    pub fn is_label(&self) -> bool {
        self.op.ends_with(':')
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |arg: &Option<QuadArg>| arg.as_ref().map(ToString::to_string).unwrap_or_default();
        write!(f, "({}, {}, {}, {})", self.op, render(&self.arg1), render(&self.arg2), render(&self.result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_quads_are_recognized_by_trailing_colon() {
        assert!(Quad::new("L0:", None, None, None).is_label());
        assert!(!Quad::new("goto", None, None, Some(QuadArg::Name("L0".into()))).is_label());
    }

    #[test]
    fn display_renders_absent_operands_as_empty() {
        let q = Quad::new("return", None, None, None);
        assert_eq!(q.to_string(), "(return, , , )");
    }
}
