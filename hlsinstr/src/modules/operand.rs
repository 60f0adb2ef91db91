//! Shared operand types for instructions.
//!
//! An instruction operand is a reference to another SSA value ([`Operand::Reg`]),
//! an immediate scalar constant ([`Operand::Imm`]) or a constant expression
//! ([`Operand::Expr`]) whose value is fixed at compile time but derived
//! rather than literal.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

use crate::consts::{AnyConst, expr::ConstExpr};

/// SSA value identifier naming an instruction result or function parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Name(pub u32);

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// A basic-block label. Labels never cross function boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Label(pub u32);

impl Label {
    /// The function entry label. Every defined function has a block with
    /// this label, by convention the first one.
    pub const NIL: Label = Label(0);

    pub fn is_nil(&self) -> bool {
        self == &Label::NIL
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            write!(f, "label block_{}", self.0)
        } else {
            write!(f, "block_{}", self.0)
        }
    }
}

/// Instruction operand.
#[derive(Clone, Debug, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operand {
    /// Reference to a previously defined SSA value.
    Reg(Name),
    /// Immediate scalar literal.
    Imm(AnyConst),
    /// Compile-time-constant derived value.
    Expr(ConstExpr),
}

impl Operand {
    /// Immediate integer operand, a convenience for builders and tests.
    pub fn literal(value: impl Into<crate::consts::int::IConst>) -> Self {
        Operand::Imm(AnyConst::Int(value.into()))
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Reg(name) => write!(f, "{}", name),
            Operand::Imm(constant) => write!(f, "{}", constant),
            Operand::Expr(expr) => write!(f, "{}", expr),
        }
    }
}
