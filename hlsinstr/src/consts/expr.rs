//! Constant expressions
//!
//! A [`ConstExpr`] is a tree of operations whose leaves are scalar constants
//! and whose value is fixed at compile time even though no single literal
//! spells it out. Front-ends produce these when they lower address or size
//! computations that mix sizeof-style quantities with literal factors; the
//! typical place one shows up in this IR is the element-count operand of a
//! stack allocation.
use smallvec::SmallVec;
use strum::{EnumIs, EnumTryAs};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::consts::AnyConst;

/// Operation at one node of a constant expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstExprOp {
    Add,
    Sub,
    Mul,
    PtrToInt,
    IntToPtr,
}

impl ConstExprOp {
    pub fn to_str(&self) -> &'static str {
        match self {
            ConstExprOp::Add => "add",
            ConstExprOp::Sub => "sub",
            ConstExprOp::Mul => "mul",
            ConstExprOp::PtrToInt => "ptrtoint",
            ConstExprOp::IntToPtr => "inttoptr",
        }
    }
}

/// One operand of a constant expression: either a scalar constant or a
/// nested expression.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstValue {
    Const(AnyConst),
    Expr(Box<ConstExpr>),
}

impl From<AnyConst> for ConstValue {
    fn from(value: AnyConst) -> Self {
        ConstValue::Const(value)
    }
}

impl From<ConstExpr> for ConstValue {
    fn from(value: ConstExpr) -> Self {
        ConstValue::Expr(Box::new(value))
    }
}

/// A compile-time-constant expression tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstExpr {
    pub op: ConstExprOp,
    pub operands: SmallVec<ConstValue, 2>,
}

impl ConstExpr {
    /// Build an expression node from an operation and its operands.
    pub fn new(op: ConstExprOp, operands: impl IntoIterator<Item = ConstValue>) -> Self {
        Self {
            op,
            operands: operands.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for ConstExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.op.to_str())?;
        for (i, operand) in self.operands.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match operand {
                ConstValue::Const(constant) => write!(f, "{}", constant)?,
                ConstValue::Expr(expr) => write!(f, "{}", expr)?,
            }
        }
        write!(f, ")")
    }
}
