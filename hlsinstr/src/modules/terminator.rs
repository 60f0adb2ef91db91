//! Control-flow terminators closing each basic block.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::EnumIs;

use crate::modules::operand::{Label, Operand};

/// The instruction ending a basic block.
#[derive(Debug, Clone, Hash, PartialEq, Eq, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Terminator {
    /// Return to the caller, with an optional value.
    Ret(Option<Operand>),

    /// Unconditional jump to another block of the same function.
    Jump(Label),

    /// Two-way conditional branch on an `i1` condition.
    Branch {
        cond: Operand,
        target_true: Label,
        target_false: Label,
    },
}

impl std::fmt::Display for Terminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Terminator::Ret(Some(value)) => write!(f, "ret {}", value),
            Terminator::Ret(None) => write!(f, "ret void"),
            Terminator::Jump(target) => write!(f, "jump {:#}", target),
            Terminator::Branch {
                cond,
                target_true,
                target_false,
            } => write!(f, "branch {}, {}, {}", cond, target_true, target_false),
        }
    }
}
