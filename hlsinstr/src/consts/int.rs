use num_bigint::BigInt;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::primary::IType;

/// An integer literal paired with its [`IType`].
///
/// The payload is arbitrary precision; whether it actually fits the declared
/// width is the producer's problem, not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IConst {
    pub ty: IType,
    pub value: BigInt,
}

impl IConst {
    /// Create a new `IConst` from its type and value.
    pub fn new(ty: IType, value: impl Into<BigInt>) -> Self {
        Self {
            ty,
            value: value.into(),
        }
    }

    /// The value as a `u64`, or `None` if it is negative or too wide.
    pub fn as_u64(&self) -> Option<u64> {
        u64::try_from(&self.value).ok()
    }
}

impl From<u8> for IConst {
    fn from(value: u8) -> Self {
        Self::new(IType::I8, value)
    }
}

impl From<u16> for IConst {
    fn from(value: u16) -> Self {
        Self::new(IType::I16, value)
    }
}

impl From<u32> for IConst {
    fn from(value: u32) -> Self {
        Self::new(IType::I32, value)
    }
}

impl From<u64> for IConst {
    fn from(value: u64) -> Self {
        Self::new(IType::I64, value)
    }
}

impl std::fmt::Display for IConst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.ty, self.value)
    }
}
