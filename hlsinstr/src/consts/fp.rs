//! Floating-point constants used as immediate operands.
use bigdecimal::{BigDecimal, FromPrimitive};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::primary::FType;

/// A floating-point literal paired with its [`FType`].
///
/// The payload is an arbitrary-precision decimal so literals survive
/// round-tripping without accumulating binary rounding error.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FConst {
    pub ty: FType,
    pub value: BigDecimal,
}

impl FConst {
    /// Create a new `FConst` from its type and value.
    pub fn new(ty: FType, value: BigDecimal) -> Self {
        Self { ty, value }
    }
}

impl TryFrom<f32> for FConst {
    type Error = ();

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        let value = BigDecimal::from_f32(value).ok_or(())?;
        Ok(Self {
            ty: FType::Fp32,
            value,
        })
    }
}

impl TryFrom<f64> for FConst {
    type Error = ();

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let value = BigDecimal::from_f64(value).ok_or(())?;
        Ok(Self {
            ty: FType::Fp64,
            value,
        })
    }
}

impl std::fmt::Display for FConst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.ty, self.value)
    }
}
