//! Aggregate types
//!
//! Composite types built from [`Typeref`] references resolved through the
//! central [`TypeRegistry`](crate::types::TypeRegistry):
//! - [`ArrayType`]: a fixed-length sequence of one element type.
//! - [`StructType`]: a packed, ordered sequence of member types.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::Typeref;

/// Array type. The element count MUST be known at compile time; dynamically
/// sized stack arrays are expressed through the allocation instruction's
/// count operand instead.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArrayType {
    pub ty: Typeref,
    pub num_elements: u64,
}

/// Structure type: a packed sequence of member types, no inter-member
/// padding.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StructType {
    pub element_types: Vec<Typeref>,
}
