//! Attached metadata
//!
//! Metadata nodes ride along on instructions without affecting their
//! semantics. A node is an ordered list of operands: strings, integers, or
//! nested nodes. The one consumer in this workspace is the memory-placement
//! analysis, which reads an allocation's annotation node to learn the
//! source-level name of the allocated object.
use smallvec::{SmallVec, smallvec};
use strum::{EnumIs, EnumTryAs};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One operand of a metadata node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MetadataOperand {
    Str(String),
    Int(u64),
    Node(Box<MetadataNode>),
}

/// An attached metadata node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetadataNode {
    pub operands: SmallVec<MetadataOperand, 2>,
}

impl MetadataNode {
    /// A node carrying a single string operand, the shape annotation
    /// metadata takes.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            operands: smallvec![MetadataOperand::Str(value.into())],
        }
    }

    /// The node's first operand, if it is a string.
    pub fn leading_string(&self) -> Option<&str> {
        match self.operands.first() {
            Some(MetadataOperand::Str(s)) => Some(s),
            _ => None,
        }
    }
}
