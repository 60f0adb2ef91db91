//! Memory instructions
//!
//! Loads, stores, stack allocations and address computations. The IR targets
//! synthesized hardware, so there are no atomic orderings here; `volatile`
//! is kept because memory-mapped peripherals still need it.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    modules::{
        Instruction,
        metadata::MetadataNode,
        operand::{Name, Operand},
    },
    types::Typeref,
};

/// Load a value of type `ty` from memory.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MLoad {
    pub dest: Name,
    pub ty: Typeref,
    pub addr: Operand,
    pub alignment: Option<u32>,
    pub volatile: bool,
}

impl Instruction for MLoad {
    fn operands(&self) -> impl Iterator<Item = &Operand> {
        std::iter::once(&self.addr)
    }

    fn operands_mut(&mut self) -> impl Iterator<Item = &mut Operand> {
        std::iter::once(&mut self.addr)
    }

    fn destination(&self) -> Option<Name> {
        Some(self.dest)
    }

    fn set_destination(&mut self, name: Name) {
        self.dest = name;
    }
}

/// Store a value to memory.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MStore {
    pub addr: Operand,
    pub value: Operand,
    pub alignment: Option<u32>,
    pub volatile: bool,
}

impl Instruction for MStore {
    fn operands(&self) -> impl Iterator<Item = &Operand> {
        [&self.addr, &self.value].into_iter()
    }

    fn operands_mut(&mut self) -> impl Iterator<Item = &mut Operand> {
        [&mut self.addr, &mut self.value].into_iter()
    }
}

/// Reserve stack storage for `count` elements of type `ty` and yield the
/// address.
///
/// `count` is usually an integer immediate. Front-ends lowering dynamically
/// sized locals emit a constant expression instead, and a count that is a
/// plain SSA register means the size is only known at runtime.
///
/// The optional `annotation` node carries the source-level name of the
/// allocated object when the front-end chose to preserve it; analyses that
/// report per-object results key off this node.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MAlloca {
    pub dest: Name,
    pub ty: Typeref,
    pub count: Operand,
    pub alignment: Option<u32>,
    pub annotation: Option<MetadataNode>,
}

impl Instruction for MAlloca {
    fn operands(&self) -> impl Iterator<Item = &Operand> {
        std::iter::once(&self.count)
    }

    fn operands_mut(&mut self) -> impl Iterator<Item = &mut Operand> {
        std::iter::once(&mut self.count)
    }

    fn destination(&self) -> Option<Name> {
        Some(self.dest)
    }

    fn set_destination(&mut self, name: Name) {
        self.dest = name;
    }
}

/// Compute the address of an element within an aggregate in memory.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MGetElementPtr {
    pub dest: Name,
    pub ty: Typeref,
    pub base: Operand,
    pub indices: SmallVec<Operand, 4>,
}

impl Instruction for MGetElementPtr {
    fn operands(&self) -> impl Iterator<Item = &Operand> {
        std::iter::once(&self.base).chain(self.indices.iter())
    }

    fn operands_mut(&mut self) -> impl Iterator<Item = &mut Operand> {
        std::iter::once(&mut self.base).chain(self.indices.iter_mut())
    }

    fn destination(&self) -> Option<Name> {
        Some(self.dest)
    }

    fn set_destination(&mut self, name: Name) {
        self.dest = name;
    }
}
