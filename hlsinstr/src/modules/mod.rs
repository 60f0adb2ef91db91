//! Instruction IR modules
//!
//! This module groups the containers of the instruction IR. Each instruction
//! is a small data structure with public fields, easy to construct and to
//! inspect. Submodules contain families of operations:
//!
//! - `int`: integer arithmetic and comparisons
//! - `mem`: loads, stores, stack allocations, address computations
//! - `operand`: shared operand and SSA name types
//! - `metadata`: attached metadata nodes (the annotation channel)
//! - `terminator`: control-flow terminators
//!
//! Heterogeneous instruction streams are stored as the [`instructions::Instr`]
//! tagged union.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    layout::DataLayout,
    modules::{
        instructions::Instr,
        operand::{Label, Name, Operand},
        terminator::Terminator,
    },
    types::Typeref,
};

pub mod fmt;
pub mod instructions;
pub mod int;
pub mod mem;
pub mod metadata;
pub mod operand;
pub mod terminator;

/// Common interface implemented by every instruction node.
///
/// Provides lightweight, zero-allocation iteration over an instruction's
/// input operands and exposes its optional destination SSA name.
pub trait Instruction {
    /// Iterate over all input operands for this instruction.
    fn operands(&self) -> impl Iterator<Item = &Operand>;

    /// Mutably iterate over all input operands for this instruction.
    fn operands_mut(&mut self) -> impl Iterator<Item = &mut Operand>;

    /// Return the destination SSA name if the instruction produces a result.
    fn destination(&self) -> Option<Name> {
        None
    }

    /// Update the destination SSA name. No-op if the instruction does not
    /// produce a result.
    fn set_destination(&mut self, _name: Name) {}

    /// Convenience iterator over referenced SSA names (register operands).
    /// Immediates and constant expressions are ignored.
    fn name_dependencies(&self) -> impl Iterator<Item = Name> {
        self.operands().filter_map(|op| match op {
            Operand::Reg(reg) => Some(*reg),
            _ => None,
        })
    }
}

/// A basic block: a labeled, straight-line run of instructions closed by a
/// control-flow terminator.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BasicBlock {
    pub label: Label,
    pub instructions: Vec<Instr>,
    pub terminator: Terminator,
}

/// A function: named scope owning an ordered list of basic blocks.
///
/// A function with no blocks is a declaration: a symbol defined elsewhere,
/// referenced here only for linking. Declarations carry no instructions and
/// are skipped by every instruction-level traversal.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Function {
    pub uuid: Uuid,
    pub name: String,
    pub params: Vec<(Name, Typeref)>,
    pub return_type: Option<Typeref>,
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    /// Create an empty (declaration-only) function with a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            params: Vec::new(),
            return_type: None,
            blocks: Vec::new(),
        }
    }

    /// Whether this entry only declares the symbol, without a body.
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over every instruction of the body, block by block, in
    /// program order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instr> {
        self.blocks.iter().flat_map(|block| block.instructions.iter())
    }
}

/// A translation unit: defined and declared functions, in declaration
/// order, plus the data layout of the target the unit was compiled for.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Module {
    pub functions: Vec<Function>,
    pub layout: DataLayout,
}

impl Module {
    /// Iterate over functions that carry a body, in declaration order.
    pub fn defined_functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter().filter(|f| !f.is_declaration())
    }
}
