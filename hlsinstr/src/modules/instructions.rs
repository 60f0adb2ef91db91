use auto_enums::auto_enum;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumDiscriminants, EnumIs, EnumTryAs};

use crate::modules::{Instruction, int, mem, operand::Operand};

/// Discriminated union covering all instruction kinds.
///
/// Use this enum to store heterogeneous instruction streams and to
/// pattern-match on specific operations. The generated `InstrKind`
/// discriminant (via `strum`) is handy for fast classification, and the
/// `try_as_*` accessors give typed access to one form without a full match.
#[derive(Debug, Clone, Hash, PartialEq, Eq, EnumIs, EnumTryAs, EnumDiscriminants)]
#[strum_discriminants(name(InstrKind))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Instr {
    // Integer instructions
    IAdd(int::IAdd),
    ISub(int::ISub),
    IMul(int::IMul),
    ICmp(int::ICmp),

    // Memory instructions
    MLoad(mem::MLoad),
    MStore(mem::MStore),
    MAlloca(mem::MAlloca),
    MGetElementPtr(mem::MGetElementPtr),
}

macro_rules! define_instr_dispatch {
    (
        $($variant:ident),* $(,)?
    ) => {
        impl Instruction for Instr {
            #[auto_enum(Iterator)]
            fn operands(&self) -> impl Iterator<Item = &Operand> {
                match self {
                    $(
                        Instr::$variant(instr) => instr.operands(),
                    )*
                }
            }

            #[auto_enum(Iterator)]
            fn operands_mut(&mut self) -> impl Iterator<Item = &mut Operand> {
                match self {
                    $(
                        Instr::$variant(instr) => instr.operands_mut(),
                    )*
                }
            }

            fn destination(&self) -> Option<super::operand::Name> {
                match self {
                    $(
                        Instr::$variant(instr) => instr.destination(),
                    )*
                }
            }

            fn set_destination(&mut self, name: super::operand::Name) {
                match self {
                    $(
                        Instr::$variant(instr) => instr.set_destination(name),
                    )*
                }
            }
        }
    };
}

define_instr_dispatch! {
    IAdd,
    ISub,
    IMul,
    ICmp,
    MLoad,
    MStore,
    MAlloca,
    MGetElementPtr,
}

macro_rules! define_instr_from {
    ($typ:ty, $variant:ident) => {
        impl From<$typ> for Instr {
            fn from(inst: $typ) -> Self {
                Instr::$variant(inst)
            }
        }
    };
}

define_instr_from!(int::IAdd, IAdd);
define_instr_from!(int::ISub, ISub);
define_instr_from!(int::IMul, IMul);
define_instr_from!(int::ICmp, ICmp);

define_instr_from!(mem::MLoad, MLoad);
define_instr_from!(mem::MStore, MStore);
define_instr_from!(mem::MAlloca, MAlloca);
define_instr_from!(mem::MGetElementPtr, MGetElementPtr);
