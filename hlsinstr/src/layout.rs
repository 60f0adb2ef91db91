//! Target data-layout model
//!
//! [`DataLayout`] answers one question: how many bits does the target reserve
//! when it allocates storage for a value of a given type? The answer includes
//! ABI padding, so it can differ from the nominal bit width (an `i1` local
//! still occupies a full byte, an `i17` pads out to 32 bits).
//!
//! Sizing of aggregate types goes through
//! [`TypeRegistry::alloc_bits`](crate::types::TypeRegistry::alloc_bits),
//! which resolves element typerefs and recurses back into this model for the
//! primitive leaves.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    Typeref,
    primary::{PrimaryBasicType, PrimaryType, VectorSize},
};

/// Errors produced while sizing a type against a [`DataLayout`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The typeref does not resolve in the registry the query went through.
    #[error("type reference {0:?} is not registered")]
    UnknownType(Typeref),

    /// The type has no storage size known at compile time (e.g. a scalable
    /// vector).
    #[error("type `{0}` has no compile-time storage size")]
    Unsized(String),

    /// The total size does not fit in a 64-bit bit count.
    #[error("storage size overflows the 64-bit bit-count range")]
    Oversized,
}

/// Sizing rules of one target platform.
///
/// Pointer width and the integer alignment cap are the only knobs hardware
/// back-ends have needed so far; everything else follows fixed rules
/// documented on [`DataLayout::primary_alloc_bits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataLayout {
    /// Storage width of a pointer, in bits.
    pub pointer_bits: u32,

    /// Largest ABI alignment applied to integer storage, in bits. Integers
    /// wider than this still align to it, never beyond.
    pub max_int_align_bits: u32,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self {
            pointer_bits: 64,
            max_int_align_bits: 64,
        }
    }
}

impl DataLayout {
    /// Allocated storage size of a primary type, in bits.
    ///
    /// - integers are stored in whole bytes rounded up to their ABI
    ///   alignment: the next power of two of their byte size, capped at
    ///   `max_int_align_bits`;
    /// - floats use their representation width;
    /// - pointers use `pointer_bits`;
    /// - fixed vectors pack their element bits and round the total up to a
    ///   power of two (minimum one byte);
    /// - scalable vectors are unsized and error out.
    pub fn primary_alloc_bits(&self, ty: &PrimaryType) -> Result<u64, LayoutError> {
        match ty {
            PrimaryType::Int(itype) => Ok(self.int_alloc_bits(itype.num_bits())),
            PrimaryType::Float(ftype) => Ok(ftype.num_bits() as u64),
            PrimaryType::Ptr(_) => Ok(self.pointer_bits as u64),
            PrimaryType::Vc(vc) => {
                let lanes = match vc.size {
                    VectorSize::Fixed(n) => n as u64,
                    VectorSize::Scalable(_) => {
                        return Err(LayoutError::Unsized(vc.to_string()));
                    }
                };
                let lane_bits = match &vc.ty {
                    PrimaryBasicType::Int(itype) => itype.num_bits() as u64,
                    PrimaryBasicType::Float(ftype) => ftype.num_bits() as u64,
                    PrimaryBasicType::Ptr(_) => self.pointer_bits as u64,
                };
                lane_bits
                    .checked_mul(lanes)
                    .map(|total| total.next_power_of_two().max(8))
                    .ok_or(LayoutError::Oversized)
            }
        }
    }

    fn int_alloc_bits(&self, num_bits: u32) -> u64 {
        let bytes = (num_bits as u64 + 7) / 8;
        let align = bytes
            .next_power_of_two()
            .min((self.max_int_align_bits as u64 / 8).max(1));
        bytes.div_ceil(align) * align * 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::primary::{FType, IType, PtrType, VcType};

    fn layout() -> DataLayout {
        DataLayout::default()
    }

    #[test]
    fn sub_byte_integers_round_up_to_a_byte() {
        let bits = layout()
            .primary_alloc_bits(&IType::I1.into())
            .expect("i1 is sized");
        assert_eq!(bits, 8);
    }

    #[test]
    fn odd_width_integers_pad_to_abi_alignment() {
        let i17 = IType::new(17).expect("valid width");
        let bits = layout()
            .primary_alloc_bits(&i17.into())
            .expect("i17 is sized");
        assert_eq!(bits, 32);

        let i96 = IType::new(96).expect("valid width");
        let bits = layout()
            .primary_alloc_bits(&i96.into())
            .expect("i96 is sized");
        // 12 bytes, aligned to the 8-byte cap.
        assert_eq!(bits, 128);
    }

    #[test]
    fn pointers_use_the_target_width() {
        let narrow = DataLayout {
            pointer_bits: 32,
            ..DataLayout::default()
        };
        assert_eq!(narrow.primary_alloc_bits(&PtrType.into()), Ok(32));
        assert_eq!(layout().primary_alloc_bits(&PtrType.into()), Ok(64));
    }

    #[test]
    fn fixed_vectors_pad_to_a_power_of_two() {
        let v3i32 = VcType {
            ty: IType::I32.into(),
            size: VectorSize::Fixed(3),
        };
        assert_eq!(layout().primary_alloc_bits(&v3i32.into()), Ok(128));

        let v4f32 = VcType {
            ty: FType::Fp32.into(),
            size: VectorSize::Fixed(4),
        };
        assert_eq!(layout().primary_alloc_bits(&v4f32.into()), Ok(128));
    }

    #[test]
    fn scalable_vectors_are_unsized() {
        let sv = VcType {
            ty: IType::I8.into(),
            size: VectorSize::Scalable(16),
        };
        assert!(matches!(
            layout().primary_alloc_bits(&sv.into()),
            Err(LayoutError::Unsized(_))
        ));
    }
}
