#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

/// An integer type with an explicit bit width.
///
/// Signedness is not part of the type; instructions interpret the bits as
/// signed or unsigned as needed. Widths are not restricted to powers of two,
/// which matters for hardware targets where an `i12` counter is a perfectly
/// ordinary object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct IType {
    num_bits: u32,
}

impl IType {
    pub const I1: Self = Self { num_bits: 1 };
    pub const I8: Self = Self { num_bits: 8 };
    pub const I16: Self = Self { num_bits: 16 };
    pub const I32: Self = Self { num_bits: 32 };
    pub const I64: Self = Self { num_bits: 64 };
    pub const MIN_BITS: u32 = 1;
    pub const MAX_BITS: u32 = (1 << 23) - 1;

    /// Creates an integer type of `num_bits` bits, or `None` if the width is
    /// outside `[MIN_BITS, MAX_BITS]`.
    #[inline]
    pub const fn new(num_bits: u32) -> Option<Self> {
        if num_bits >= Self::MIN_BITS && num_bits <= Self::MAX_BITS {
            Some(Self { num_bits })
        } else {
            None
        }
    }

    /// Exact width of the type in bits.
    #[inline]
    pub const fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Number of whole bytes needed to store a value of this type.
    #[inline]
    pub const fn byte_size(&self) -> u32 {
        (self.num_bits + 7) / 8
    }
}

impl std::fmt::Display for IType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "i{}", self.num_bits)
    }
}

/// A floating-point type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FType {
    /// IEEE-754 binary16 ("half precision").
    Fp16,

    /// 16-bit "brain" float: the exponent range of `Fp32` with a 7-bit
    /// significand.
    Bf16,

    /// IEEE-754 binary32. Corresponds to Rust's `f32`.
    Fp32,

    /// IEEE-754 binary64. Corresponds to Rust's `f64`.
    Fp64,

    /// IEEE-754 binary128 ("quadruple precision").
    Fp128,
}

impl FType {
    /// Width of the in-memory representation in bits.
    pub const fn num_bits(&self) -> u32 {
        match self {
            FType::Fp16 | FType::Bf16 => 16,
            FType::Fp32 => 32,
            FType::Fp64 => 64,
            FType::Fp128 => 128,
        }
    }
}

impl std::fmt::Display for FType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FType::Fp16 => "half",
            FType::Bf16 => "bfloat",
            FType::Fp32 => "float",
            FType::Fp64 => "double",
            FType::Fp128 => "fp128",
        };
        write!(f, "{}", s)
    }
}

/// The opaque pointer type.
///
/// Pointers carry no pointee type; loads, stores and address computations
/// supply the type information at the use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PtrType;

impl std::fmt::Display for PtrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ptr")
    }
}

/// Scalar types a vector may be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrimaryBasicType {
    Int(IType),
    Float(FType),
    Ptr(PtrType),
}

impl From<IType> for PrimaryBasicType {
    fn from(value: IType) -> Self {
        PrimaryBasicType::Int(value)
    }
}

impl From<FType> for PrimaryBasicType {
    fn from(value: FType) -> Self {
        PrimaryBasicType::Float(value)
    }
}

impl From<PtrType> for PrimaryBasicType {
    fn from(value: PtrType) -> Self {
        PrimaryBasicType::Ptr(value)
    }
}

impl std::fmt::Display for PrimaryBasicType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimaryBasicType::Int(itype) => itype.fmt(f),
            PrimaryBasicType::Float(ftype) => ftype.fmt(f),
            PrimaryBasicType::Ptr(ptrtype) => ptrtype.fmt(f),
        }
    }
}

/// Element count of a vector type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VectorSize {
    /// Exactly this many elements.
    Fixed(u16),

    /// A runtime multiple of this many elements. Scalable vectors have no
    /// size known at compile time.
    Scalable(u16),
}

/// A vector of scalar elements operated on in parallel (SIMD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VcType {
    pub ty: PrimaryBasicType,
    pub size: VectorSize,
}

impl std::fmt::Display for VcType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.size {
            VectorSize::Fixed(num) => write!(f, "<{} x {}>", num, self.ty),
            VectorSize::Scalable(num) => write!(f, "<vscale {} x {}>", num, self.ty),
        }
    }
}

/// Any non-composite type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrimaryType {
    Int(IType),
    Float(FType),
    Ptr(PtrType),
    Vc(VcType),
}

macro_rules! primary_type_from {
    ($typ:ty, $lbl:ident) => {
        impl From<$typ> for PrimaryType {
            fn from(value: $typ) -> Self {
                PrimaryType::$lbl(value)
            }
        }
    };
}

primary_type_from! { IType, Int }
primary_type_from! { FType, Float }
primary_type_from! { PtrType, Ptr }
primary_type_from! { VcType, Vc }

impl std::fmt::Display for PrimaryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimaryType::Int(itype) => itype.fmt(f),
            PrimaryType::Float(ftype) => ftype.fmt(f),
            PrimaryType::Ptr(ptr_type) => ptr_type.fmt(f),
            PrimaryType::Vc(vc_type) => vc_type.fmt(f),
        }
    }
}
