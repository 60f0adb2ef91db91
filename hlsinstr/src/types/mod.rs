//! Types module
//!
//! Canonical representation of the types the IR can allocate and operate on,
//! in three layers:
//!
//! - Primary types: integers, floats, pointers and vectors (see `primary.rs`).
//! - Aggregate types: arrays and packed structures (see `aggregate.rs`).
//! - The [`TypeRegistry`], which deduplicates type descriptions and hands out
//!   stable [`Typeref`] identifiers that aggregates use to reference their
//!   element types.
//!
//! The registry also answers storage-size queries ([`TypeRegistry::alloc_bits`])
//! by resolving typerefs and delegating primitive leaves to a
//! [`DataLayout`](crate::layout::DataLayout).
use std::{
    collections::BTreeMap,
    hash::{DefaultHasher, Hash, Hasher},
};

use log::{debug, info};
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::{
    layout::{DataLayout, LayoutError},
    types::{
        aggregate::{ArrayType, StructType},
        primary::PrimaryType,
    },
};

pub mod aggregate;
pub mod primary;

/// A stable reference to a type stored inside a [`TypeRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Typeref(Uuid);

/// Any type the registry can hold.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnyType {
    /// Non-composite types: integers, floats, pointers, vectors.
    Primary(PrimaryType),

    /// A fixed-length array of one element type.
    Array(ArrayType),

    /// A packed, ordered sequence of member types.
    Struct(StructType),
}

impl<S: Into<PrimaryType>> From<S> for AnyType {
    fn from(value: S) -> Self {
        AnyType::Primary(value.into())
    }
}

impl From<ArrayType> for AnyType {
    fn from(value: ArrayType) -> Self {
        AnyType::Array(value)
    }
}

impl From<StructType> for AnyType {
    fn from(value: StructType) -> Self {
        AnyType::Struct(value)
    }
}

/// A central store that deduplicates [`AnyType`] values.
///
/// Identical type descriptions always map to the same [`Typeref`], so
/// typeref equality is type equality. Lookup is hash-indexed; the rare
/// collision degrades to a short linear probe and is logged.
///
/// The registry is internally synchronized and can be shared between the
/// front-end that builds modules and the analyses that read them.
///
/// Example:
///
/// ```rust
/// # use hlsinstr::types::{TypeRegistry, primary::IType};
/// let reg = TypeRegistry::new();
/// let byte = reg.search_or_insert(IType::I8.into());
/// assert_eq!(reg.search_or_insert(IType::I8.into()), byte);
/// assert_eq!(reg.get(byte).as_deref(), Some(&IType::I8.into()));
/// ```
#[derive(Default)]
pub struct TypeRegistry {
    // Lock order: storage before by_hash, everywhere.
    storage: RwLock<BTreeMap<Uuid, AnyType>>,
    by_hash: RwLock<BTreeMap<u64, SmallVec<Uuid, 1>>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn hash_of(ty: &AnyType) -> u64 {
        let mut hasher = DefaultHasher::new();
        ty.hash(&mut hasher);
        hasher.finish()
    }

    /// Borrow the [`AnyType`] behind `typeref`, or `None` if it was never
    /// registered here.
    ///
    /// The returned guard holds a shared read lock; it is safe to call `get`
    /// again (including recursively) while holding one, but do not call
    /// [`Self::search_or_insert`] with a guard alive on the same thread.
    pub fn get(&self, typeref: Typeref) -> Option<MappedRwLockReadGuard<'_, AnyType>> {
        let storage = self.storage.read_recursive();
        RwLockReadGuard::try_map(storage, |map| map.get(&typeref.0)).ok()
    }

    /// Return the [`Typeref`] for `ty`, registering it first if no equal
    /// type is present yet.
    pub fn search_or_insert(&self, ty: AnyType) -> Typeref {
        let h = Self::hash_of(&ty);

        // Fast path: shared lookup.
        {
            let storage = self.storage.read_recursive();
            let by_hash = self.by_hash.read_recursive();
            if let Some(candidates) = by_hash.get(&h) {
                for id in candidates {
                    if storage[id] == ty {
                        return Typeref(*id);
                    }
                }
            }
        }

        let mut storage = self.storage.write();
        let mut by_hash = self.by_hash.write();

        // Re-check under the write locks; another thread may have inserted
        // the same type in the meantime.
        let candidates = by_hash.entry(h).or_default();
        for id in candidates.iter() {
            if storage[id] == ty {
                return Typeref(*id);
            }
        }

        let id = Uuid::new_v4();
        if candidates.is_empty() {
            debug!("registered type {:?} as {}", ty, id);
        } else {
            info!(
                "hash collision on 0x{:016x}: {:?} joins {:?}",
                h, ty, candidates
            );
        }
        candidates.push(id);
        storage.insert(id, ty);
        Typeref(id)
    }

    /// Allocated storage size of the type behind `typeref`, in bits,
    /// including ABI padding.
    ///
    /// Arrays multiply their element's allocated size, structs sum their
    /// members (packed layout), and primitive leaves follow `layout`.
    pub fn alloc_bits(&self, layout: &DataLayout, typeref: Typeref) -> Result<u64, LayoutError> {
        let ty = self.get(typeref).ok_or(LayoutError::UnknownType(typeref))?;
        match &*ty {
            AnyType::Primary(primary) => layout.primary_alloc_bits(primary),
            AnyType::Array(array) => self
                .alloc_bits(layout, array.ty)?
                .checked_mul(array.num_elements)
                .ok_or(LayoutError::Oversized),
            AnyType::Struct(structure) => {
                structure
                    .element_types
                    .iter()
                    .try_fold(0u64, |total, member| {
                        total
                            .checked_add(self.alloc_bits(layout, *member)?)
                            .ok_or(LayoutError::Oversized)
                    })
            }
        }
    }

    /// Render the type behind `typeref` for human consumption, resolving
    /// nested element types through this registry.
    pub fn fmt(&self, typeref: Typeref) -> impl std::fmt::Display {
        struct Fmt<'a> {
            registry: &'a TypeRegistry,
            typeref: Typeref,
        }

        impl std::fmt::Display for Fmt<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let Some(ty) = self.registry.get(self.typeref) else {
                    return write!(f, "<unregistered type>");
                };
                match &*ty {
                    AnyType::Primary(primary) => write!(f, "{}", primary),
                    AnyType::Array(array) => {
                        write!(
                            f,
                            "[ {} x {} ]",
                            array.num_elements,
                            self.registry.fmt(array.ty)
                        )
                    }
                    AnyType::Struct(structure) => {
                        write!(f, "{{ ")?;
                        for (i, member) in structure.element_types.iter().enumerate() {
                            if i > 0 {
                                write!(f, ", ")?;
                            }
                            write!(f, "{}", self.registry.fmt(*member))?;
                        }
                        write!(f, " }}")
                    }
                }
            }
        }

        Fmt {
            registry: self,
            typeref,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::primary::IType;

    #[test]
    fn equal_types_share_a_typeref() {
        let reg = TypeRegistry::new();
        let a = reg.search_or_insert(IType::I32.into());
        let b = reg.search_or_insert(IType::I32.into());
        let c = reg.search_or_insert(IType::I64.into());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn aggregate_sizes_resolve_through_the_registry() {
        let reg = TypeRegistry::new();
        let layout = DataLayout::default();

        let byte = reg.search_or_insert(IType::I8.into());
        let row = reg.search_or_insert(
            ArrayType {
                ty: byte,
                num_elements: 32,
            }
            .into(),
        );
        assert_eq!(reg.alloc_bits(&layout, row), Ok(256));

        let grid = reg.search_or_insert(
            ArrayType {
                ty: row,
                num_elements: 4,
            }
            .into(),
        );
        assert_eq!(reg.alloc_bits(&layout, grid), Ok(1024));

        let word = reg.search_or_insert(IType::I32.into());
        let pair = reg.search_or_insert(
            StructType {
                element_types: vec![word, byte],
            }
            .into(),
        );
        // Packed: 32 + 8.
        assert_eq!(reg.alloc_bits(&layout, pair), Ok(40));
    }

    #[test]
    fn rendering_resolves_nested_elements() {
        let reg = TypeRegistry::new();
        let byte = reg.search_or_insert(IType::I8.into());
        let row = reg.search_or_insert(
            ArrayType {
                ty: byte,
                num_elements: 32,
            }
            .into(),
        );
        assert_eq!(reg.fmt(row).to_string(), "[ 32 x i8 ]");
    }
}
