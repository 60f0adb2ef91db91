//! Placement classification.
use strum::EnumIs;

/// Where the synthesis flow should place an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
pub enum Placement {
    /// Fits the fast on-chip storage resource.
    Internal,

    /// Exceeds the internal budget; lives in the external backing store.
    External,
}

impl Placement {
    /// Apply the threshold rule: internal iff the allocation occupies at
    /// most `threshold_bits` bits.
    ///
    /// The caller must pass a *resolved* size. Allocations whose size cannot
    /// be determined are never classified; they are surfaced as a
    /// [`SizeError`](crate::size::SizeError) upstream instead of being
    /// defaulted into either bucket.
    pub fn classify(total_bits: u64, threshold_bits: u64) -> Self {
        if total_bits <= threshold_bits {
            Placement::Internal
        } else {
            Placement::External
        }
    }

    /// One-character report form: `'T'` for internal, `'F'` for external.
    pub fn flag(&self) -> char {
        match self {
            Placement::Internal => 'T',
            Placement::External => 'F',
        }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placement::Internal => write!(f, "internal"),
            Placement::External => write!(f, "external"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_THRESHOLD_BITS;

    #[test]
    fn threshold_is_inclusive() {
        assert!(Placement::classify(512, DEFAULT_THRESHOLD_BITS).is_internal());
        assert!(Placement::classify(513, DEFAULT_THRESHOLD_BITS).is_external());
        assert!(Placement::classify(0, DEFAULT_THRESHOLD_BITS).is_internal());
    }

    #[test]
    fn flags_match_the_report_encoding() {
        assert_eq!(Placement::Internal.flag(), 'T');
        assert_eq!(Placement::External.flag(), 'F');
    }
}
