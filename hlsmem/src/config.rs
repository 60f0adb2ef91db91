//! Analysis configuration.
use serde::{Deserialize, Serialize};

/// Default placement threshold, in bits.
///
/// Allocations of at most this many bits are considered internal. The value
/// is a policy constant tuned for the block-RAM budget of the targets this
/// flow has shipped on, not something derived from a hardware model;
/// override it through [`BindingConfig`] when the target differs.
pub const DEFAULT_THRESHOLD_BITS: u64 = 512;

/// Configuration of one memory-binding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Largest allocation, in bits, still placed in internal storage.
    pub threshold_bits: u64,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            threshold_bits: DEFAULT_THRESHOLD_BITS,
        }
    }
}

impl BindingConfig {
    /// Parse a configuration from a TOML document. Missing keys fall back
    /// to their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_512_bits() {
        assert_eq!(BindingConfig::default().threshold_bits, 512);
    }

    #[test]
    fn toml_overrides_the_threshold() {
        let config = BindingConfig::from_toml_str("threshold_bits = 2048").expect("valid toml");
        assert_eq!(config.threshold_bits, 2048);

        let config = BindingConfig::from_toml_str("").expect("empty toml");
        assert_eq!(config, BindingConfig::default());
    }
}
