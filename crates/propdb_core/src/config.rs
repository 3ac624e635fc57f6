//! Runtime configuration.

use crate::error::{CoreError, CoreResult};
use propdb_codec::{DecodeLimits, MAX_BYTES_LENGTH, MAX_CONTAINER_ELEMENTS};
use serde::Deserialize;

/// Configuration for decoding stored records.
///
/// Loading it (from a file, the environment, ...) is the embedding
/// application's job; it derives `Deserialize` for that purpose.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of items in one list or map property.
    pub max_collection_len: u64,

    /// Maximum length in bytes of one string.
    pub max_text_len: u64,

    /// Whether bytes left over after the last property fail the decode.
    pub reject_trailing_bytes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_collection_len: MAX_CONTAINER_ELEMENTS,
            max_text_len: MAX_BYTES_LENGTH,
            reject_trailing_bytes: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum collection length.
    #[must_use]
    pub const fn max_collection_len(mut self, value: u64) -> Self {
        self.max_collection_len = value;
        self
    }

    /// Sets the maximum string length.
    #[must_use]
    pub const fn max_text_len(mut self, value: u64) -> Self {
        self.max_text_len = value;
        self
    }

    /// Sets whether trailing bytes are an error.
    #[must_use]
    pub const fn reject_trailing_bytes(mut self, value: bool) -> Self {
        self.reject_trailing_bytes = value;
        self
    }

    /// Checks that the limits are usable.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] when a limit is zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_collection_len == 0 {
            return Err(CoreError::invalid_config("max_collection_len must be positive"));
        }
        if self.max_text_len == 0 {
            return Err(CoreError::invalid_config("max_text_len must be positive"));
        }
        Ok(())
    }

    /// Decoder limits derived from this configuration.
    pub fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_collection_len: self.max_collection_len,
            max_text_len: self.max_text_len,
        }
    }
}
