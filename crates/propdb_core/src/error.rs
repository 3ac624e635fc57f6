//! Error types for propdb core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in propdb core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Binary or text codec error.
    #[error("codec error: {0}")]
    Codec(#[from] propdb_codec::CodecError),

    /// A property name was registered twice on one record type.
    #[error("duplicate property {name:?}: property names must be unique within a record")]
    DuplicateProperty {
        /// The repeated name.
        name: String,
    },

    /// No property with the given name exists on the record.
    #[error("unknown property {name:?}")]
    UnknownProperty {
        /// The requested name.
        name: String,
    },

    /// A stored modification timestamp cannot be parsed.
    ///
    /// This points at storage corruption rather than bad user input.
    #[error("corrupt modification timestamp [{raw}], expected format [{expected_format}]: {reason}")]
    CorruptTimestamp {
        /// The stored raw value.
        raw: i64,
        /// The format the value should follow.
        expected_format: &'static str,
        /// Why parsing failed.
        reason: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates a duplicate property error.
    pub fn duplicate_property(name: impl Into<String>) -> Self {
        Self::DuplicateProperty { name: name.into() }
    }

    /// Creates an unknown property error.
    pub fn unknown_property(name: impl Into<String>) -> Self {
        Self::UnknownProperty { name: name.into() }
    }

    /// Creates a corrupt timestamp error.
    pub fn corrupt_timestamp(raw: i64, reason: impl Into<String>) -> Self {
        Self::CorruptTimestamp {
            raw,
            expected_format: crate::time::ENCODED_FORMAT,
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
