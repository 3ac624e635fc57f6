//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during decoding or text parsing.
///
/// Encoding into an in-memory buffer cannot fail, so every variant here
/// describes malformed input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Unexpected end of input.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Invalid UTF-8 string.
    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    /// A varint ran past the 64-bit range.
    #[error("varint overflows 64 bits")]
    VarintOverflow,

    /// A decoded long does not fit the requested integer width.
    #[error("integer {value} out of range for {target}")]
    IntegerOutOfRange {
        /// The decoded value.
        value: i64,
        /// Name of the target type.
        target: &'static str,
    },

    /// A boolean byte other than 0 or 1.
    #[error("invalid boolean byte 0x{byte:02x}")]
    InvalidBool {
        /// The offending byte.
        byte: u8,
    },

    /// A presence tag byte that is not unset/null/value.
    #[error("invalid presence tag 0x{tag:02x}")]
    InvalidTag {
        /// The offending byte.
        tag: u8,
    },

    /// A negative length or block count.
    #[error("negative length {length}")]
    NegativeLength {
        /// The decoded length.
        length: i64,
    },

    /// A claimed length exceeds the configured limit.
    #[error("size limit exceeded: claimed {claimed}, max allowed {max_allowed}")]
    SizeLimitExceeded {
        /// The length claimed by the input.
        claimed: u64,
        /// The configured maximum.
        max_allowed: u64,
    },

    /// A map contained the same key twice.
    #[error("duplicate map key: {key}")]
    DuplicateKey {
        /// Debug rendering of the repeated key.
        key: String,
    },

    /// Text could not be parsed as the requested kind.
    #[error("cannot parse {input:?} as {kind}: {reason}")]
    Parse {
        /// Name of the target kind.
        kind: &'static str,
        /// The rejected input.
        input: String,
        /// Why parsing failed.
        reason: String,
    },

    /// Bytes remained after the last expected value.
    #[error("{remaining} trailing bytes after decoding")]
    TrailingBytes {
        /// Number of unread bytes.
        remaining: usize,
    },
}

impl CodecError {
    /// Create a parse error.
    pub fn parse(kind: &'static str, input: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            kind,
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a duplicate key error.
    pub fn duplicate_key(key: &impl std::fmt::Debug) -> Self {
        Self::DuplicateKey {
            key: format!("{key:?}"),
        }
    }

    /// Create a size limit error.
    pub fn size_limit(claimed: u64, max_allowed: u64) -> Self {
        Self::SizeLimitExceeded {
            claimed,
            max_allowed,
        }
    }
}
