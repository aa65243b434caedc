//! Error types for building, validating and exporting nonce-setup vectors.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

use thiserror::Error;

/// Errors produced by this crate.
///
/// Expected statuses inside the table are data, never errors. This enum only
/// covers failures of the crate's own operations.
#[derive(Debug, Error)]
pub enum VectorError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A shared buffer is too short for the requested slice.
    #[error("Buffer too short for {name}: need {needed} bytes, have {available}")]
    BufferTooShort {
        /// Name of the shared buffer.
        name: &'static str,
        /// Requested length in bytes.
        needed: usize,
        /// Available length in bytes.
        available: usize,
    },

    /// Imported bytes do not match the shared buffer they claim to come from.
    #[error("Record {record}: {name} bytes do not match the shared buffer")]
    ForeignBuffer {
        /// Record description.
        record: String,
        /// Name of the shared buffer.
        name: &'static str,
    },

    /// No nonce length is defined for the key type and algorithm pair.
    #[error("Unsupported key type and algorithm combination: {0}")]
    UnsupportedCombination(String),

    /// A numeric PSA algorithm identifier could not be decoded.
    #[error("Unknown algorithm identifier: {0:#010x}")]
    UnknownAlgorithm(u32),

    /// A numeric PSA status code could not be decoded.
    #[error("Unknown status code: {0}")]
    UnknownStatus(i32),

    /// A numeric PSA key type could not be decoded.
    #[error("Unknown key type: {0:#06x}")]
    UnknownKeyType(u16),

    /// Usage bits outside the known set.
    #[error("Unknown key usage bits: {0:#010x}")]
    UnknownUsage(u32),

    /// Operation-state flag other than 0 (inactive) or 1 (active).
    #[error("Unknown operation state flag: {0}")]
    UnknownOperationState(u32),

    /// The table failed one or more self-consistency checks.
    #[error("Table validation failed with {} violation(s): {}", .0.len(), .0.join("; "))]
    ValidationFailed(Vec<String>),

    /// Hex decoding error.
    #[error("Hex decode error: {0}")]
    HexError(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Logging could not be initialised.
    #[error("Logging initialisation failed: {0}")]
    LoggingError(String),
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, VectorError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failed_lists_violations() {
        let err = VectorError::ValidationFailed(vec!["first".to_string(), "second".to_string()]);
        let msg = err.to_string();
        assert!(msg.contains("2 violation(s)"));
        assert!(msg.contains("first; second"));
    }

    #[test]
    fn test_unknown_algorithm_is_hex_formatted() {
        let err = VectorError::UnknownAlgorithm(0x0550_0100);
        assert_eq!(err.to_string(), "Unknown algorithm identifier: 0x05500100");
    }

    #[test]
    fn test_json_error_converts() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: VectorError = json_err.into();
        assert!(matches!(err, VectorError::Json(_)));
    }
}
