//! Unified error system for attest
//!
//! Every registry operation fails with an `AttestError`. The three domain
//! conditions (`OutOfRange`, `NotFound`, `Unauthorized`) carry structured
//! fields so callers can branch on the failure kind; the remaining variants
//! cover construction, configuration and persistence.

use crate::identifiers::{Address, AttributeTypeId};
use serde::{Deserialize, Serialize};

/// Unified error type for all attest operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AttestError {
    /// Catalog index query beyond the catalog bounds
    #[error("attribute type index {index} out of range (catalog has {count} types)")]
    OutOfRange {
        /// Requested index, signed so negative CLI input is reportable
        index: i64,
        /// Catalog size at the time of the query
        count: usize,
    },

    /// Value query or revocation for an attribution that does not exist
    #[error("{subject} does not hold attribute type {attribute_type}")]
    NotFound {
        /// Subject that was queried
        subject: Address,
        /// Attribute type that was queried
        attribute_type: AttributeTypeId,
    },

    /// Issuance or revocation refused by the active policy
    #[error("{caller} not authorized for attribute type {attribute_type}: {reason}")]
    Unauthorized {
        /// Caller whose request was refused
        caller: Address,
        /// Attribute type the request targeted
        attribute_type: AttributeTypeId,
        /// Which precondition failed
        reason: String,
    },

    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Storage operation failed
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },
}

impl AttestError {
    /// Create an out of range error
    pub fn out_of_range(index: i64, count: usize) -> Self {
        Self::OutOfRange { index, count }
    }

    /// Create a not found error
    pub fn not_found(subject: Address, attribute_type: AttributeTypeId) -> Self {
        Self::NotFound {
            subject,
            attribute_type,
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(
        caller: Address,
        attribute_type: AttributeTypeId,
        reason: impl Into<String>,
    ) -> Self {
        Self::Unauthorized {
            caller,
            attribute_type,
            reason: reason.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Whether retrying the same call can succeed once external state changes.
    ///
    /// `OutOfRange` and `NotFound` are deterministic for fixed inputs.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Standard Result type for attest operations
pub type AttestResult<T> = std::result::Result<T, AttestError>;

impl From<std::io::Error> for AttestError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::InvalidData => Self::serialization(err.to_string()),
            _ => Self::storage(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AttestError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AttestError::out_of_range(2, 2);
        assert_eq!(
            err.to_string(),
            "attribute type index 2 out of range (catalog has 2 types)"
        );

        let err = AttestError::not_found(Address::from_seed(1), AttributeTypeId(8008));
        assert!(err.to_string().contains("8008"));

        let err =
            AttestError::unauthorized(Address::from_seed(2), AttributeTypeId(8008), "blocked");
        assert!(err.to_string().contains("blocked"));
    }

    #[test]
    fn test_only_unauthorized_is_retryable() {
        assert!(AttestError::unauthorized(Address::ZERO, AttributeTypeId(1), "x").is_retryable());
        assert!(!AttestError::out_of_range(-1, 2).is_retryable());
        assert!(!AttestError::not_found(Address::ZERO, AttributeTypeId(1)).is_retryable());
        assert!(!AttestError::invalid("x").is_retryable());
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(AttestError::from(io_err), AttestError::Storage { .. }));
    }

    #[test]
    fn test_error_serde() {
        let err = AttestError::not_found(Address::from_seed(3), AttributeTypeId(1337));
        let json = serde_json::to_string(&err).unwrap();
        let back: AttestError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
