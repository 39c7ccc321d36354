//! Attest Core - Foundation Types
//!
//! Shared vocabulary for the attribute registry crates:
//!
//! - `Address`: 20-byte subject and caller identity
//! - `AttributeTypeId`, `AttributeValue`: catalog identifiers and attribution values
//! - `AttestError`: the single error type every registry operation returns
//! - `AttestConfig`, `ConfigValidator`: configuration loading and validation
//!
//! This crate holds no registry state. The state machine lives in `attest-registry`.

#![forbid(unsafe_code)]

/// Subject, caller and attribute identifiers
pub mod identifiers;

/// Unified error handling
pub mod errors;

/// Configuration traits and validation
pub mod config;

/// Internal test utilities
#[doc(hidden)]
pub mod test_utils;

pub use config::{AttestConfig, ConfigValidator, ValidationError};
pub use errors::{AttestError, AttestResult};
pub use identifiers::{Address, AttributeTypeId, AttributeValue};
