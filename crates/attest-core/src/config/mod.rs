//! Core configuration traits for attest configuration types

mod validation;

pub use validation::{ConfigValidator, ValidationError, ValidationResult};

use crate::AttestError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Core trait for attest configuration types
///
/// Loading order is defaults, then file, then environment, then validation.
pub trait AttestConfig: Clone + Default + DeserializeOwned + Send + Sync + 'static {
    /// Load configuration from a `.toml` or `.json` file
    fn load_from_file(path: &Path) -> Result<Self, AttestError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AttestError::storage(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        parse_config(path, &content)
    }

    /// Merge with environment variables
    fn merge_with_env(&mut self) -> Result<(), AttestError>;

    /// Validate the configuration
    fn validate(&self) -> Result<(), AttestError>;

    /// Build the effective configuration from an optional file path.
    fn load(path: Option<&Path>) -> Result<Self, AttestError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }
}

/// Parse configuration text, choosing the format from the file extension.
pub fn parse_config<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, AttestError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(content)
            .map_err(|e| AttestError::invalid(format!("Invalid TOML: {e}"))),
        Some("json") => serde_json::from_str(content)
            .map_err(|e| AttestError::invalid(format!("Invalid JSON: {e}"))),
        _ => Err(AttestError::invalid(format!(
            "unsupported config format: {}",
            path.display()
        ))),
    }
}
