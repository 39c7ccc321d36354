//! Registry configuration
//!
//! ```toml
//! issuer = "0x0101010101010101010101010101010101010101"
//! state_path = ".attest/state.json"
//! log_level = "info"
//!
//! [[attribute_types]]
//! id = 8008
//! name = "whitehat"
//!
//! [[attribute_types]]
//! id = 1337
//! name = "blackhat"
//!
//! [[enrollment]]
//! attribute_type = 8008
//! blocked_by = [1337]
//!
//! [[enrollment]]
//! attribute_type = 1337
//! supersedes = [8008]
//! ```

use crate::catalog::{AttributeCatalog, AttributeType};
use crate::policy::{AuthorityPolicy, EnrollmentPolicy, EnrollmentRule};
use crate::registry::AttributeRegistry;
use crate::workflow::HatWorkflow;
use attest_core::{Address, AttestConfig, AttestError, AttestResult, ConfigValidator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Environment variable overriding `state_path`.
pub const ENV_STATE_PATH: &str = "ATTEST_STATE_PATH";
/// Environment variable overriding `log_level`.
pub const ENV_LOG_LEVEL: &str = "ATTEST_LOG_LEVEL";
/// Environment variable overriding `issuer`.
pub const ENV_ISSUER: &str = "ATTEST_ISSUER";

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Ordered attribute type catalog
    pub attribute_types: Vec<AttributeType>,
    /// Designated issuer for direct issuance and revocation
    pub issuer: Option<Address>,
    /// Self-enrollment rules
    pub enrollment: Vec<EnrollmentRule>,
    /// Where the registry state is persisted
    pub state_path: PathBuf,
    /// Default tracing filter
    pub log_level: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let workflow = HatWorkflow::default();
        Self {
            attribute_types: AttributeCatalog::hats().iter().cloned().collect(),
            issuer: None,
            enrollment: workflow.policy().rules().cloned().collect(),
            state_path: PathBuf::from(".attest/state.json"),
            log_level: "info".to_string(),
        }
    }
}

impl AttestConfig for RegistryConfig {
    fn merge_with_env(&mut self) -> Result<(), AttestError> {
        self.merge_with_vars(|key| std::env::var(key).ok())
    }

    fn validate(&self) -> Result<(), AttestError> {
        let mut validator = ConfigValidator::new();
        validator.non_empty("attribute_types", &self.attribute_types);
        validator.unique("attribute_types.id", &self.attribute_types, |t| t.id);
        validator.unique("attribute_types.name", &self.attribute_types, |t| t.name.clone());
        validator.unique("enrollment.attribute_type", &self.enrollment, |rule| {
            rule.attribute_type
        });
        validator.custom(
            "issuer",
            &self.issuer,
            |issuer| !issuer.is_some_and(|address| address.is_zero()),
            "must not be the null address",
        );
        validator.custom(
            "log_level",
            &self.log_level,
            |level| !level.trim().is_empty(),
            "must not be empty",
        );

        let known: BTreeSet<_> = self.attribute_types.iter().map(|t| t.id).collect();
        validator.each("enrollment", &self.enrollment, |v, _, rule| {
            v.custom(
                "attribute_type",
                &rule.attribute_type,
                |id| known.contains(id),
                "not in the attribute type catalog",
            );
            v.custom(
                "blocked_by",
                &rule.blocked_by,
                |ids| ids.iter().all(|id| known.contains(id)),
                "references an attribute type outside the catalog",
            );
            v.custom(
                "supersedes",
                &rule.supersedes,
                |ids| ids.iter().all(|id| known.contains(id)),
                "references an attribute type outside the catalog",
            );
            v.custom(
                "blocked_by",
                &rule.blocked_by,
                |ids| !ids.contains(&rule.attribute_type),
                "a rule cannot block its own attribute type",
            );
            v.custom(
                "supersedes",
                &rule.supersedes,
                |ids| !ids.contains(&rule.attribute_type),
                "a rule cannot supersede its own attribute type",
            );
        });

        validator.result().map_err(Into::into)
    }
}

impl RegistryConfig {
    /// Apply overrides from a variable lookup.
    pub fn merge_with_vars(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), AttestError> {
        if let Some(path) = lookup(ENV_STATE_PATH) {
            self.state_path = PathBuf::from(path);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(issuer) = lookup(ENV_ISSUER) {
            let issuer = issuer
                .parse()
                .map_err(|e| AttestError::invalid(format!("invalid {ENV_ISSUER}: {e}")))?;
            self.issuer = Some(issuer);
        }
        Ok(())
    }

    /// Attribute type catalog.
    pub fn catalog(&self) -> AttestResult<AttributeCatalog> {
        AttributeCatalog::new(self.attribute_types.clone())
    }

    /// Empty registry over the configured catalog.
    pub fn build_registry(&self) -> AttestResult<AttributeRegistry> {
        Ok(AttributeRegistry::new(self.catalog()?))
    }

    /// Self-enrollment policy from the configured rules.
    pub fn enrollment_policy(&self) -> EnrollmentPolicy {
        EnrollmentPolicy::new(self.enrollment.iter().cloned())
    }

    /// Designated issuer policy, if an issuer is configured.
    pub fn authority_policy(&self) -> Option<AuthorityPolicy> {
        self.issuer.map(AuthorityPolicy::new)
    }

    /// Hat workflow over the configured catalog and enrollment rules.
    pub fn hat_workflow(&self) -> AttestResult<HatWorkflow> {
        let probe = HatWorkflow::from_catalog(&self.catalog()?, 1)?;
        Ok(HatWorkflow::with_policy(
            probe.whitehat(),
            probe.blackhat(),
            self.enrollment_policy(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use attest_core::test_utils::{test_address, BLACKHAT, WHITEHAT};
    use attest_core::AttributeTypeId;
    use std::collections::HashMap;

    #[test]
    fn test_default_is_valid_hat_setup() {
        let config = RegistryConfig::default();
        config.validate().unwrap();

        let registry = config.build_registry().unwrap();
        assert_eq!(registry.attribute_type_id(0).unwrap(), WHITEHAT);
        assert_eq!(registry.attribute_type_id(1).unwrap(), BLACKHAT);

        let workflow = config.hat_workflow().unwrap();
        assert_eq!(workflow, HatWorkflow::default());
        assert!(config.authority_policy().is_none());
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
            issuer = "0x0909090909090909090909090909090909090909"
            log_level = "debug"

            [[attribute_types]]
            id = 8008
            name = "whitehat"

            [[attribute_types]]
            id = 1337
            name = "blackhat"

            [[enrollment]]
            attribute_type = 8008
            value = 2
            blocked_by = [1337]
        "#;
        let config: RegistryConfig = toml::from_str(text).unwrap();
        config.validate().unwrap();

        assert_eq!(config.issuer, Some(test_address(9)));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.enrollment.len(), 1);
        assert_eq!(config.enrollment[0].value, 2);
        assert_eq!(config.state_path, PathBuf::from(".attest/state.json"));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = RegistryConfig::default();
        config.attribute_types.clear();
        config.enrollment.clear();
        assert_matches!(config.validate(), Err(AttestError::Invalid { .. }));

        let mut config = RegistryConfig::default();
        config.attribute_types.push(AttributeType::new(WHITEHAT, "again"));
        assert_matches!(config.validate(), Err(AttestError::Invalid { .. }));

        let mut config = RegistryConfig::default();
        config.enrollment[0].supersedes.push(AttributeTypeId(99));
        assert_matches!(
            config.validate(),
            Err(AttestError::Invalid { message }) if message.contains("supersedes")
        );

        let config = RegistryConfig {
            issuer: Some(Address::ZERO),
            ..RegistryConfig::default()
        };
        assert_matches!(
            config.validate(),
            Err(AttestError::Invalid { message }) if message.contains("issuer")
        );

        let mut config = RegistryConfig::default();
        let own = config.enrollment[0].attribute_type;
        config.enrollment[0].blocked_by.push(own);
        assert_matches!(config.validate(), Err(AttestError::Invalid { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_STATE_PATH, "/tmp/attest.json"),
            (ENV_LOG_LEVEL, "trace"),
            (ENV_ISSUER, "0x0101010101010101010101010101010101010101"),
        ]);
        let mut config = RegistryConfig::default();
        config
            .merge_with_vars(|key| vars.get(key).map(|value| value.to_string()))
            .unwrap();

        assert_eq!(config.state_path, PathBuf::from("/tmp/attest.json"));
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.issuer, Some(test_address(1)));

        let mut config = RegistryConfig::default();
        assert_matches!(
            config.merge_with_vars(|key| (key == ENV_ISSUER).then(|| "nope".to_string())),
            Err(AttestError::Invalid { .. })
        );
    }
}
