//! Registry snapshots
//!
//! A snapshot captures the catalog, every attribution and the fact journal.
//! Counters are not stored; restoring rebuilds them from the attributions.

use crate::catalog::AttributeCatalog;
use crate::facts::FactJournal;
use crate::ledger::AttributeLedger;
use crate::registry::AttributeRegistry;
use attest_core::{Address, AttestError, AttestResult, AttributeTypeId, AttributeValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// Snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// One stored attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionRecord {
    /// Attribute holder
    pub subject: Address,
    /// Attribute type held
    pub attribute_type: AttributeTypeId,
    /// Stored value
    pub value: AttributeValue,
}

/// Serializable registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Format version
    pub version: u32,
    /// Attribute type catalog
    pub catalog: AttributeCatalog,
    /// All attributions in `(subject, type)` order
    pub attributions: Vec<AttributionRecord>,
    /// History of attribution changes
    #[serde(default)]
    pub facts: FactJournal,
}

impl RegistrySnapshot {
    /// Capture `registry`.
    pub fn capture(registry: &AttributeRegistry) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            catalog: registry.catalog().clone(),
            attributions: registry
                .ledger()
                .iter()
                .map(|(subject, attribute_type, value)| AttributionRecord {
                    subject,
                    attribute_type,
                    value,
                })
                .collect(),
            facts: registry.journal().clone(),
        }
    }

    /// Rebuild a registry.
    pub fn restore(self) -> AttestResult<AttributeRegistry> {
        if self.version != SNAPSHOT_VERSION {
            return Err(AttestError::invalid(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                self.version
            )));
        }

        let mut seen = BTreeSet::new();
        for record in &self.attributions {
            if !self.catalog.contains(record.attribute_type) {
                return Err(AttestError::invalid(format!(
                    "snapshot attribution for {} references unknown attribute type {}",
                    record.subject, record.attribute_type
                )));
            }
            if !seen.insert((record.subject, record.attribute_type)) {
                return Err(AttestError::invalid(format!(
                    "snapshot holds attribute type {} twice for {}",
                    record.attribute_type, record.subject
                )));
            }
        }
        if !self.facts.is_contiguous() {
            return Err(AttestError::invalid("snapshot fact journal has sequence gaps"));
        }

        let ledger = AttributeLedger::from_entries(
            self.attributions
                .iter()
                .map(|record| (record.subject, record.attribute_type, record.value)),
        );
        Ok(AttributeRegistry::from_parts(self.catalog, ledger, self.facts))
    }

    /// Write as pretty JSON, replacing `path` atomically.
    pub fn save_json(&self, path: &Path) -> AttestResult<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AttestError::storage(format!(
                    "failed to create state directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let staging = path.with_extension("json.tmp");
        std::fs::write(&staging, json).map_err(|e| {
            AttestError::storage(format!("failed to write {}: {e}", staging.display()))
        })?;
        std::fs::rename(&staging, path).map_err(|e| {
            AttestError::storage(format!("failed to replace {}: {e}", path.display()))
        })?;

        info!(
            path = %path.display(),
            attributions = self.attributions.len(),
            facts = self.facts.len(),
            "registry snapshot saved"
        );
        Ok(())
    }

    /// Read a JSON snapshot.
    pub fn load_json(path: &Path) -> AttestResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AttestError::storage(format!("failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            AttestError::serialization(format!("invalid snapshot {}: {e}", path.display()))
        })
    }
}

impl AttributeRegistry {
    /// Capture this registry as a snapshot.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::HatWorkflow;
    use assert_matches::assert_matches;
    use attest_core::test_utils::{test_address, BLACKHAT, WHITEHAT};

    fn populated() -> AttributeRegistry {
        let workflow = HatWorkflow::default();
        let mut registry = AttributeRegistry::with_hats();
        workflow.join_whitehats(&mut registry, test_address(1)).unwrap();
        workflow.join_blackhats(&mut registry, test_address(1)).unwrap();
        workflow.join_whitehats(&mut registry, test_address(2)).unwrap();
        registry
    }

    #[test]
    fn test_restore_rebuilds_counters() {
        let registry = populated();
        let restored = registry.snapshot().restore().unwrap();

        assert_eq!(restored, registry);
        assert_eq!(restored.counter(WHITEHAT), 1);
        assert_eq!(restored.counter(BLACKHAT), 1);
        assert!(restored.is_consistent());
    }

    #[test]
    fn test_restore_rejects_unknown_types_and_duplicates() {
        let mut snapshot = populated().snapshot();
        snapshot.attributions.push(AttributionRecord {
            subject: test_address(3),
            attribute_type: AttributeTypeId(42),
            value: 1,
        });
        assert_matches!(snapshot.restore(), Err(AttestError::Invalid { .. }));

        let mut snapshot = populated().snapshot();
        let duplicate = snapshot.attributions[0];
        snapshot.attributions.push(duplicate);
        assert_matches!(snapshot.restore(), Err(AttestError::Invalid { .. }));

        let mut snapshot = populated().snapshot();
        snapshot.version = 99;
        assert_matches!(snapshot.restore(), Err(AttestError::Invalid { .. }));
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let registry = populated();

        registry.snapshot().save_json(&path).unwrap();
        let restored = RegistrySnapshot::load_json(&path).unwrap().restore().unwrap();
        assert_eq!(restored, registry);
        assert_eq!(restored.facts().len(), registry.facts().len());
    }

    #[test]
    fn test_load_missing_or_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        assert_matches!(RegistrySnapshot::load_json(&path), Err(AttestError::Storage { .. }));

        std::fs::write(&path, "{not json").unwrap();
        assert_matches!(
            RegistrySnapshot::load_json(&path),
            Err(AttestError::Serialization { .. })
        );
    }
}
