//! Attribute type catalog
//!
//! The catalog is fixed when the registry is built. Its size and ordering never
//! change afterwards, so index lookups are stable for the registry's lifetime.

use attest_core::{AttestError, AttestResult, AttributeTypeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Name of the whitehat attribute type in the default catalog.
pub const WHITEHAT_NAME: &str = "whitehat";
/// Name of the blackhat attribute type in the default catalog.
pub const BLACKHAT_NAME: &str = "blackhat";
/// Identifier of the whitehat attribute type in the default catalog.
pub const WHITEHAT_ID: AttributeTypeId = AttributeTypeId(8008);
/// Identifier of the blackhat attribute type in the default catalog.
pub const BLACKHAT_ID: AttributeTypeId = AttributeTypeId(1337);

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeType {
    /// Identifier used in attributions
    pub id: AttributeTypeId,
    /// Human-readable name
    pub name: String,
}

impl AttributeType {
    /// Create a new catalog entry.
    pub fn new(id: AttributeTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Ordered, immutable list of attribute types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeCatalog {
    types: Vec<AttributeType>,
}

impl AttributeCatalog {
    /// Build a catalog. Empty lists and duplicate identifiers are rejected.
    pub fn new(types: Vec<AttributeType>) -> AttestResult<Self> {
        if types.is_empty() {
            return Err(AttestError::invalid(
                "attribute catalog must contain at least one type",
            ));
        }

        let mut seen = BTreeSet::new();
        for attribute_type in &types {
            if !seen.insert(attribute_type.id) {
                return Err(AttestError::invalid(format!(
                    "duplicate attribute type id {}",
                    attribute_type.id
                )));
            }
        }

        Ok(Self { types })
    }

    /// The two-type catalog used by the hat workflow: `[8008 whitehat, 1337 blackhat]`.
    pub fn hats() -> Self {
        Self {
            types: vec![
                AttributeType::new(WHITEHAT_ID, WHITEHAT_NAME),
                AttributeType::new(BLACKHAT_ID, BLACKHAT_NAME),
            ],
        }
    }

    /// Number of attribute types.
    pub fn count(&self) -> usize {
        self.types.len()
    }

    /// Identifier at ordinal `index`.
    pub fn attribute_type_id(&self, index: usize) -> AttestResult<AttributeTypeId> {
        self.types
            .get(index)
            .map(|attribute_type| attribute_type.id)
            .ok_or_else(|| {
                AttestError::out_of_range(i64::try_from(index).unwrap_or(i64::MAX), self.count())
            })
    }

    /// Identifier at a signed ordinal; negative indices are out of range.
    pub fn attribute_type_id_signed(&self, index: i64) -> AttestResult<AttributeTypeId> {
        match usize::try_from(index) {
            Ok(index) => self.attribute_type_id(index),
            Err(_) => Err(AttestError::out_of_range(index, self.count())),
        }
    }

    /// Whether `id` is in the catalog.
    pub fn contains(&self, id: AttributeTypeId) -> bool {
        self.types.iter().any(|attribute_type| attribute_type.id == id)
    }

    /// Catalog entry for `id`.
    pub fn get(&self, id: AttributeTypeId) -> Option<&AttributeType> {
        self.types.iter().find(|attribute_type| attribute_type.id == id)
    }

    /// Catalog entry with the given name.
    pub fn by_name(&self, name: &str) -> Option<&AttributeType> {
        self.types
            .iter()
            .find(|attribute_type| attribute_type.name == name)
    }

    /// Name of `id`, if catalogued.
    pub fn name_of(&self, id: AttributeTypeId) -> Option<&str> {
        self.get(id).map(|attribute_type| attribute_type.name.as_str())
    }

    /// Entries in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeType> {
        self.types.iter()
    }
}

impl<'de> Deserialize<'de> for AttributeCatalog {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            types: Vec<AttributeType>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.types).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_hat_catalog() {
        let catalog = AttributeCatalog::hats();
        assert_eq!(catalog.count(), 2);
        assert_eq!(catalog.attribute_type_id(0).unwrap(), WHITEHAT_ID);
        assert_eq!(catalog.attribute_type_id(1).unwrap(), BLACKHAT_ID);
        assert_eq!(catalog.name_of(BLACKHAT_ID), Some(BLACKHAT_NAME));
        assert_eq!(catalog.by_name(WHITEHAT_NAME).map(|t| t.id), Some(WHITEHAT_ID));
    }

    #[test]
    fn test_index_out_of_range() {
        let catalog = AttributeCatalog::hats();
        assert_matches!(
            catalog.attribute_type_id(2),
            Err(AttestError::OutOfRange { index: 2, count: 2 })
        );
        assert_matches!(
            catalog.attribute_type_id_signed(-1),
            Err(AttestError::OutOfRange { index: -1, count: 2 })
        );
        assert_eq!(catalog.attribute_type_id_signed(1).unwrap(), BLACKHAT_ID);
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert_matches!(AttributeCatalog::new(Vec::new()), Err(AttestError::Invalid { .. }));
        assert_matches!(
            AttributeCatalog::new(vec![
                AttributeType::new(AttributeTypeId(1), "a"),
                AttributeType::new(AttributeTypeId(1), "b"),
            ]),
            Err(AttestError::Invalid { .. })
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"types":[]}"#;
        assert!(serde_json::from_str::<AttributeCatalog>(json).is_err());

        let json = serde_json::to_string(&AttributeCatalog::hats()).unwrap();
        let back: AttributeCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AttributeCatalog::hats());
    }
}
