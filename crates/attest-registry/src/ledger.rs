//! Attribution ledger
//!
//! Holds every `(subject, attribute type) -> value` attribution together with a
//! per-type holder counter. Counters are a cache of the entry map and are kept
//! equal to it by `insert` and `remove`, the only mutators.

use attest_core::{Address, AttributeTypeId, AttributeValue};
use std::collections::BTreeMap;

/// Attributions plus per-type holder counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeLedger {
    entries: BTreeMap<(Address, AttributeTypeId), AttributeValue>,
    counters: BTreeMap<AttributeTypeId, u64>,
}

impl AttributeLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from raw entries, deriving counters from them.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (Address, AttributeTypeId, AttributeValue)>,
    ) -> Self {
        let mut ledger = Self::new();
        for (subject, attribute_type, value) in entries {
            ledger.insert(subject, attribute_type, value);
        }
        ledger
    }

    /// Write an attribution, returning the value it replaced.
    ///
    /// The type's counter grows only when the attribution is new.
    pub(crate) fn insert(
        &mut self,
        subject: Address,
        attribute_type: AttributeTypeId,
        value: AttributeValue,
    ) -> Option<AttributeValue> {
        let previous = self.entries.insert((subject, attribute_type), value);
        if previous.is_none() {
            *self.counters.entry(attribute_type).or_insert(0) += 1;
        }
        previous
    }

    /// Remove an attribution, returning its value if it existed.
    pub(crate) fn remove(
        &mut self,
        subject: Address,
        attribute_type: AttributeTypeId,
    ) -> Option<AttributeValue> {
        let removed = self.entries.remove(&(subject, attribute_type))?;
        if let Some(count) = self.counters.get_mut(&attribute_type) {
            debug_assert!(*count > 0, "counter for {attribute_type} underflowed");
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.counters.remove(&attribute_type);
            }
        }
        Some(removed)
    }

    /// Whether `subject` holds `attribute_type`.
    pub fn contains(&self, subject: Address, attribute_type: AttributeTypeId) -> bool {
        self.entries.contains_key(&(subject, attribute_type))
    }

    /// Stored value, if the attribution exists.
    pub fn value(
        &self,
        subject: Address,
        attribute_type: AttributeTypeId,
    ) -> Option<AttributeValue> {
        self.entries.get(&(subject, attribute_type)).copied()
    }

    /// Number of subjects currently holding `attribute_type`.
    pub fn count(&self, attribute_type: AttributeTypeId) -> u64 {
        self.counters.get(&attribute_type).copied().unwrap_or(0)
    }

    /// Attributions held by `subject`, ordered by type id.
    pub fn attributes_of(&self, subject: Address) -> Vec<(AttributeTypeId, AttributeValue)> {
        self.entries
            .range((subject, AttributeTypeId(u64::MIN))..=(subject, AttributeTypeId(u64::MAX)))
            .map(|((_, attribute_type), value)| (*attribute_type, *value))
            .collect()
    }

    /// All attributions in `(subject, type)` order.
    pub fn iter(&self) -> impl Iterator<Item = (Address, AttributeTypeId, AttributeValue)> + '_ {
        self.entries
            .iter()
            .map(|((subject, attribute_type), value)| (*subject, *attribute_type, *value))
    }

    /// Total number of attributions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger holds no attributions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every counter equals the number of entries of its type.
    pub fn verify_counters(&self) -> bool {
        let mut recounted: BTreeMap<AttributeTypeId, u64> = BTreeMap::new();
        for (_, attribute_type) in self.entries.keys() {
            *recounted.entry(*attribute_type).or_insert(0) += 1;
        }
        recounted == self.counters
    }
}
