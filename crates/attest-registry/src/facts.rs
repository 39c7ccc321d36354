//! Attribute facts
//!
//! Every state change the registry makes is recorded as an `AttributeFact`.
//! The journal is append-only and sequence numbers start at 1 and increase by
//! one per fact.

use attest_core::{Address, AttributeTypeId, AttributeValue};
use serde::{Deserialize, Serialize};

/// Sequence number of a fact in the journal.
pub type FactSequence = u64;

/// A recorded attribution change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeFact {
    /// An attribution was created or overwritten
    Issued {
        /// Position in the journal
        sequence: FactSequence,
        /// Subject receiving the attribute
        subject: Address,
        /// Attribute type issued
        attribute_type: AttributeTypeId,
        /// Value written
        value: AttributeValue,
        /// Caller that requested the issuance
        issuer: Address,
    },

    /// An attribution was removed
    Revoked {
        /// Position in the journal
        sequence: FactSequence,
        /// Subject losing the attribute
        subject: Address,
        /// Attribute type revoked
        attribute_type: AttributeTypeId,
        /// Value the attribution held when removed
        value: AttributeValue,
        /// Caller whose request caused the removal
        revoker: Address,
    },
}

impl AttributeFact {
    /// Journal position.
    pub fn sequence(&self) -> FactSequence {
        match self {
            AttributeFact::Issued { sequence, .. } | AttributeFact::Revoked { sequence, .. } => {
                *sequence
            }
        }
    }

    /// Subject the fact concerns.
    pub fn subject(&self) -> Address {
        match self {
            AttributeFact::Issued { subject, .. } | AttributeFact::Revoked { subject, .. } => {
                *subject
            }
        }
    }

    /// Attribute type the fact concerns.
    pub fn attribute_type(&self) -> AttributeTypeId {
        match self {
            AttributeFact::Issued { attribute_type, .. }
            | AttributeFact::Revoked { attribute_type, .. } => *attribute_type,
        }
    }

    /// Whether this fact records an issuance.
    pub fn is_issued(&self) -> bool {
        matches!(self, AttributeFact::Issued { .. })
    }
}

/// Append-only list of facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactJournal {
    facts: Vec<AttributeFact>,
}

impl FactJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next fact will receive.
    pub fn next_sequence(&self) -> FactSequence {
        self.last_sequence() + 1
    }

    /// Sequence number of the latest fact, 0 when empty.
    pub fn last_sequence(&self) -> FactSequence {
        self.facts.last().map(AttributeFact::sequence).unwrap_or(0)
    }

    pub(crate) fn record_issued(
        &mut self,
        subject: Address,
        attribute_type: AttributeTypeId,
        value: AttributeValue,
        issuer: Address,
    ) -> FactSequence {
        let sequence = self.next_sequence();
        self.facts.push(AttributeFact::Issued {
            sequence,
            subject,
            attribute_type,
            value,
            issuer,
        });
        sequence
    }

    pub(crate) fn record_revoked(
        &mut self,
        subject: Address,
        attribute_type: AttributeTypeId,
        value: AttributeValue,
        revoker: Address,
    ) -> FactSequence {
        let sequence = self.next_sequence();
        self.facts.push(AttributeFact::Revoked {
            sequence,
            subject,
            attribute_type,
            value,
            revoker,
        });
        sequence
    }

    /// All facts in order.
    pub fn facts(&self) -> &[AttributeFact] {
        &self.facts
    }

    /// Facts with a sequence number greater than `sequence`.
    pub fn since(&self, sequence: FactSequence) -> &[AttributeFact] {
        let start = self.facts.partition_point(|fact| fact.sequence() <= sequence);
        &self.facts[start..]
    }

    /// Number of recorded facts.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether no fact has been recorded.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Whether sequence numbers run 1, 2, 3, ... without gaps.
    pub fn is_contiguous(&self) -> bool {
        self.facts
            .iter()
            .enumerate()
            .all(|(position, fact)| fact.sequence() == position as FactSequence + 1)
    }
}
