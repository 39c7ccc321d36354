//! The attribute registry state machine
//!
//! `AttributeRegistry` owns the catalog, the attribution ledger and the fact
//! journal. Reads never fail except where a missing entry is an error
//! (`attribute_type_id`, `attribute_value`). Writes go through `issue` and
//! `revoke`, which consult an `IssuancePolicy` and then apply the approved plan
//! in one step: either every change lands or none does.

use crate::catalog::AttributeCatalog;
use crate::facts::{AttributeFact, FactJournal, FactSequence};
use crate::ledger::AttributeLedger;
use crate::policy::{AttributeView, IssuancePolicy, IssueRequest, RevokeRequest};
use attest_core::{Address, AttestError, AttestResult, AttributeTypeId, AttributeValue};
use tracing::{debug, warn};

/// Read-only query surface shared by every registry handle.
pub trait RegistryInterface {
    /// Number of catalogued attribute types.
    fn count_attribute_types(&self) -> usize;

    /// Attribute type identifier at ordinal `index`.
    fn attribute_type_id(&self, index: usize) -> AttestResult<AttributeTypeId>;

    /// Whether `subject` holds `attribute_type`. Unknown types yield `false`.
    fn has_attribute(&self, subject: Address, attribute_type: AttributeTypeId) -> bool;

    /// Value of the attribution, `NotFound` when absent.
    fn attribute_value(
        &self,
        subject: Address,
        attribute_type: AttributeTypeId,
    ) -> AttestResult<AttributeValue>;
}

/// Outcome of an accepted issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReceipt {
    /// Subject that received the attribute
    pub subject: Address,
    /// Attribute type issued
    pub attribute_type: AttributeTypeId,
    /// Value written
    pub value: AttributeValue,
    /// Value overwritten, if the attribution already existed
    pub previous: Option<AttributeValue>,
    /// Attributions removed in the same step
    pub revoked: Vec<(AttributeTypeId, AttributeValue)>,
    /// Sequence of the issue fact
    pub sequence: FactSequence,
}

/// Outcome of an accepted revocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeReceipt {
    /// Subject that lost the attribute
    pub subject: Address,
    /// Attribute type revoked
    pub attribute_type: AttributeTypeId,
    /// Value the attribution held
    pub value: AttributeValue,
    /// Sequence of the revoke fact
    pub sequence: FactSequence,
}

/// Catalog, attributions, counters and history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRegistry {
    catalog: AttributeCatalog,
    ledger: AttributeLedger,
    journal: FactJournal,
}

impl AttributeRegistry {
    /// Empty registry over `catalog`.
    pub fn new(catalog: AttributeCatalog) -> Self {
        Self {
            catalog,
            ledger: AttributeLedger::new(),
            journal: FactJournal::new(),
        }
    }

    /// Empty registry over the whitehat/blackhat catalog.
    pub fn with_hats() -> Self {
        Self::new(AttributeCatalog::hats())
    }

    pub(crate) fn from_parts(
        catalog: AttributeCatalog,
        ledger: AttributeLedger,
        journal: FactJournal,
    ) -> Self {
        Self {
            catalog,
            ledger,
            journal,
        }
    }

    /// Number of catalogued attribute types.
    pub fn count_attribute_types(&self) -> usize {
        self.catalog.count()
    }

    /// Attribute type identifier at ordinal `index`.
    pub fn attribute_type_id(&self, index: usize) -> AttestResult<AttributeTypeId> {
        self.catalog.attribute_type_id(index)
    }

    /// Attribute type identifier at a signed ordinal; negative is out of range.
    pub fn attribute_type_id_signed(&self, index: i64) -> AttestResult<AttributeTypeId> {
        self.catalog.attribute_type_id_signed(index)
    }

    /// Whether `subject` holds `attribute_type`.
    pub fn has_attribute(&self, subject: Address, attribute_type: AttributeTypeId) -> bool {
        self.ledger.contains(subject, attribute_type)
    }

    /// Value of the attribution, `NotFound` when absent.
    pub fn attribute_value(
        &self,
        subject: Address,
        attribute_type: AttributeTypeId,
    ) -> AttestResult<AttributeValue> {
        self.ledger
            .value(subject, attribute_type)
            .ok_or_else(|| AttestError::not_found(subject, attribute_type))
    }

    /// Number of subjects currently holding `attribute_type`.
    pub fn counter(&self, attribute_type: AttributeTypeId) -> u64 {
        self.ledger.count(attribute_type)
    }

    /// Attributions held by `subject`.
    pub fn attributes_of(&self, subject: Address) -> Vec<(AttributeTypeId, AttributeValue)> {
        self.ledger.attributes_of(subject)
    }

    /// The catalog.
    pub fn catalog(&self) -> &AttributeCatalog {
        &self.catalog
    }

    /// The attribution ledger.
    pub fn ledger(&self) -> &AttributeLedger {
        &self.ledger
    }

    /// Every recorded fact.
    pub fn facts(&self) -> &[AttributeFact] {
        self.journal.facts()
    }

    /// Facts recorded after `sequence`.
    pub fn facts_since(&self, sequence: FactSequence) -> &[AttributeFact] {
        self.journal.since(sequence)
    }

    pub(crate) fn journal(&self) -> &FactJournal {
        &self.journal
    }

    /// Read-only view for policies.
    pub fn view(&self) -> AttributeView<'_> {
        AttributeView::new(&self.catalog, &self.ledger)
    }

    /// Issue an attribute if `policy` approves.
    ///
    /// The attribution is written (counter += 1 when new) and every attribute
    /// type in the approved plan's revoke list that the subject holds is removed
    /// (counter -= 1). Any refusal leaves the registry unchanged.
    pub fn issue<P>(&mut self, request: &IssueRequest, policy: &P) -> AttestResult<IssueReceipt>
    where
        P: IssuancePolicy + ?Sized,
    {
        self.ensure_catalogued(request.attribute_type)?;

        let plan = policy
            .authorize_issue(&self.view(), request)
            .map_err(|err| {
                warn!(
                    caller = %request.caller,
                    subject = %request.subject,
                    attribute_type = %request.attribute_type,
                    error = %err,
                    "issuance refused"
                );
                err
            })?;

        let mut revoke = plan.revoke;
        revoke.sort_unstable();
        revoke.dedup();
        for attribute_type in &revoke {
            self.ensure_catalogued(*attribute_type)?;
            if *attribute_type == request.attribute_type {
                return Err(AttestError::invalid(format!(
                    "issuance plan for {attribute_type} revokes its own attribute type"
                )));
            }
        }

        let mut revoked = Vec::with_capacity(revoke.len());
        for attribute_type in revoke {
            if let Some(value) = self.ledger.remove(request.subject, attribute_type) {
                self.journal
                    .record_revoked(request.subject, attribute_type, value, request.caller);
                debug!(
                    subject = %request.subject,
                    attribute_type = %attribute_type,
                    "superseded attribute revoked"
                );
                revoked.push((attribute_type, value));
            }
        }

        let previous = self
            .ledger
            .insert(request.subject, request.attribute_type, plan.value);
        let sequence = self.journal.record_issued(
            request.subject,
            request.attribute_type,
            plan.value,
            request.caller,
        );

        debug!(
            caller = %request.caller,
            subject = %request.subject,
            attribute_type = %request.attribute_type,
            value = plan.value,
            overwritten = previous.is_some(),
            sequence,
            "attribute issued"
        );

        Ok(IssueReceipt {
            subject: request.subject,
            attribute_type: request.attribute_type,
            value: plan.value,
            previous,
            revoked,
            sequence,
        })
    }

    /// Revoke an attribute if `policy` approves. `NotFound` when not held.
    pub fn revoke<P>(&mut self, request: &RevokeRequest, policy: &P) -> AttestResult<RevokeReceipt>
    where
        P: IssuancePolicy + ?Sized,
    {
        self.ensure_catalogued(request.attribute_type)?;

        policy
            .authorize_revoke(&self.view(), request)
            .map_err(|err| {
                warn!(
                    caller = %request.caller,
                    subject = %request.subject,
                    attribute_type = %request.attribute_type,
                    error = %err,
                    "revocation refused"
                );
                err
            })?;

        let value = self
            .ledger
            .remove(request.subject, request.attribute_type)
            .ok_or_else(|| AttestError::not_found(request.subject, request.attribute_type))?;
        let sequence = self.journal.record_revoked(
            request.subject,
            request.attribute_type,
            value,
            request.caller,
        );

        debug!(
            caller = %request.caller,
            subject = %request.subject,
            attribute_type = %request.attribute_type,
            sequence,
            "attribute revoked"
        );

        Ok(RevokeReceipt {
            subject: request.subject,
            attribute_type: request.attribute_type,
            value,
            sequence,
        })
    }

    /// Whether counters match attributions and the journal is gap-free.
    pub fn is_consistent(&self) -> bool {
        self.ledger.verify_counters() && self.journal.is_contiguous()
    }

    fn ensure_catalogued(&self, attribute_type: AttributeTypeId) -> AttestResult<()> {
        if self.catalog.contains(attribute_type) {
            Ok(())
        } else {
            Err(AttestError::invalid(format!(
                "attribute type {attribute_type} is not in the catalog"
            )))
        }
    }
}

impl Default for AttributeRegistry {
    fn default() -> Self {
        Self::with_hats()
    }
}

impl RegistryInterface for AttributeRegistry {
    fn count_attribute_types(&self) -> usize {
        AttributeRegistry::count_attribute_types(self)
    }

    fn attribute_type_id(&self, index: usize) -> AttestResult<AttributeTypeId> {
        AttributeRegistry::attribute_type_id(self, index)
    }

    fn has_attribute(&self, subject: Address, attribute_type: AttributeTypeId) -> bool {
        AttributeRegistry::has_attribute(self, subject, attribute_type)
    }

    fn attribute_value(
        &self,
        subject: Address,
        attribute_type: AttributeTypeId,
    ) -> AttestResult<AttributeValue> {
        AttributeRegistry::attribute_value(self, subject, attribute_type)
    }
}
