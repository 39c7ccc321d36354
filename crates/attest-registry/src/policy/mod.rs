//! Issuance policies
//!
//! The registry never decides on its own who may change an attribution. Each
//! mutation is checked by an `IssuancePolicy` against a read-only view of the
//! current state. The policy answers with a plan (what to write, what to revoke
//! alongside it) or a refusal; the registry applies the plan atomically.
//!
//! - `AuthorityPolicy`: a single designated issuer may issue and revoke anything
//! - `EnrollmentPolicy`: subjects enroll themselves under per-type rules

pub mod authority;
pub mod enrollment;

pub use authority::AuthorityPolicy;
pub use enrollment::{EnrollmentPolicy, EnrollmentRule};

use crate::catalog::AttributeCatalog;
use crate::ledger::AttributeLedger;
use attest_core::{Address, AttestError, AttestResult, AttributeTypeId, AttributeValue};

/// Read-only view of registry state handed to policies.
#[derive(Debug, Clone, Copy)]
pub struct AttributeView<'a> {
    catalog: &'a AttributeCatalog,
    ledger: &'a AttributeLedger,
}

impl<'a> AttributeView<'a> {
    pub(crate) fn new(catalog: &'a AttributeCatalog, ledger: &'a AttributeLedger) -> Self {
        Self { catalog, ledger }
    }

    /// The registry catalog.
    pub fn catalog(&self) -> &'a AttributeCatalog {
        self.catalog
    }

    /// Whether `subject` holds `attribute_type`.
    pub fn has_attribute(&self, subject: Address, attribute_type: AttributeTypeId) -> bool {
        self.ledger.contains(subject, attribute_type)
    }

    /// Stored value, if any.
    pub fn attribute_value(
        &self,
        subject: Address,
        attribute_type: AttributeTypeId,
    ) -> Option<AttributeValue> {
        self.ledger.value(subject, attribute_type)
    }

    /// Holder count for `attribute_type`.
    pub fn count(&self, attribute_type: AttributeTypeId) -> u64 {
        self.ledger.count(attribute_type)
    }

    /// First of `attribute_types` that `subject` holds.
    pub fn first_held(
        &self,
        subject: Address,
        attribute_types: &[AttributeTypeId],
    ) -> Option<AttributeTypeId> {
        attribute_types
            .iter()
            .copied()
            .find(|attribute_type| self.has_attribute(subject, *attribute_type))
    }
}

/// Request to issue an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueRequest {
    /// Address asking for the change
    pub caller: Address,
    /// Address the attribute is issued to
    pub subject: Address,
    /// Attribute type to issue
    pub attribute_type: AttributeTypeId,
    /// Requested value; policies with a fixed value leave this `None`
    pub value: Option<AttributeValue>,
}

impl IssueRequest {
    /// Issue `value` of `attribute_type` to `subject` on behalf of `caller`.
    pub fn new(
        caller: Address,
        subject: Address,
        attribute_type: AttributeTypeId,
        value: AttributeValue,
    ) -> Self {
        Self {
            caller,
            subject,
            attribute_type,
            value: Some(value),
        }
    }

    /// Caller enrolls itself; the policy picks the value.
    pub fn enroll(caller: Address, attribute_type: AttributeTypeId) -> Self {
        Self {
            caller,
            subject: caller,
            attribute_type,
            value: None,
        }
    }

    /// Refusal for this request.
    pub fn unauthorized(&self, reason: impl Into<String>) -> AttestError {
        AttestError::unauthorized(self.caller, self.attribute_type, reason)
    }
}

/// Request to revoke an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevokeRequest {
    /// Address asking for the change
    pub caller: Address,
    /// Address losing the attribute
    pub subject: Address,
    /// Attribute type to revoke
    pub attribute_type: AttributeTypeId,
}

impl RevokeRequest {
    /// Revoke `attribute_type` from `subject` on behalf of `caller`.
    pub fn new(caller: Address, subject: Address, attribute_type: AttributeTypeId) -> Self {
        Self {
            caller,
            subject,
            attribute_type,
        }
    }

    /// Refusal for this request.
    pub fn unauthorized(&self, reason: impl Into<String>) -> AttestError {
        AttestError::unauthorized(self.caller, self.attribute_type, reason)
    }
}

/// What an approved issuance writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuePlan {
    /// Value stored for the requested attribute
    pub value: AttributeValue,
    /// Attribute types removed from the subject in the same step
    pub revoke: Vec<AttributeTypeId>,
}

impl IssuePlan {
    /// Write `value` and revoke nothing.
    pub fn write(value: AttributeValue) -> Self {
        Self {
            value,
            revoke: Vec::new(),
        }
    }

    /// Also revoke `attribute_types`.
    pub fn revoking(mut self, attribute_types: impl IntoIterator<Item = AttributeTypeId>) -> Self {
        self.revoke.extend(attribute_types);
        self
    }
}

/// Precondition predicate for registry mutations.
pub trait IssuancePolicy: Send + Sync {
    /// Approve an issuance with a plan, or refuse it.
    fn authorize_issue(&self, view: &AttributeView<'_>, request: &IssueRequest)
        -> AttestResult<IssuePlan>;

    /// Approve or refuse a revocation. Refuses unless overridden.
    fn authorize_revoke(
        &self,
        _view: &AttributeView<'_>,
        request: &RevokeRequest,
    ) -> AttestResult<()> {
        Err(request.unauthorized("revocation is not permitted by this policy"))
    }
}

impl<P: IssuancePolicy + ?Sized> IssuancePolicy for &P {
    fn authorize_issue(
        &self,
        view: &AttributeView<'_>,
        request: &IssueRequest,
    ) -> AttestResult<IssuePlan> {
        (**self).authorize_issue(view, request)
    }

    fn authorize_revoke(
        &self,
        view: &AttributeView<'_>,
        request: &RevokeRequest,
    ) -> AttestResult<()> {
        (**self).authorize_revoke(view, request)
    }
}

impl<P: IssuancePolicy + ?Sized> IssuancePolicy for Box<P> {
    fn authorize_issue(
        &self,
        view: &AttributeView<'_>,
        request: &IssueRequest,
    ) -> AttestResult<IssuePlan> {
        (**self).authorize_issue(view, request)
    }

    fn authorize_revoke(
        &self,
        view: &AttributeView<'_>,
        request: &RevokeRequest,
    ) -> AttestResult<()> {
        (**self).authorize_revoke(view, request)
    }
}
