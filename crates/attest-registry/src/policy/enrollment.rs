//! Self-enrollment policy
//!
//! Subjects enroll themselves into an attribute type. Each enrollable type has
//! a rule naming the value it is issued with, the types that block enrollment,
//! and the types that enrollment supersedes (revokes in the same step).

use super::{AttributeView, IssuancePolicy, IssuePlan, IssueRequest};
use attest_core::{AttestResult, AttributeTypeId, AttributeValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Enrollment rule for one attribute type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRule {
    /// Attribute type this rule enrolls into
    pub attribute_type: AttributeTypeId,
    /// Value issued on enrollment
    #[serde(default = "default_enrollment_value")]
    pub value: AttributeValue,
    /// Holding any of these refuses enrollment
    #[serde(default)]
    pub blocked_by: Vec<AttributeTypeId>,
    /// Held types among these are revoked on enrollment
    #[serde(default)]
    pub supersedes: Vec<AttributeTypeId>,
}

fn default_enrollment_value() -> AttributeValue {
    1
}

impl EnrollmentRule {
    /// Rule with no blockers and no supersession.
    pub fn new(attribute_type: AttributeTypeId, value: AttributeValue) -> Self {
        Self {
            attribute_type,
            value,
            blocked_by: Vec::new(),
            supersedes: Vec::new(),
        }
    }

    /// Refuse enrollment while the subject holds `attribute_type`.
    pub fn blocked_by(mut self, attribute_type: AttributeTypeId) -> Self {
        self.blocked_by.push(attribute_type);
        self
    }

    /// Revoke `attribute_type` from the subject on enrollment.
    pub fn supersedes(mut self, attribute_type: AttributeTypeId) -> Self {
        self.supersedes.push(attribute_type);
        self
    }
}

/// Self-enrollment under per-type rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentPolicy {
    rules: BTreeMap<AttributeTypeId, EnrollmentRule>,
}

impl EnrollmentPolicy {
    /// Policy from a list of rules. A later rule for the same type replaces an earlier one.
    pub fn new(rules: impl IntoIterator<Item = EnrollmentRule>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|rule| (rule.attribute_type, rule))
                .collect(),
        }
    }

    /// The hat workflow: whitehat is closed to blackhats, blackhat replaces whitehat.
    pub fn hats(
        whitehat: AttributeTypeId,
        blackhat: AttributeTypeId,
        value: AttributeValue,
    ) -> Self {
        Self::new([
            EnrollmentRule::new(whitehat, value).blocked_by(blackhat),
            EnrollmentRule::new(blackhat, value).supersedes(whitehat),
        ])
    }

    /// Rule for `attribute_type`, if enrollable.
    pub fn rule(&self, attribute_type: AttributeTypeId) -> Option<&EnrollmentRule> {
        self.rules.get(&attribute_type)
    }

    /// All rules ordered by type id.
    pub fn rules(&self) -> impl Iterator<Item = &EnrollmentRule> {
        self.rules.values()
    }
}

impl IssuancePolicy for EnrollmentPolicy {
    fn authorize_issue(
        &self,
        view: &AttributeView<'_>,
        request: &IssueRequest,
    ) -> AttestResult<IssuePlan> {
        let rule = self
            .rule(request.attribute_type)
            .ok_or_else(|| request.unauthorized("attribute type is not open for enrollment"))?;

        if request.caller != request.subject {
            return Err(request.unauthorized("enrollment is only available to the subject itself"));
        }
        if request.value.is_some_and(|value| value != rule.value) {
            return Err(request.unauthorized(format!(
                "enrollment value is fixed at {}",
                rule.value
            )));
        }
        if view.has_attribute(request.subject, request.attribute_type) {
            return Err(request.unauthorized("subject already holds this attribute"));
        }
        if let Some(blocker) = view.first_held(request.subject, &rule.blocked_by) {
            return Err(request.unauthorized(format!(
                "subject holds conflicting attribute type {blocker}"
            )));
        }

        let superseded: Vec<AttributeTypeId> = rule
            .supersedes
            .iter()
            .copied()
            .filter(|attribute_type| view.has_attribute(request.subject, *attribute_type))
            .collect();

        Ok(IssuePlan::write(rule.value).revoking(superseded))
    }
}
