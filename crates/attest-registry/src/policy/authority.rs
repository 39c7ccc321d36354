//! Designated-issuer policy.

use super::{AttributeView, IssuancePolicy, IssuePlan, IssueRequest, RevokeRequest};
use attest_core::{Address, AttestError, AttestResult};

/// Only `issuer` may issue or revoke. Values are explicit and overwrites are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorityPolicy {
    issuer: Address,
}

impl AuthorityPolicy {
    /// Policy whose sole authority is `issuer`.
    pub fn new(issuer: Address) -> Self {
        Self { issuer }
    }

    /// The designated issuer.
    pub fn issuer(&self) -> Address {
        self.issuer
    }
}

impl IssuancePolicy for AuthorityPolicy {
    fn authorize_issue(
        &self,
        _view: &AttributeView<'_>,
        request: &IssueRequest,
    ) -> AttestResult<IssuePlan> {
        if request.caller != self.issuer {
            return Err(request.unauthorized("caller is not the designated issuer"));
        }
        let value = request.value.ok_or_else(|| {
            AttestError::invalid(format!(
                "issuing attribute type {} requires an explicit value",
                request.attribute_type
            ))
        })?;
        Ok(IssuePlan::write(value))
    }

    fn authorize_revoke(
        &self,
        _view: &AttributeView<'_>,
        request: &RevokeRequest,
    ) -> AttestResult<()> {
        if request.caller != self.issuer {
            return Err(request.unauthorized("caller is not the designated issuer"));
        }
        Ok(())
    }
}
