//! Hat enrollment workflow
//!
//! Two tracked attribute types, whitehat and blackhat, with a per-subject
//! state machine layered on the general registry:
//!
//! ```text
//! None ──join_whitehats──▶ Whitehat ──join_blackhats──▶ Blackhat
//!   └────────────────join_blackhats─────────────────────▲
//! ```
//!
//! Blackhats cannot rejoin the whitehats. The registry itself can hold both
//! attributes for one subject; exclusivity lives only in this workflow's policy.

use crate::catalog::{AttributeCatalog, BLACKHAT_NAME, WHITEHAT_NAME};
use crate::policy::{EnrollmentPolicy, IssueRequest};
use crate::registry::{AttributeRegistry, IssueReceipt};
use attest_core::{Address, AttestError, AttestResult, AttributeTypeId, AttributeValue};
use serde::{Deserialize, Serialize};

/// Aggregate hat counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HatTotals {
    /// Subjects currently holding the whitehat attribute
    pub whitehats: u64,
    /// Subjects currently holding the blackhat attribute
    pub blackhats: u64,
}

impl HatTotals {
    /// `(whitehats, blackhats)`
    pub fn as_tuple(&self) -> (u64, u64) {
        (self.whitehats, self.blackhats)
    }
}

/// Hat state of one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HatState {
    /// Holds neither hat
    None,
    /// Holds the whitehat attribute
    Whitehat,
    /// Holds the blackhat attribute
    Blackhat,
}

impl HatState {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HatState::None => "none",
            HatState::Whitehat => "whitehat",
            HatState::Blackhat => "blackhat",
        }
    }
}

/// Whitehat/blackhat enrollment bound to concrete attribute type ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HatWorkflow {
    whitehat: AttributeTypeId,
    blackhat: AttributeTypeId,
    policy: EnrollmentPolicy,
}

impl HatWorkflow {
    /// Workflow over the given type ids, issuing `value` on every join.
    pub fn new(
        whitehat: AttributeTypeId,
        blackhat: AttributeTypeId,
        value: AttributeValue,
    ) -> Self {
        Self {
            whitehat,
            blackhat,
            policy: EnrollmentPolicy::hats(whitehat, blackhat, value),
        }
    }

    /// Workflow over custom enrollment rules for the two hat types.
    pub fn with_policy(
        whitehat: AttributeTypeId,
        blackhat: AttributeTypeId,
        policy: EnrollmentPolicy,
    ) -> Self {
        Self {
            whitehat,
            blackhat,
            policy,
        }
    }

    /// Locate the `whitehat` and `blackhat` entries of a catalog by name.
    pub fn from_catalog(catalog: &AttributeCatalog, value: AttributeValue) -> AttestResult<Self> {
        let lookup = |name: &str| {
            catalog
                .by_name(name)
                .map(|attribute_type| attribute_type.id)
                .ok_or_else(|| {
                    AttestError::invalid(format!("catalog has no '{name}' attribute type"))
                })
        };
        Ok(Self::new(lookup(WHITEHAT_NAME)?, lookup(BLACKHAT_NAME)?, value))
    }

    /// Whitehat attribute type id.
    pub fn whitehat(&self) -> AttributeTypeId {
        self.whitehat
    }

    /// Blackhat attribute type id.
    pub fn blackhat(&self) -> AttributeTypeId {
        self.blackhat
    }

    /// The enrollment policy this workflow issues under.
    pub fn policy(&self) -> &EnrollmentPolicy {
        &self.policy
    }

    /// `caller` joins the whitehats. Refused for current blackhats and whitehats.
    pub fn join_whitehats(
        &self,
        registry: &mut AttributeRegistry,
        caller: Address,
    ) -> AttestResult<IssueReceipt> {
        registry.issue(&IssueRequest::enroll(caller, self.whitehat), &self.policy)
    }

    /// `caller` joins the blackhats, giving up a whitehat if held.
    pub fn join_blackhats(
        &self,
        registry: &mut AttributeRegistry,
        caller: Address,
    ) -> AttestResult<IssueReceipt> {
        registry.issue(&IssueRequest::enroll(caller, self.blackhat), &self.policy)
    }

    /// Current `(whitehats, blackhats)` counters.
    pub fn total_hats(&self, registry: &AttributeRegistry) -> HatTotals {
        HatTotals {
            whitehats: registry.counter(self.whitehat),
            blackhats: registry.counter(self.blackhat),
        }
    }

    /// Hat state of `subject`. Blackhat wins if both are somehow held.
    pub fn state_of(&self, registry: &AttributeRegistry, subject: Address) -> HatState {
        if registry.has_attribute(subject, self.blackhat) {
            HatState::Blackhat
        } else if registry.has_attribute(subject, self.whitehat) {
            HatState::Whitehat
        } else {
            HatState::None
        }
    }
}

impl Default for HatWorkflow {
    fn default() -> Self {
        Self::new(crate::catalog::WHITEHAT_ID, crate::catalog::BLACKHAT_ID, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AttributeType;
    use assert_matches::assert_matches;
    use attest_core::test_utils::test_address;

    #[test]
    fn test_state_transitions() {
        let workflow = HatWorkflow::default();
        let mut registry = AttributeRegistry::with_hats();
        let subject = test_address(1);

        assert_eq!(workflow.state_of(&registry, subject), HatState::None);
        workflow.join_whitehats(&mut registry, subject).unwrap();
        assert_eq!(workflow.state_of(&registry, subject), HatState::Whitehat);
        assert_eq!(workflow.total_hats(&registry).as_tuple(), (1, 0));

        workflow.join_blackhats(&mut registry, subject).unwrap();
        assert_eq!(workflow.state_of(&registry, subject), HatState::Blackhat);
        assert_eq!(workflow.total_hats(&registry).as_tuple(), (0, 1));
    }

    #[test]
    fn test_rejoining_is_refused() {
        let workflow = HatWorkflow::default();
        let mut registry = AttributeRegistry::with_hats();
        let subject = test_address(2);

        workflow.join_blackhats(&mut registry, subject).unwrap();
        assert_matches!(
            workflow.join_blackhats(&mut registry, subject),
            Err(AttestError::Unauthorized { .. })
        );
        assert_matches!(
            workflow.join_whitehats(&mut registry, subject),
            Err(AttestError::Unauthorized { .. })
        );
        assert_eq!(workflow.total_hats(&registry).as_tuple(), (0, 1));
    }

    #[test]
    fn test_from_catalog_uses_names() {
        let catalog = AttributeCatalog::new(vec![
            AttributeType::new(AttributeTypeId(1), BLACKHAT_NAME),
            AttributeType::new(AttributeTypeId(2), WHITEHAT_NAME),
        ])
        .unwrap();
        let workflow = HatWorkflow::from_catalog(&catalog, 3).unwrap();
        assert_eq!(workflow.whitehat(), AttributeTypeId(2));
        assert_eq!(workflow.blackhat(), AttributeTypeId(1));

        let mut registry = AttributeRegistry::new(catalog);
        let receipt = workflow.join_whitehats(&mut registry, test_address(1)).unwrap();
        assert_eq!(receipt.value, 3);
    }

    #[test]
    fn test_from_catalog_requires_both_hats() {
        let catalog =
            AttributeCatalog::new(vec![AttributeType::new(AttributeTypeId(1), "other")]).unwrap();
        assert_matches!(
            HatWorkflow::from_catalog(&catalog, 1),
            Err(AttestError::Invalid { .. })
        );
    }
}
