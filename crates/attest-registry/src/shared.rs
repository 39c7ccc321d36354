//! Shared registry handle
//!
//! Mutations hold the write lock for their whole read-modify-write, so
//! issuances are totally ordered. Queries hold the read lock and may run in
//! parallel; none of them can observe a counter without its attribution.

use crate::policy::{IssuancePolicy, IssueRequest, RevokeRequest};
use crate::registry::{AttributeRegistry, IssueReceipt, RegistryInterface, RevokeReceipt};
use crate::snapshot::RegistrySnapshot;
use crate::workflow::{HatTotals, HatWorkflow};
use attest_core::{Address, AttestResult, AttributeTypeId, AttributeValue};
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable, thread-safe handle to one registry.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<AttributeRegistry>>,
}

impl SharedRegistry {
    /// Share `registry`.
    pub fn new(registry: AttributeRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Issue under `policy`, serialized with every other mutation.
    pub fn issue<P>(&self, request: &IssueRequest, policy: &P) -> AttestResult<IssueReceipt>
    where
        P: IssuancePolicy + ?Sized,
    {
        self.inner.write().issue(request, policy)
    }

    /// Revoke under `policy`, serialized with every other mutation.
    pub fn revoke<P>(&self, request: &RevokeRequest, policy: &P) -> AttestResult<RevokeReceipt>
    where
        P: IssuancePolicy + ?Sized,
    {
        self.inner.write().revoke(request, policy)
    }

    /// `caller` joins the whitehats.
    pub fn join_whitehats(
        &self,
        workflow: &HatWorkflow,
        caller: Address,
    ) -> AttestResult<IssueReceipt> {
        workflow.join_whitehats(&mut self.inner.write(), caller)
    }

    /// `caller` joins the blackhats.
    pub fn join_blackhats(
        &self,
        workflow: &HatWorkflow,
        caller: Address,
    ) -> AttestResult<IssueReceipt> {
        workflow.join_blackhats(&mut self.inner.write(), caller)
    }

    /// Hat counters from one consistent state.
    pub fn total_hats(&self, workflow: &HatWorkflow) -> HatTotals {
        workflow.total_hats(&self.inner.read())
    }

    /// Holder count for `attribute_type`.
    pub fn counter(&self, attribute_type: AttributeTypeId) -> u64 {
        self.inner.read().counter(attribute_type)
    }

    /// Run `f` against one consistent state.
    pub fn with_read<R>(&self, f: impl FnOnce(&AttributeRegistry) -> R) -> R {
        f(&self.inner.read())
    }

    /// Consistent snapshot of the whole registry.
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.inner.read().snapshot()
    }
}

impl From<AttributeRegistry> for SharedRegistry {
    fn from(registry: AttributeRegistry) -> Self {
        Self::new(registry)
    }
}

impl RegistryInterface for SharedRegistry {
    fn count_attribute_types(&self) -> usize {
        self.inner.read().count_attribute_types()
    }

    fn attribute_type_id(&self, index: usize) -> AttestResult<AttributeTypeId> {
        self.inner.read().attribute_type_id(index)
    }

    fn has_attribute(&self, subject: Address, attribute_type: AttributeTypeId) -> bool {
        self.inner.read().has_attribute(subject, attribute_type)
    }

    fn attribute_value(
        &self,
        subject: Address,
        attribute_type: AttributeTypeId,
    ) -> AttestResult<AttributeValue> {
        self.inner.read().attribute_value(subject, attribute_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_core::test_utils::{test_address, WHITEHAT};

    #[test]
    fn test_clones_share_state() {
        let workflow = HatWorkflow::default();
        let shared = SharedRegistry::new(AttributeRegistry::with_hats());
        let other = shared.clone();

        shared.join_whitehats(&workflow, test_address(1)).unwrap();
        assert!(other.has_attribute(test_address(1), WHITEHAT));
        assert_eq!(other.total_hats(&workflow).as_tuple(), (1, 0));
        assert_eq!(other.snapshot().attributions.len(), 1);
    }

    #[test]
    fn test_with_read_sees_consistent_state() {
        let shared = SharedRegistry::default();
        let workflow = HatWorkflow::default();
        shared.join_blackhats(&workflow, test_address(2)).unwrap();

        let consistent = shared.with_read(|registry| registry.is_consistent());
        assert!(consistent);
        assert_eq!(shared.count_attribute_types(), 2);
    }
}
