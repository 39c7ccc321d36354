//! Acceptance walk-through of the hat registry
//!
//! Drives a fresh registry through the deployment-level scenario: catalog
//! inspection, absent-attribute queries, whitehat and blackhat joins from two
//! accounts, and a refused whitehat join.

#![allow(clippy::unwrap_used, missing_docs)]

use assert_matches::assert_matches;
use attest_core::test_utils::{test_address, unowned_address};
use attest_core::{Address, AttestError};
use attest_registry::{
    AttributeRegistry, HatState, HatWorkflow, RegistryInterface, BLACKHAT_ID, WHITEHAT_ID,
};

#[test]
fn hat_registry_acceptance() {
    let workflow = HatWorkflow::default();
    let mut registry = AttributeRegistry::with_hats();
    let address_one = test_address(1);
    let address_two = test_address(2);

    // correct number of attribute types are set
    assert_eq!(registry.count_attribute_types(), 2);

    // attribute types can be accessed by index
    assert_eq!(registry.attribute_type_id(0).unwrap(), WHITEHAT_ID);
    assert_eq!(registry.attribute_type_id(1).unwrap(), BLACKHAT_ID);

    // indexes outside of the available range fail
    assert_matches!(
        registry.attribute_type_id(2),
        Err(AttestError::OutOfRange { index: 2, count: 2 })
    );
    assert_matches!(
        registry.attribute_type_id_signed(-1),
        Err(AttestError::OutOfRange { .. })
    );

    // absent attributes can be checked for, but have no value
    assert!(!registry.has_attribute(address_one, WHITEHAT_ID));
    assert_matches!(
        registry.attribute_value(address_one, WHITEHAT_ID),
        Err(AttestError::NotFound { .. })
    );

    // attributes can be issued
    workflow.join_whitehats(&mut registry, address_one).unwrap();
    assert_eq!(workflow.total_hats(&registry).as_tuple(), (1, 0));
    assert!(registry.has_attribute(address_one, WHITEHAT_ID));
    assert_eq!(registry.attribute_value(address_one, WHITEHAT_ID).unwrap(), 1);

    // additional attributes can be issued and revoked
    let receipt = workflow.join_blackhats(&mut registry, address_one).unwrap();
    assert_eq!(receipt.revoked, vec![(WHITEHAT_ID, 1)]);
    assert_eq!(workflow.total_hats(&registry).as_tuple(), (0, 1));
    assert!(!registry.has_attribute(address_one, WHITEHAT_ID));
    assert!(registry.has_attribute(address_one, BLACKHAT_ID));

    // issue additional attributes from a second account
    workflow.join_blackhats(&mut registry, address_two).unwrap();
    assert_eq!(workflow.total_hats(&registry).as_tuple(), (0, 2));

    // joining when conditions are not met fails and changes nothing
    let before = registry.clone();
    assert_matches!(
        workflow.join_whitehats(&mut registry, address_two),
        Err(AttestError::Unauthorized { caller, .. }) if caller == address_two
    );
    assert_eq!(registry, before);
    assert_eq!(workflow.total_hats(&registry).as_tuple(), (0, 2));
    assert_eq!(workflow.state_of(&registry, address_two), HatState::Blackhat);
}

#[test]
fn catalog_queries_are_stable_across_issuance() {
    let workflow = HatWorkflow::default();
    let mut registry = AttributeRegistry::with_hats();
    let catalog_before: Vec<_> = (0..registry.count_attribute_types())
        .map(|index| registry.attribute_type_id(index).unwrap())
        .collect();

    for seed in 1..=5 {
        workflow.join_whitehats(&mut registry, test_address(seed)).unwrap();
        workflow.join_blackhats(&mut registry, test_address(seed)).unwrap();
    }

    let catalog_after: Vec<_> = (0..registry.count_attribute_types())
        .map(|index| registry.attribute_type_id(index).unwrap())
        .collect();
    assert_eq!(catalog_before, catalog_after);
}

#[test]
fn unrelated_addresses_hold_nothing() {
    let workflow = HatWorkflow::default();
    let mut registry = AttributeRegistry::with_hats();
    workflow.join_whitehats(&mut registry, test_address(1)).unwrap();

    for subject in [Address::ZERO, unowned_address()] {
        assert!(!registry.has_attribute(subject, WHITEHAT_ID));
        assert!(!registry.has_attribute(subject, BLACKHAT_ID));
        assert_eq!(workflow.state_of(&registry, subject), HatState::None);
    }

    // unknown attribute types are simply not held
    assert!(!registry.has_attribute(test_address(1), attest_core::AttributeTypeId(42)));
}

#[test]
fn interface_trait_matches_inherent_queries() {
    fn probe(registry: &dyn RegistryInterface) -> (usize, bool) {
        (
            registry.count_attribute_types(),
            registry.has_attribute(test_address(1), WHITEHAT_ID),
        )
    }

    let workflow = HatWorkflow::default();
    let mut registry = AttributeRegistry::with_hats();
    workflow.join_whitehats(&mut registry, test_address(1)).unwrap();
    assert_eq!(probe(&registry), (2, true));
}
