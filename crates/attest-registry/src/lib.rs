//! Attest Registry - Attribute Registry State Machine
//!
//! A minimal attestation store: a fixed catalog of attribute types, typed and
//! valued claims ("attributions") held by addresses, and per-type holder
//! counters that always equal the number of attributions of that type.
//!
//! # Layers
//!
//! - `catalog`, `ledger`, `facts`: state owned by the registry
//! - `registry`: queries plus policy-gated `issue` / `revoke`
//! - `policy`: who may change what (`AuthorityPolicy`, `EnrollmentPolicy`)
//! - `workflow`: the whitehat/blackhat enrollment workflow
//! - `shared`: lock-guarded handle for concurrent callers
//! - `snapshot`, `config`: persistence and configuration
//!
//! # Example
//!
//! ```
//! use attest_registry::{AttributeRegistry, HatWorkflow};
//! use attest_core::Address;
//!
//! let workflow = HatWorkflow::default();
//! let mut registry = AttributeRegistry::with_hats();
//! let alice = Address::from_seed(1);
//!
//! workflow.join_whitehats(&mut registry, alice).unwrap();
//! workflow.join_blackhats(&mut registry, alice).unwrap();
//! assert_eq!(workflow.total_hats(&registry).as_tuple(), (0, 1));
//! assert!(workflow.join_whitehats(&mut registry, alice).is_err());
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod facts;
pub mod ledger;
pub mod policy;
pub mod registry;
pub mod shared;
pub mod snapshot;
pub mod workflow;

pub use catalog::{AttributeCatalog, AttributeType, BLACKHAT_ID, WHITEHAT_ID};
pub use config::RegistryConfig;
pub use facts::{AttributeFact, FactJournal, FactSequence};
pub use ledger::AttributeLedger;
pub use policy::{
    AttributeView, AuthorityPolicy, EnrollmentPolicy, EnrollmentRule, IssuancePolicy, IssuePlan,
    IssueRequest, RevokeRequest,
};
pub use registry::{AttributeRegistry, IssueReceipt, RegistryInterface, RevokeReceipt};
pub use shared::SharedRegistry;
pub use snapshot::{AttributionRecord, RegistrySnapshot, SNAPSHOT_VERSION};
pub use workflow::{HatState, HatTotals, HatWorkflow};
