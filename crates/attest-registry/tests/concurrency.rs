//! Concurrent access through `SharedRegistry`.

#![allow(clippy::unwrap_used, missing_docs)]

use attest_core::test_utils::test_address;
use attest_registry::{AttributeRegistry, HatWorkflow, SharedRegistry, BLACKHAT_ID, WHITEHAT_ID};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn concurrent_joins_keep_counters_exact() {
    let shared = SharedRegistry::new(AttributeRegistry::with_hats());
    let workflow = Arc::new(HatWorkflow::default());

    let writers: Vec<_> = (1u8..=16)
        .map(|seed| {
            let shared = shared.clone();
            let workflow = Arc::clone(&workflow);
            thread::spawn(move || {
                let subject = test_address(seed);
                shared.join_whitehats(&workflow, subject).unwrap();
                if seed % 2 == 0 {
                    shared.join_blackhats(&workflow, subject).unwrap();
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(shared.total_hats(&workflow).as_tuple(), (8, 8));
    assert!(shared.with_read(AttributeRegistry::is_consistent));
    assert_eq!(shared.with_read(|registry| registry.facts().len()), 16 + 8 * 2);
}

#[test]
fn racing_duplicate_joins_admit_exactly_one() {
    let shared = SharedRegistry::new(AttributeRegistry::with_hats());
    let workflow = Arc::new(HatWorkflow::default());
    let subject = test_address(7);

    let attempts: Vec<_> = (0..8)
        .map(|_| {
            let shared = shared.clone();
            let workflow = Arc::clone(&workflow);
            thread::spawn(move || shared.join_blackhats(&workflow, subject).is_ok())
        })
        .collect();

    let accepted = attempts
        .into_iter()
        .map(|attempt| attempt.join().unwrap())
        .filter(|accepted| *accepted)
        .count();

    assert_eq!(accepted, 1);
    assert_eq!(shared.counter(BLACKHAT_ID), 1);
}

#[test]
fn readers_never_observe_torn_state() {
    let shared = SharedRegistry::new(AttributeRegistry::with_hats());
    let workflow = Arc::new(HatWorkflow::default());
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let (consistent, total) = shared.with_read(|registry| {
                        let total = registry.counter(WHITEHAT_ID) + registry.counter(BLACKHAT_ID);
                        (registry.is_consistent(), total)
                    });
                    assert!(consistent);
                    assert!(total <= 50);
                }
            })
        })
        .collect();

    for seed in 1u8..=50 {
        let subject = test_address(seed);
        shared.join_whitehats(&workflow, subject).unwrap();
        shared.join_blackhats(&workflow, subject).unwrap();
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(shared.total_hats(&workflow).as_tuple(), (0, 50));
}
