//! Node id allocation under concurrent registration
//!
//! Kept in its own test binary: ids come from a process-wide counter, so no
//! other test may register while this one counts.

use std::collections::BTreeSet;
use std::sync::{Arc, Barrier};

use hostbridge_core::ObjectRepository;
use hostbridge_sdk::BridgeValue;

const THREADS: usize = 8;
const PER_THREAD: usize = 250;

#[test]
fn test_concurrent_registration_yields_contiguous_ids() {
    let repo = Arc::new(ObjectRepository::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let repo = Arc::clone(&repo);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                (0..PER_THREAD)
                    .map(|i| repo.register(format!("Value{}_{}", t, i), BridgeValue::I32(i as i32)))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: BTreeSet<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .map(|id| id.as_u64())
        .collect();

    // Scalar roots allocate exactly one id each
    assert_eq!(ids.len(), THREADS * PER_THREAD);
    assert_eq!(repo.node_count(), THREADS * PER_THREAD);

    let first = *ids.iter().next().unwrap();
    let last = *ids.iter().next_back().unwrap();
    assert_eq!(last - first + 1, (THREADS * PER_THREAD) as u64);
}
