//! Concurrency tests
//!
//! Reservations race through the filesystem only, whether the reservers are
//! threads sharing a pool handle, threads with their own handles, or separate
//! processes.

mod common;

use std::collections::BTreeSet;
use std::sync::{Arc, Barrier};

use devkit_dispenser::{
    CandidateOrder, Dispenser, DispenserConfig, DispenserError, Layout, LicensePool, Platform,
};
use serde_json::Value;

#[test]
fn test_n_concurrent_reservations_then_exhausted() {
    const LICENSES: usize = 32;

    let root = common::TestRoot::new();
    root.add_licenses("NVIDIA", LICENSES);
    let barrier = Arc::new(Barrier::new(LICENSES));

    let handles: Vec<_> = (0..LICENSES)
        .map(|_| {
            let available = root.path.join("available");
            let used = root.path.join("used");
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                // Independent handle per reserver, no shared memory
                let pool = LicensePool::open(available, used, CandidateOrder::Lexical);
                barrier.wait();
                pool.reserve(&Platform::parse("NVIDIA").unwrap())
            })
        })
        .collect();

    let claimed: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().expect("reserver panicked").unwrap().filename)
        .collect();
    let unique: BTreeSet<String> = claimed.iter().cloned().collect();

    assert_eq!(unique.len(), LICENSES, "a license was handed out twice");
    assert!(root.names_in("available/NVIDIA").is_empty());
    assert_eq!(root.names_in("used"), unique);

    let pool = LicensePool::open(
        root.path.join("available"),
        root.path.join("used"),
        CandidateOrder::Shuffled,
    );
    assert!(matches!(
        pool.reserve(&Platform::parse("NVIDIA").unwrap()),
        Err(DispenserError::PoolExhausted { .. })
    ));
}

#[test]
fn test_oversubscribed_dispense_never_duplicates() {
    const LICENSES: usize = 8;
    const REQUESTS: usize = 20;

    let root = common::TestRoot::new();
    root.add_devkit_dir("kitA-AMD", &[("readme.txt", "hello"), ("bin/tool", "x")]);
    root.add_licenses("AMD", LICENSES);
    let barrier = Arc::new(Barrier::new(REQUESTS));

    let handles: Vec<_> = (0..REQUESTS)
        .map(|_| {
            let path = root.path.clone();
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                let dispenser = Dispenser::open(&Layout::new(path), &DispenserConfig::default());
                barrier.wait();
                dispenser.dispense(Some("kitA-AMD"))
            })
        })
        .collect();

    let mut licenses = Vec::new();
    let mut archives = BTreeSet::new();
    let mut exhausted = 0;
    for handle in handles {
        match handle.join().expect("request panicked") {
            Ok(dispensed) => {
                let entries = common::zip_entries(dispensed.archive_path());
                assert!(entries.contains(&format!("license/{}", dispensed.license.filename)));
                licenses.push(dispensed.license.filename.clone());
                archives.insert(dispensed.archive.name.clone());
            }
            Err(DispenserError::PoolExhausted { .. }) => exhausted += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    let unique: BTreeSet<String> = licenses.iter().cloned().collect();
    assert_eq!(licenses.len(), LICENSES);
    assert_eq!(unique.len(), LICENSES);
    assert_eq!(archives.len(), LICENSES);
    assert_eq!(exhausted, REQUESTS - LICENSES);
    assert_eq!(root.names_in("builds").len(), LICENSES);
}

#[test]
fn test_concurrent_processes_never_duplicate() {
    const LICENSES: usize = 6;
    const PROCESSES: usize = 10;

    let root = common::TestRoot::new();
    root.add_devkit_dir("kitA-NVIDIA", &[("a.txt", "A")]);
    root.add_licenses("NVIDIA", LICENSES);

    let handles: Vec<_> = (0..PROCESSES)
        .map(|_| {
            let mut cmd = root.cmd();
            cmd.args(["dispense", "kitA-NVIDIA", "--format", "json", "--order", "lexical"]);
            std::thread::spawn(move || cmd.output())
        })
        .collect();

    let mut licenses = Vec::new();
    let mut failures = 0;
    for handle in handles {
        let output = handle.join().expect("thread panicked").expect("process ran");
        let value: Value = serde_json::from_slice(&output.stdout).expect("JSON response");
        if value["success"] == true {
            licenses.push(value["license"].as_str().unwrap().to_string());
        } else {
            assert_eq!(value["code"], "pool_exhausted");
            failures += 1;
        }
    }

    let unique: BTreeSet<String> = licenses.iter().cloned().collect();
    assert_eq!(unique.len(), licenses.len(), "a license was handed out twice");
    assert_eq!(licenses.len(), LICENSES);
    assert_eq!(failures, PROCESSES - LICENSES);
    assert_eq!(root.names_in("used"), unique);
}
