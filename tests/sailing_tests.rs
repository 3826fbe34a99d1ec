//! Tests for the sailing capacity ledger
//!
//! These tests verify:
//! - Add/get/delete round trips through the sailing file
//! - The non-negative remaining-capacity invariant across consume/restore
//! - Paginated report scans
//! - Persistence across reopen

use std::path::PathBuf;

use ferrydesk::error::FerryError;
use ferrydesk::sailing::{Allocation, Sailing, SailingLedger};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_ledger() -> (TempDir, PathBuf, SailingLedger) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sailings.dat");
    let ledger = SailingLedger::open(&path).unwrap();
    (temp_dir, path, ledger)
}

fn sailing(n: usize) -> Sailing {
    Sailing::new(&format!("ABC-01-{:02}", n), "Runner", 100, 50).unwrap()
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn add_get_delete_round_trip() {
    let (_temp, _path, mut ledger) = setup_ledger();

    let s = Sailing::new("ABC-01-09", "Runner", 100, 50).unwrap();
    ledger.add(&s).unwrap();

    assert!(ledger.exists("ABC-01-09").unwrap());
    let loaded = ledger.get("ABC-01-09").unwrap().unwrap();
    assert_eq!(loaded.vessel(), "Runner");
    assert_eq!(loaded.low_total(), 100);
    assert_eq!(loaded.high_total(), 50);
    assert_eq!(loaded.low_remaining(), 100.0);
    assert_eq!(loaded.high_remaining(), 50.0);

    assert!(ledger.delete("ABC-01-09").unwrap());
    assert!(!ledger.exists("ABC-01-09").unwrap());
}

#[test]
fn add_duplicate_id_fails() {
    let (_temp, _path, mut ledger) = setup_ledger();
    ledger.add(&sailing(9)).unwrap();

    assert!(matches!(
        ledger.add(&sailing(9)),
        Err(FerryError::AlreadyExists)
    ));
}

#[test]
fn persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sailings.dat");

    {
        let mut ledger = SailingLedger::open(&path).unwrap();
        let mut s = Sailing::new("YVR-14-08", "Spirit", 200, 80).unwrap();
        s.consume(&Allocation { low: 7.0, high: 2.0 }).unwrap();
        ledger.add(&s).unwrap();
        ledger.close().unwrap();
    }

    let mut ledger = SailingLedger::open(&path).unwrap();
    let loaded = ledger.get("YVR-14-08").unwrap().unwrap();
    assert_eq!(loaded.low_remaining(), 193.0);
    assert_eq!(loaded.high_remaining(), 78.0);
}

// =============================================================================
// Capacity Invariant
// =============================================================================

#[test]
fn remaining_stays_within_bounds_across_any_sequence() {
    let (_temp, _path, mut ledger) = setup_ledger();
    let mut s = sailing(1);

    // Interleave consumes and restores, some of which must fail or clamp
    let steps: &[(f32, bool)] = &[
        (40.0, true),
        (70.0, true), // would go negative: rejected
        (55.0, true),
        (10.0, false),
        (90.0, false), // would exceed the total: clamped
        (100.0, true), // drains the pool exactly
        (5.0, true),   // rejected: pool is empty
    ];

    for &(amount, consume) in steps {
        if consume {
            let _ = s.consume_low(amount);
        } else {
            s.restore_low(amount);
        }
        assert!(s.low_remaining() >= 0.0);
        assert!(s.low_remaining() <= s.low_total() as f32);

        // The invariant must hold on disk after every committed mutation
        ledger.persist(&s).unwrap();
        let on_disk = ledger.get(s.id()).unwrap().unwrap();
        assert_eq!(on_disk.low_remaining(), s.low_remaining());
    }
}

// =============================================================================
// Report Pagination
// =============================================================================

#[test]
fn report_pages_cover_all_sailings_exactly_once() {
    let (_temp, _path, mut ledger) = setup_ledger();
    for n in 0..7 {
        ledger.add(&sailing(n)).unwrap();
    }

    let first = ledger.scan_page(5).unwrap();
    let second = ledger.scan_page(5).unwrap();
    assert_eq!(first.len(), 5);
    assert_eq!(second.len(), 2);

    let mut ids: Vec<String> = first
        .iter()
        .chain(second.iter())
        .map(|s| s.id().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 7);

    // Explicit reset restarts the report from the first sailing
    ledger.reset_scan();
    assert_eq!(ledger.scan_page(5).unwrap().len(), 5);
}
