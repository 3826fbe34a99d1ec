//! Tests for the generic fixed-record store
//!
//! These tests verify:
//! - Open-or-create and close semantics
//! - Point lookup and in-place upsert (no duplicate keys)
//! - Delete-with-rewrite leaving other records intact
//! - Paginated scans with explicit cursor reset
//! - Silent handling of short tails and malformed slots

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use ferrydesk::store::{FixedRecord, RecordStore};
use ferrydesk::vehicle::Vehicle;
use ferrydesk::FerryError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> (TempDir, PathBuf, RecordStore<Vehicle>) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("vehicles.dat");
    let store = RecordStore::open(&path).unwrap();
    (temp_dir, path, store)
}

fn vehicle(n: usize) -> Vehicle {
    Vehicle::new(&format!("CAR{:03}", n), &format!("555{:04}", n), 5.0, 1.8)
}

// =============================================================================
// Open / Close
// =============================================================================

#[test]
fn open_creates_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fresh.dat");
    assert!(!path.exists());

    let mut store: RecordStore<Vehicle> = RecordStore::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(store.record_count().unwrap(), 0);
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn operations_after_close_return_not_open() {
    let (_temp, _path, mut store) = setup_store();
    store.upsert(&vehicle(1)).unwrap();

    store.close().unwrap();
    assert!(!store.is_open());
    // Close is a no-op when already closed
    store.close().unwrap();

    let key = "CAR001".to_string();
    assert!(matches!(store.get(&key), Err(FerryError::NotOpen)));
    assert!(matches!(store.exists(&key), Err(FerryError::NotOpen)));
    assert!(matches!(store.upsert(&vehicle(2)), Err(FerryError::NotOpen)));
    assert!(matches!(store.delete(&key), Err(FerryError::NotOpen)));
    assert!(matches!(store.scan_page(5), Err(FerryError::NotOpen)));
}

// =============================================================================
// Upsert / Get
// =============================================================================

#[test]
fn upsert_then_get_returns_written_payload() {
    let (_temp, _path, mut store) = setup_store();

    // Unrelated records first, so the lookup has to scan past them
    for n in 0..10 {
        store.upsert(&vehicle(n)).unwrap();
    }

    let target = Vehicle::new("TRUCK7", "6045550199", 11.5, 3.2);
    store.upsert(&target).unwrap();

    let loaded = store.get(&"TRUCK7".to_string()).unwrap().unwrap();
    assert_eq!(loaded, target);
}

#[test]
fn upsert_overwrites_in_place_without_duplicates() {
    let (_temp, _path, mut store) = setup_store();
    for n in 0..5 {
        store.upsert(&vehicle(n)).unwrap();
    }

    let updated = Vehicle::new("CAR002", "7780000000", 6.5, 1.9);
    store.upsert(&updated).unwrap();

    // Same record count: the existing slot was overwritten, not appended
    assert_eq!(store.record_count().unwrap(), 5);
    assert_eq!(store.get(&"CAR002".to_string()).unwrap().unwrap(), updated);
}

#[test]
fn get_missing_key_returns_none() {
    let (_temp, _path, mut store) = setup_store();
    store.upsert(&vehicle(1)).unwrap();

    assert!(store.get(&"GHOST".to_string()).unwrap().is_none());
    assert!(!store.exists(&"GHOST".to_string()).unwrap());
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn delete_removes_exactly_one_record() {
    let (_temp, _path, mut store) = setup_store();
    for n in 0..6 {
        store.upsert(&vehicle(n)).unwrap();
    }

    assert!(store.delete(&"CAR003".to_string()).unwrap());

    assert!(!store.exists(&"CAR003".to_string()).unwrap());
    assert_eq!(store.record_count().unwrap(), 5);

    // Every other record survives with its payload unchanged
    for n in [0, 1, 2, 4, 5] {
        let key = format!("CAR{:03}", n);
        let loaded = store.get(&key).unwrap().unwrap();
        assert_eq!(loaded, vehicle(n));
    }
}

#[test]
fn delete_missing_key_returns_false() {
    let (_temp, _path, mut store) = setup_store();
    store.upsert(&vehicle(1)).unwrap();

    assert!(!store.delete(&"GHOST".to_string()).unwrap());
    assert_eq!(store.record_count().unwrap(), 1);
}

// =============================================================================
// Pagination
// =============================================================================

#[test]
fn scan_page_covers_every_record_once() {
    let (_temp, _path, mut store) = setup_store();
    for n in 0..7 {
        store.upsert(&vehicle(n)).unwrap();
    }

    let first = store.scan_page(5).unwrap();
    let second = store.scan_page(5).unwrap();
    assert_eq!(first.len(), 5);
    assert_eq!(second.len(), 2);

    let mut seen: Vec<String> = first
        .iter()
        .chain(second.iter())
        .map(|v| v.plate().to_string())
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 7);
}

#[test]
fn scan_cursor_stays_at_eof_until_reset() {
    let (_temp, _path, mut store) = setup_store();
    for n in 0..3 {
        store.upsert(&vehicle(n)).unwrap();
    }

    assert_eq!(store.scan_page(5).unwrap().len(), 3);
    // No auto-wrap: the cursor sits at end-of-file
    assert!(store.scan_page(5).unwrap().is_empty());
    assert!(store.scan_page(5).unwrap().is_empty());

    store.reset_scan();
    assert_eq!(store.scan_page(5).unwrap().len(), 3);
}

#[test]
fn full_scans_do_not_move_the_page_cursor() {
    let (_temp, _path, mut store) = setup_store();
    for n in 0..4 {
        store.upsert(&vehicle(n)).unwrap();
    }

    let first = store.scan_page(2).unwrap();
    assert_eq!(first.len(), 2);

    // get_all and friends scan from position 0 with no cursor effects
    assert_eq!(store.get_all().unwrap().len(), 4);
    let specials = store.get_all_matching(|v| v.is_special()).unwrap();
    assert!(specials.is_empty());

    let second = store.scan_page(2).unwrap();
    assert_eq!(second.len(), 2);
    assert_ne!(first[0].plate(), second[0].plate());
}

// =============================================================================
// Corruption Handling
// =============================================================================

#[test]
fn short_tail_ends_scan_silently() {
    let (_temp, path, mut store) = setup_store();
    for n in 0..3 {
        store.upsert(&vehicle(n)).unwrap();
    }
    store.close().unwrap();

    // Append half a record of junk
    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&vec![0xAB; Vehicle::SIZE / 2]).unwrap();
    drop(file);

    let mut store: RecordStore<Vehicle> = RecordStore::open(&path).unwrap();
    assert_eq!(store.get_all().unwrap().len(), 3);
    assert!(store.exists(&"CAR002".to_string()).unwrap());
}

#[test]
fn malformed_slot_is_skipped_not_fatal() {
    let (_temp, path, mut store) = setup_store();
    for n in 0..3 {
        store.upsert(&vehicle(n)).unwrap();
    }
    store.close().unwrap();

    // Append a whole slot of garbage (non-UTF-8 plate bytes)
    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&vec![0xFF; Vehicle::SIZE]).unwrap();
    drop(file);

    let mut store: RecordStore<Vehicle> = RecordStore::open(&path).unwrap();
    assert_eq!(store.get_all().unwrap().len(), 3);
    assert_eq!(store.scan_page(10).unwrap().len(), 3);
}
