//! Tests for the vehicle directory
//!
//! These tests verify:
//! - Profile upsert/get/delete round trips
//! - Classification derived from dimensions, never stale after edits

use std::path::PathBuf;

use ferrydesk::vehicle::{Vehicle, VehicleDirectory};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_directory() -> (TempDir, PathBuf, VehicleDirectory) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("vehicles.dat");
    let directory = VehicleDirectory::open(&path).unwrap();
    (temp_dir, path, directory)
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn upsert_get_delete_round_trip() {
    let (_temp, _path, mut directory) = setup_directory();

    let v = Vehicle::new("ABC123", "6045550199", 5.0, 1.8);
    directory.upsert(&v).unwrap();

    assert!(directory.exists("ABC123").unwrap());
    assert_eq!(directory.get("ABC123").unwrap().unwrap(), v);

    assert!(directory.delete("ABC123").unwrap());
    assert!(!directory.exists("ABC123").unwrap());
    assert!(directory.get("ABC123").unwrap().is_none());
}

#[test]
fn all_returns_every_profile() {
    let (_temp, _path, mut directory) = setup_directory();
    for n in 0..4 {
        directory
            .upsert(&Vehicle::new(&format!("CAR{}", n), "5550000", 5.0, 1.8))
            .unwrap();
    }
    assert_eq!(directory.all().unwrap().len(), 4);
}

// =============================================================================
// Derived Classification
// =============================================================================

#[test]
fn classification_follows_stored_dimensions() {
    let (_temp, _path, mut directory) = setup_directory();

    directory
        .upsert(&Vehicle::new("VAN42", "5550000", 6.0, 1.9))
        .unwrap();
    assert!(!directory.get("VAN42").unwrap().unwrap().is_special());

    // Edit the dimensions in place; the class flips with no stored flag
    let mut v = directory.get("VAN42").unwrap().unwrap();
    v.update("5550000", 6.0, 2.6);
    directory.upsert(&v).unwrap();

    assert!(directory.get("VAN42").unwrap().unwrap().is_special());
}
