//! Vehicle Directory
//!
//! Keyed vehicle profiles (dimensions, contact) consulted to classify a
//! vehicle as regular or special and to supply default dimensions.
//!
//! Classification is always derived from the stored dimensions — the
//! special flag is never persisted, so it cannot drift when dimensions
//! are edited.

use std::path::Path;

use crate::error::{FerryError, Result};
use crate::store::{clip_text, read_text, write_text, FixedRecord, RecordStore};

/// Height above which a vehicle is special (meters)
pub const SPECIAL_HEIGHT: f32 = 2.0;

/// Length above which a vehicle is special (meters)
pub const SPECIAL_LENGTH: f32 = 7.0;

/// Default length assumed for a regular vehicle with unknown dimensions
pub const REGULAR_LENGTH: f32 = 7.0;

/// Default height assumed for a regular vehicle with unknown dimensions
pub const REGULAR_HEIGHT: f32 = 2.0;

/// Max stored license plate length in characters
pub const PLATE_MAX: usize = 10;

/// Max stored phone number length in characters
pub const PHONE_MAX: usize = 14;

// Field widths in the vehicle record layout
const PLATE_FIELD: usize = 11;
const PHONE_FIELD: usize = 15;

/// A vehicle profile: license plate, contact phone, and dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    plate: String,
    phone: String,
    length: f32,
    height: f32,
}

impl Vehicle {
    /// Build a vehicle profile.
    ///
    /// Plate and phone are truncated at their stored widths
    /// (10 and 14 characters).
    pub fn new(plate: &str, phone: &str, length: f32, height: f32) -> Self {
        Self {
            plate: clip_text(plate, PLATE_MAX),
            phone: clip_text(phone, PHONE_MAX),
            length,
            height,
        }
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Length in meters
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Height in meters
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Whether this vehicle bills and allocates as special.
    /// Recomputed from dimensions on every call.
    pub fn is_special(&self) -> bool {
        self.height > SPECIAL_HEIGHT || self.length > SPECIAL_LENGTH
    }

    /// Replace contact and dimensions, keeping the plate
    pub fn update(&mut self, phone: &str, length: f32, height: f32) {
        self.phone = clip_text(phone, PHONE_MAX);
        self.length = length;
        self.height = height;
    }
}

impl FixedRecord for Vehicle {
    // plate (11) + phone (15) + length f32 + height f32
    const SIZE: usize = PLATE_FIELD + PHONE_FIELD + 4 + 4;

    type Key = String;

    fn key(&self) -> String {
        self.plate.clone()
    }

    fn encode(&self, buf: &mut [u8]) {
        write_text(&mut buf[0..PLATE_FIELD], &self.plate);
        write_text(&mut buf[PLATE_FIELD..PLATE_FIELD + PHONE_FIELD], &self.phone);
        buf[26..30].copy_from_slice(&self.length.to_le_bytes());
        buf[30..34].copy_from_slice(&self.height.to_le_bytes());
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let plate = read_text(&buf[0..PLATE_FIELD])?;
        if plate.is_empty() {
            return Err(FerryError::Malformed("empty license plate".into()));
        }
        let phone = read_text(&buf[PLATE_FIELD..PLATE_FIELD + PHONE_FIELD])?;
        let length = f32::from_le_bytes(buf[26..30].try_into().unwrap());
        let height = f32::from_le_bytes(buf[30..34].try_into().unwrap());
        if !length.is_finite() || !height.is_finite() || length < 0.0 || height < 0.0 {
            return Err(FerryError::Malformed("vehicle dimensions out of range".into()));
        }
        Ok(Self {
            plate,
            phone,
            length,
            height,
        })
    }
}

/// Vehicle profile store keyed by license plate
pub struct VehicleDirectory {
    store: RecordStore<Vehicle>,
}

impl VehicleDirectory {
    /// Open the vehicle file, creating it if absent
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            store: RecordStore::open(path)?,
        })
    }

    /// Flush and release the underlying file
    pub fn close(&mut self) -> Result<()> {
        self.store.close()
    }

    pub fn exists(&mut self, plate: &str) -> Result<bool> {
        self.store.exists(&plate.to_string())
    }

    pub fn get(&mut self, plate: &str) -> Result<Option<Vehicle>> {
        self.store.get(&plate.to_string())
    }

    /// Create or update a vehicle profile
    pub fn upsert(&mut self, vehicle: &Vehicle) -> Result<()> {
        self.store.upsert(vehicle)
    }

    /// Remove a vehicle profile; `true` if one was removed
    pub fn delete(&mut self, plate: &str) -> Result<bool> {
        self.store.delete(&plate.to_string())
    }

    pub fn all(&mut self) -> Result<Vec<Vehicle>> {
        self.store.get_all()
    }
}
