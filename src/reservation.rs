//! Reservation Records
//!
//! A reservation links one vehicle to one sailing under the composite key
//! `(licensePlate, sailingID)`. It is created `Pending` (`onboard = false`),
//! may be checked in exactly once, and holds one lane-capacity allocation
//! on its sailing until it is deleted. The cross-store coordination lives
//! in [`Terminal`](crate::terminal::Terminal); this module is the record
//! type, the fare rule, and the reservation file.

use std::path::Path;

use crate::error::{FerryError, Result};
use crate::store::{clip_text, read_text, write_text, FixedRecord, RecordStore};
use crate::vehicle::SPECIAL_HEIGHT;

// Field widths in the reservation record layout
const PLATE_FIELD: usize = 10;
const SAILING_ID_FIELD: usize = 9;

/// Flat fare for a regular vehicle (dollars)
const REGULAR_FARE: f32 = 14.00;

/// Per-meter rate for special vehicles over the height threshold
const OVER_HEIGHT_RATE: f32 = 3.00;

/// Per-meter rate for long but low special vehicles
const LONG_LOW_RATE: f32 = 2.00;

/// Compute the fare for a vehicle at check-in. Pure function.
///
/// Regular vehicles pay a flat rate; special vehicles pay per meter of
/// length, at a higher rate when over the height threshold.
pub fn fare(is_special: bool, length: f32, height: f32) -> f32 {
    if !is_special {
        REGULAR_FARE
    } else if height > SPECIAL_HEIGHT {
        length * OVER_HEIGHT_RATE
    } else {
        length * LONG_LOW_RATE
    }
}

/// One booking linking a vehicle to a sailing
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    plate: String,
    sailing_id: String,
    onboard: bool,
}

impl Reservation {
    /// Create a `Pending` reservation. The plate is truncated at its
    /// stored width of 10 characters.
    pub fn new(plate: &str, sailing_id: &str) -> Self {
        Self {
            plate: clip_text(plate, PLATE_FIELD),
            sailing_id: sailing_id.to_string(),
            onboard: false,
        }
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn sailing_id(&self) -> &str {
        &self.sailing_id
    }

    /// Whether the vehicle has checked in
    pub fn onboard(&self) -> bool {
        self.onboard
    }

    /// Mark the reservation boarded. Returns `false` if it already was —
    /// the transition happens exactly once.
    pub fn board(&mut self) -> bool {
        if self.onboard {
            return false;
        }
        self.onboard = true;
        true
    }

    /// Re-key the reservation onto another sailing, keeping its state
    pub fn relocate(&mut self, to_sailing: &str) {
        self.sailing_id = to_sailing.to_string();
    }
}

impl FixedRecord for Reservation {
    // plate (10) + sailing id (9) + onboard (1)
    const SIZE: usize = PLATE_FIELD + SAILING_ID_FIELD + 1;

    type Key = (String, String);

    fn key(&self) -> (String, String) {
        (self.plate.clone(), self.sailing_id.clone())
    }

    fn encode(&self, buf: &mut [u8]) {
        write_text(&mut buf[0..10], &self.plate);
        write_text(&mut buf[10..19], &self.sailing_id);
        buf[19] = u8::from(self.onboard);
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let plate = read_text(&buf[0..10])?;
        let sailing_id = read_text(&buf[10..19])?;
        if plate.is_empty() || sailing_id.is_empty() {
            return Err(FerryError::Malformed("empty reservation key".into()));
        }
        let onboard = match buf[19] {
            0 => false,
            1 => true,
            other => {
                return Err(FerryError::Malformed(format!(
                    "onboard byte out of range: {}",
                    other
                )))
            }
        };
        Ok(Self {
            plate,
            sailing_id,
            onboard,
        })
    }
}

/// Reservation store keyed by `(plate, sailing id)`
pub struct ReservationBook {
    store: RecordStore<Reservation>,
}

impl ReservationBook {
    /// Open the reservation file, creating it if absent
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            store: RecordStore::open(path)?,
        })
    }

    /// Flush and release the underlying file
    pub fn close(&mut self) -> Result<()> {
        self.store.close()
    }

    pub fn exists(&mut self, plate: &str, sailing_id: &str) -> Result<bool> {
        self.store
            .exists(&(plate.to_string(), sailing_id.to_string()))
    }

    pub fn get(&mut self, plate: &str, sailing_id: &str) -> Result<Option<Reservation>> {
        self.store
            .get(&(plate.to_string(), sailing_id.to_string()))
    }

    /// Create or update a reservation record
    pub fn upsert(&mut self, reservation: &Reservation) -> Result<()> {
        self.store.upsert(reservation)
    }

    /// Remove a reservation record; `true` if one was removed
    pub fn delete(&mut self, plate: &str, sailing_id: &str) -> Result<bool> {
        self.store
            .delete(&(plate.to_string(), sailing_id.to_string()))
    }

    /// Every reservation on the given sailing
    pub fn all_on_sailing(&mut self, sailing_id: &str) -> Result<Vec<Reservation>> {
        self.store
            .get_all_matching(|r| r.sailing_id() == sailing_id)
    }

    /// Every reservation held by the given vehicle
    pub fn all_with_vehicle(&mut self, plate: &str) -> Result<Vec<Reservation>> {
        self.store.get_all_matching(|r| r.plate() == plate)
    }

    /// Number of reservations on the given sailing
    pub fn count_on_sailing(&mut self, sailing_id: &str) -> Result<usize> {
        Ok(self.all_on_sailing(sailing_id)?.len())
    }

    pub fn all(&mut self) -> Result<Vec<Reservation>> {
        self.store.get_all()
    }
}
