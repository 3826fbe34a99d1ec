//! Sailing Capacity Ledger
//!
//! A sailing carries two independent lane-capacity pools: low-lane length
//! for regular vehicles and high-lane length for special (tall or long)
//! vehicles. Reservations consume from both pools together; cancellation
//! restores what was consumed. Remaining capacity never goes negative and
//! never exceeds the pool total.

use std::path::Path;

use crate::error::{FerryError, Result};
use crate::store::{clip_text, read_text, write_text, FixedRecord, RecordStore};
use crate::vehicle::{Vehicle, REGULAR_HEIGHT, REGULAR_LENGTH};

/// Gap kept between vehicles on a lane (meters). The first vehicle on a
/// sailing incurs no spacing.
pub const VEHICLE_SPACING: f32 = 0.5;

/// Max vessel name length in characters
pub const VESSEL_MAX: usize = 25;

// Field widths in the sailing record layout
const SAILING_ID_FIELD: usize = 9;
const VESSEL_FIELD: usize = 26;

/// Validate the `TER-DD-HH` sailing id shape:
/// three letters, two-digit day, two-digit hour.
pub fn validate_sailing_id(id: &str) -> Result<()> {
    let bytes = id.as_bytes();
    let ok = bytes.len() == SAILING_ID_FIELD
        && bytes[0..3].iter().all(u8::is_ascii_alphabetic)
        && bytes[3] == b'-'
        && bytes[4..6].iter().all(u8::is_ascii_digit)
        && bytes[6] == b'-'
        && bytes[7..9].iter().all(u8::is_ascii_digit);
    if ok {
        Ok(())
    } else {
        Err(FerryError::Malformed(format!(
            "sailing id {:?} does not match TER-DD-HH",
            id
        )))
    }
}

/// One lane-capacity allocation: what a single reservation takes from
/// each pool of its sailing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    /// Meters consumed from the low (regular) lane pool
    pub low: f32,
    /// Meters consumed from the high (special) lane pool
    pub high: f32,
}

impl Allocation {
    /// Size the allocation for a vehicle.
    ///
    /// Regular vehicles take the standard footprint regardless of their
    /// actual dimensions; special vehicles take their own length and
    /// height. `with_spacing` is true when the sailing already holds at
    /// least one reservation.
    pub fn for_vehicle(vehicle: &Vehicle, with_spacing: bool) -> Self {
        let spacing = if with_spacing { VEHICLE_SPACING } else { 0.0 };
        if vehicle.is_special() {
            Self {
                low: vehicle.length() + spacing,
                high: vehicle.height(),
            }
        } else {
            Self {
                low: REGULAR_LENGTH + spacing,
                high: REGULAR_HEIGHT,
            }
        }
    }
}

/// One scheduled ferry departure with two lane-capacity pools
#[derive(Debug, Clone, PartialEq)]
pub struct Sailing {
    id: String,
    vessel: String,
    low_total: i32,
    high_total: i32,
    low_remaining: f32,
    high_remaining: f32,
}

impl Sailing {
    /// Create a sailing with full remaining capacity.
    ///
    /// The id must match `TER-DD-HH` and the totals must be non-negative.
    pub fn new(id: &str, vessel: &str, low_total: i32, high_total: i32) -> Result<Self> {
        validate_sailing_id(id)?;
        if low_total < 0 || high_total < 0 {
            return Err(FerryError::Malformed("negative capacity total".into()));
        }
        Ok(Self {
            id: id.to_string(),
            vessel: clip_text(vessel, VESSEL_MAX),
            low_total,
            high_total,
            low_remaining: low_total as f32,
            high_remaining: high_total as f32,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn vessel(&self) -> &str {
        &self.vessel
    }

    pub fn low_total(&self) -> i32 {
        self.low_total
    }

    pub fn high_total(&self) -> i32 {
        self.high_total
    }

    pub fn low_remaining(&self) -> f32 {
        self.low_remaining
    }

    pub fn high_remaining(&self) -> f32 {
        self.high_remaining
    }

    /// Meters currently consumed from the low pool
    pub fn low_consumed(&self) -> f32 {
        self.low_total as f32 - self.low_remaining
    }

    /// Meters currently consumed from the high pool
    pub fn high_consumed(&self) -> f32 {
        self.high_total as f32 - self.high_remaining
    }

    // -------------------------------------------------------------------------
    // Capacity Operations
    // -------------------------------------------------------------------------

    /// Take `amount` from the low pool; fails without mutating if the
    /// pool would go negative.
    pub fn consume_low(&mut self, amount: f32) -> Result<()> {
        if self.low_remaining - amount < 0.0 {
            return Err(FerryError::CapacityExceeded);
        }
        self.low_remaining -= amount;
        Ok(())
    }

    /// Take `amount` from the high pool; fails without mutating if the
    /// pool would go negative.
    pub fn consume_high(&mut self, amount: f32) -> Result<()> {
        if self.high_remaining - amount < 0.0 {
            return Err(FerryError::CapacityExceeded);
        }
        self.high_remaining -= amount;
        Ok(())
    }

    /// Give `amount` back to the low pool, clamped at the pool total
    pub fn restore_low(&mut self, amount: f32) {
        self.low_remaining = (self.low_remaining + amount).min(self.low_total as f32);
    }

    /// Give `amount` back to the high pool, clamped at the pool total
    pub fn restore_high(&mut self, amount: f32) {
        self.high_remaining = (self.high_remaining + amount).min(self.high_total as f32);
    }

    /// Apply one reservation's allocation to both pools, or neither.
    ///
    /// Both pools are checked before either is touched, so a failed
    /// consume leaves the sailing exactly as it was.
    pub fn consume(&mut self, allocation: &Allocation) -> Result<()> {
        if self.low_remaining - allocation.low < 0.0
            || self.high_remaining - allocation.high < 0.0
        {
            return Err(FerryError::CapacityExceeded);
        }
        self.low_remaining -= allocation.low;
        self.high_remaining -= allocation.high;
        Ok(())
    }

    /// Release one reservation's allocation back to both pools
    pub fn restore(&mut self, allocation: &Allocation) {
        self.restore_low(allocation.low);
        self.restore_high(allocation.high);
    }

    /// Reset both pools to their totals (no reservations outstanding)
    pub fn reset_remaining(&mut self) {
        self.low_remaining = self.low_total as f32;
        self.high_remaining = self.high_total as f32;
    }

    // -------------------------------------------------------------------------
    // Edit Operations
    // -------------------------------------------------------------------------

    /// Re-key the sailing (terminal, day, or hour changed).
    /// The new id must match `TER-DD-HH`.
    pub fn rename(&mut self, new_id: &str) -> Result<()> {
        validate_sailing_id(new_id)?;
        self.id = new_id.to_string();
        Ok(())
    }

    /// Replace the vessel name, truncating at the stored width
    pub fn set_vessel(&mut self, vessel: &str) {
        self.vessel = clip_text(vessel, VESSEL_MAX);
    }

    /// Retarget the low pool total.
    ///
    /// Fails if the new total cannot hold what is already consumed;
    /// otherwise the remaining capacity becomes `new_total - consumed`.
    pub fn set_low_total(&mut self, new_total: i32) -> Result<()> {
        let consumed = self.low_consumed();
        if new_total < 0 || (new_total as f32) < consumed {
            return Err(FerryError::CapacityExceeded);
        }
        self.low_remaining = new_total as f32 - consumed;
        self.low_total = new_total;
        Ok(())
    }

    /// Retarget the high pool total, same rules as [`set_low_total`](Self::set_low_total)
    pub fn set_high_total(&mut self, new_total: i32) -> Result<()> {
        let consumed = self.high_consumed();
        if new_total < 0 || (new_total as f32) < consumed {
            return Err(FerryError::CapacityExceeded);
        }
        self.high_remaining = new_total as f32 - consumed;
        self.high_total = new_total;
        Ok(())
    }
}

impl FixedRecord for Sailing {
    // id (9) + vessel (26) + two i32 totals + two f32 remainings
    const SIZE: usize = SAILING_ID_FIELD + VESSEL_FIELD + 4 + 4 + 4 + 4;

    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }

    fn encode(&self, buf: &mut [u8]) {
        write_text(&mut buf[0..9], &self.id);
        write_text(&mut buf[9..35], &self.vessel);
        buf[35..39].copy_from_slice(&self.low_total.to_le_bytes());
        buf[39..43].copy_from_slice(&self.high_total.to_le_bytes());
        buf[43..47].copy_from_slice(&self.low_remaining.to_le_bytes());
        buf[47..51].copy_from_slice(&self.high_remaining.to_le_bytes());
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let id = read_text(&buf[0..9])?;
        validate_sailing_id(&id)?;
        let vessel = read_text(&buf[9..35])?;
        let low_total = i32::from_le_bytes(buf[35..39].try_into().unwrap());
        let high_total = i32::from_le_bytes(buf[39..43].try_into().unwrap());
        let low_remaining = f32::from_le_bytes(buf[43..47].try_into().unwrap());
        let high_remaining = f32::from_le_bytes(buf[47..51].try_into().unwrap());

        if low_total < 0 || high_total < 0 {
            return Err(FerryError::Malformed("negative capacity total".into()));
        }
        let in_range = |remaining: f32, total: i32| {
            remaining.is_finite() && remaining >= 0.0 && remaining <= total as f32
        };
        if !in_range(low_remaining, low_total) || !in_range(high_remaining, high_total) {
            return Err(FerryError::Malformed(
                "remaining capacity outside [0, total]".into(),
            ));
        }

        Ok(Self {
            id,
            vessel,
            low_total,
            high_total,
            low_remaining,
            high_remaining,
        })
    }
}

/// Sailing store keyed by sailing id
pub struct SailingLedger {
    store: RecordStore<Sailing>,
}

impl SailingLedger {
    /// Open the sailing file, creating it if absent
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            store: RecordStore::open(path)?,
        })
    }

    /// Flush and release the underlying file
    pub fn close(&mut self) -> Result<()> {
        self.store.close()
    }

    /// Create a sailing; fails if the id is already taken
    pub fn add(&mut self, sailing: &Sailing) -> Result<()> {
        if self.store.exists(&sailing.id)? {
            return Err(FerryError::AlreadyExists);
        }
        self.store.upsert(sailing)
    }

    pub fn exists(&mut self, id: &str) -> Result<bool> {
        self.store.exists(&id.to_string())
    }

    pub fn get(&mut self, id: &str) -> Result<Option<Sailing>> {
        self.store.get(&id.to_string())
    }

    /// Write back a mutated sailing (capacity change or edit)
    pub fn persist(&mut self, sailing: &Sailing) -> Result<()> {
        self.store.upsert(sailing)
    }

    /// Remove a sailing record; `true` if one was removed.
    /// Its reservations are the caller's responsibility.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        self.store.delete(&id.to_string())
    }

    /// Next page of sailings for the report loop
    pub fn scan_page(&mut self, page_size: usize) -> Result<Vec<Sailing>> {
        self.store.scan_page(page_size)
    }

    /// Rewind the report cursor to the first sailing
    pub fn reset_scan(&mut self) {
        self.store.reset_scan();
    }

    pub fn all(&mut self) -> Result<Vec<Sailing>> {
        self.store.get_all()
    }
}
