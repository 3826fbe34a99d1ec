//! Terminal Module
//!
//! The coordinator that owns the three record stores and sequences every
//! operation that touches more than one of them.
//!
//! ## Responsibilities
//! - Wire store file paths from [`Config`]
//! - Sailing add/edit/delete and the paginated report feed
//! - Vehicle directory maintenance
//! - The reservation lifecycle: create (consumes lane capacity),
//!   check-in (fare), cancel (restores capacity), bulk delete and move
//!
//! ## Consistency Model
//!
//! Single-threaded and sequential: a reservation add verifies and persists
//! the sailing's capacity through the sailing store before the reservation
//! record is written. There is no rollback if the process dies between the
//! two writes.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{FerryError, Result};
use crate::reservation::{fare, Reservation, ReservationBook};
use crate::sailing::{Allocation, Sailing, SailingLedger};
use crate::vehicle::{Vehicle, VehicleDirectory, REGULAR_HEIGHT, REGULAR_LENGTH};

/// One row of the sailing report: a sailing and its booked vehicle count
#[derive(Debug, Clone)]
pub struct SailingStatus {
    pub sailing: Sailing,
    pub vehicles: usize,
}

/// The terminal operator's core: three stores and the logic between them
pub struct Terminal {
    config: Config,
    sailings: SailingLedger,
    vehicles: VehicleDirectory,
    reservations: ReservationBook,
}

impl Terminal {
    /// Open or create a terminal with the given config.
    ///
    /// Creates the data directory and the three store files as needed.
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let sailings = SailingLedger::open(&config.sailing_path())?;
        let vehicles = VehicleDirectory::open(&config.vehicle_path())?;
        let reservations = ReservationBook::open(&config.reservation_path())?;

        debug!(data_dir = %config.data_dir.display(), "terminal opened");

        Ok(Self {
            config,
            sailings,
            vehicles,
            reservations,
        })
    }

    /// Open with a data directory (convenience method)
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Flush and close all three stores
    pub fn close(mut self) -> Result<()> {
        self.sailings.close()?;
        self.vehicles.close()?;
        self.reservations.close()?;
        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Sailing Operations
    // =========================================================================

    /// Create a sailing with full remaining capacity.
    /// Fails with `AlreadyExists` if the id is taken.
    pub fn add_sailing(
        &mut self,
        id: &str,
        vessel: &str,
        low_total: i32,
        high_total: i32,
    ) -> Result<()> {
        let sailing = Sailing::new(id, vessel, low_total, high_total)?;
        self.sailings.add(&sailing)
    }

    /// Look up a sailing by id
    pub fn sailing(&mut self, id: &str) -> Result<Sailing> {
        self.sailings.get(id)?.ok_or(FerryError::NotFound)
    }

    pub fn sailing_exists(&mut self, id: &str) -> Result<bool> {
        self.sailings.exists(id)
    }

    /// Edit a sailing's vessel and/or capacity totals.
    ///
    /// Shrinking a total below its currently consumed amount fails with
    /// `CapacityExceeded` and leaves the sailing unchanged.
    pub fn edit_sailing(
        &mut self,
        id: &str,
        vessel: Option<&str>,
        low_total: Option<i32>,
        high_total: Option<i32>,
    ) -> Result<Sailing> {
        let mut sailing = self.sailing(id)?;
        if let Some(vessel) = vessel {
            sailing.set_vessel(vessel);
        }
        if let Some(low) = low_total {
            sailing.set_low_total(low)?;
        }
        if let Some(high) = high_total {
            sailing.set_high_total(high)?;
        }
        self.sailings.persist(&sailing)?;
        Ok(sailing)
    }

    /// Re-key a sailing (terminal, day, or hour changed) and carry its
    /// reservations over to the new id. Capacity state travels with the
    /// sailing record, so no allocation changes hands.
    pub fn rename_sailing(&mut self, from_id: &str, to_id: &str) -> Result<()> {
        if self.sailings.exists(to_id)? {
            return Err(FerryError::AlreadyExists);
        }
        let mut sailing = self.sailing(from_id)?;
        sailing.rename(to_id)?;

        self.sailings.delete(from_id)?;
        self.sailings.persist(&sailing)?;

        for mut reservation in self.reservations.all_on_sailing(from_id)? {
            self.reservations
                .delete(reservation.plate(), from_id)?;
            reservation.relocate(to_id);
            self.reservations.upsert(&reservation)?;
        }
        Ok(())
    }

    /// Delete a sailing record.
    ///
    /// Its reservations are not touched — relocate or delete them first
    /// (see [`move_reservations`](Self::move_reservations) and
    /// [`delete_all_on_sailing`](Self::delete_all_on_sailing)).
    pub fn delete_sailing(&mut self, id: &str) -> Result<()> {
        if !self.sailings.delete(id)? {
            return Err(FerryError::NotFound);
        }
        Ok(())
    }

    /// Next page of the sailing report. A short or empty page means the
    /// scan reached the last sailing; call
    /// [`reset_sailing_report`](Self::reset_sailing_report) to loop.
    pub fn sailing_report_page(&mut self, page_size: usize) -> Result<Vec<SailingStatus>> {
        let page = self.sailings.scan_page(page_size)?;
        let mut rows = Vec::with_capacity(page.len());
        for sailing in page {
            let vehicles = self.reservations.count_on_sailing(sailing.id())?;
            rows.push(SailingStatus { sailing, vehicles });
        }
        Ok(rows)
    }

    /// Rewind the sailing report to the first record
    pub fn reset_sailing_report(&mut self) {
        self.sailings.reset_scan();
    }

    pub fn all_sailings(&mut self) -> Result<Vec<Sailing>> {
        self.sailings.all()
    }

    // =========================================================================
    // Vehicle Operations
    // =========================================================================

    /// Register a vehicle profile explicitly.
    /// Fails with `AlreadyExists` if the plate is taken.
    pub fn add_vehicle(
        &mut self,
        plate: &str,
        phone: &str,
        length: f32,
        height: f32,
    ) -> Result<()> {
        if self.vehicles.exists(plate)? {
            return Err(FerryError::AlreadyExists);
        }
        self.vehicles.upsert(&Vehicle::new(plate, phone, length, height))
    }

    /// Update an existing vehicle's contact and dimensions
    pub fn edit_vehicle(
        &mut self,
        plate: &str,
        phone: &str,
        length: f32,
        height: f32,
    ) -> Result<()> {
        let mut vehicle = self.vehicle(plate)?;
        vehicle.update(phone, length, height);
        self.vehicles.upsert(&vehicle)
    }

    /// Look up a vehicle by plate
    pub fn vehicle(&mut self, plate: &str) -> Result<Vehicle> {
        self.vehicles.get(plate)?.ok_or(FerryError::NotFound)
    }

    /// Remove a vehicle profile
    pub fn delete_vehicle(&mut self, plate: &str) -> Result<()> {
        if !self.vehicles.delete(plate)? {
            return Err(FerryError::NotFound);
        }
        Ok(())
    }

    pub fn all_vehicles(&mut self) -> Result<Vec<Vehicle>> {
        self.vehicles.all()
    }

    // =========================================================================
    // Reservation Lifecycle
    // =========================================================================

    /// Reserve a vehicle onto a sailing.
    ///
    /// Resolves the vehicle profile, creating it on first sight (supplied
    /// dimensions, or the standard regular footprint when none are given),
    /// sizes the allocation, applies it to both capacity pools as one
    /// transaction, persists the sailing, and only then writes the
    /// `Pending` reservation record.
    pub fn add_reservation(
        &mut self,
        sailing_id: &str,
        plate: &str,
        phone: &str,
        length: f32,
        height: f32,
    ) -> Result<()> {
        let mut sailing = self.sailing(sailing_id)?;
        if self.reservations.exists(plate, sailing_id)? {
            return Err(FerryError::AlreadyExists);
        }

        let vehicle = match self.vehicles.get(plate)? {
            Some(vehicle) => vehicle,
            None => {
                // Unknown plate: create the profile now. Zero dimensions
                // mean "not supplied" and default to the regular footprint.
                let (length, height) = if length > 0.0 && height > 0.0 {
                    (length, height)
                } else {
                    (REGULAR_LENGTH, REGULAR_HEIGHT)
                };
                let vehicle = Vehicle::new(plate, phone, length, height);
                self.vehicles.upsert(&vehicle)?;
                vehicle
            }
        };

        let occupied = self.reservations.count_on_sailing(sailing_id)? > 0;
        let allocation = Allocation::for_vehicle(&vehicle, occupied);
        sailing.consume(&allocation)?;

        // Capacity is committed before the reservation record exists.
        self.sailings.persist(&sailing)?;
        self.reservations
            .upsert(&Reservation::new(vehicle.plate(), sailing_id))?;

        debug!(
            sailing = sailing_id,
            plate = vehicle.plate(),
            low = allocation.low,
            high = allocation.high,
            "reservation added"
        );
        Ok(())
    }

    /// Check a reservation in and return the fare.
    ///
    /// The `onboard` transition happens exactly once; calling again on a
    /// boarded reservation re-computes the same fare and mutates nothing.
    /// Classification and dimensions come from the vehicle directory.
    pub fn check_in(&mut self, sailing_id: &str, plate: &str) -> Result<f32> {
        let mut reservation = self
            .reservations
            .get(plate, sailing_id)?
            .ok_or(FerryError::NotFound)?;

        if reservation.board() {
            self.reservations.upsert(&reservation)?;
        }

        let vehicle = self.profile_or_regular(plate)?;
        Ok(fare(vehicle.is_special(), vehicle.length(), vehicle.height()))
    }

    /// Cancel a reservation and restore its allocation on the sailing.
    ///
    /// The spacing share is restored only when other reservations remain,
    /// mirroring how it was consumed, so the pool always reads
    /// `total - Σ footprints - spacing × (n - 1)`.
    pub fn cancel_reservation(&mut self, plate: &str, sailing_id: &str) -> Result<()> {
        if !self.reservations.delete(plate, sailing_id)? {
            return Err(FerryError::NotFound);
        }

        // The sailing may itself already be gone; nothing to restore then.
        if let Some(mut sailing) = self.sailings.get(sailing_id)? {
            let vehicle = self.profile_or_regular(plate)?;
            let others_remain = self.reservations.count_on_sailing(sailing_id)? > 0;
            let allocation = Allocation::for_vehicle(&vehicle, others_remain);
            sailing.restore(&allocation);
            self.sailings.persist(&sailing)?;
        }
        Ok(())
    }

    /// Delete every reservation on a sailing, returning how many were
    /// removed. If the sailing still exists its pools reset to full,
    /// since no allocation remains outstanding.
    pub fn delete_all_on_sailing(&mut self, sailing_id: &str) -> Result<usize> {
        let records = self.reservations.all_on_sailing(sailing_id)?;
        let mut count = 0;
        for record in &records {
            if self.reservations.delete(record.plate(), sailing_id)? {
                count += 1;
            }
        }

        if count > 0 {
            if let Some(mut sailing) = self.sailings.get(sailing_id)? {
                sailing.reset_remaining();
                self.sailings.persist(&sailing)?;
            }
        }
        Ok(count)
    }

    /// Move reservations from one sailing to another, returning how many
    /// moved.
    ///
    /// Each move is capacity-checked on the destination; a vehicle that no
    /// longer fits stays on the source and is not counted. Source capacity
    /// is restored per moved reservation under the same spacing rule as
    /// cancellation.
    pub fn move_reservations(&mut self, from_id: &str, to_id: &str) -> Result<usize> {
        let mut destination = self.sailing(to_id)?;
        let mut source = self.sailings.get(from_id)?;

        let mut destination_occupied = self.reservations.count_on_sailing(to_id)? > 0;
        let mut count = 0;

        for reservation in self.reservations.all_on_sailing(from_id)? {
            let plate = reservation.plate().to_string();
            if self.reservations.exists(&plate, to_id)? {
                warn!(plate = %plate, to = to_id, "already reserved on destination, skipping");
                continue;
            }

            let vehicle = self.profile_or_regular(&plate)?;
            let needed = Allocation::for_vehicle(&vehicle, destination_occupied);
            if destination.consume(&needed).is_err() {
                warn!(plate = %plate, to = to_id, "no capacity on destination, skipping");
                continue;
            }

            self.reservations.delete(&plate, from_id)?;
            let mut moved = reservation;
            moved.relocate(to_id);
            self.reservations.upsert(&moved)?;

            if let Some(sailing) = source.as_mut() {
                let others_remain = self.reservations.count_on_sailing(from_id)? > 0;
                let freed = Allocation::for_vehicle(&vehicle, others_remain);
                sailing.restore(&freed);
            }

            destination_occupied = true;
            count += 1;
        }

        self.sailings.persist(&destination)?;
        if let Some(sailing) = source.as_ref() {
            self.sailings.persist(sailing)?;
        }
        Ok(count)
    }

    /// Every reservation on a sailing
    pub fn reservations_on(&mut self, sailing_id: &str) -> Result<Vec<Reservation>> {
        self.reservations.all_on_sailing(sailing_id)
    }

    /// Every reservation held by a vehicle
    pub fn reservations_for(&mut self, plate: &str) -> Result<Vec<Reservation>> {
        self.reservations.all_with_vehicle(plate)
    }

    /// Look up a single reservation
    pub fn reservation(&mut self, plate: &str, sailing_id: &str) -> Result<Reservation> {
        self.reservations
            .get(plate, sailing_id)?
            .ok_or(FerryError::NotFound)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// The directory profile for a plate, or the standard regular
    /// footprint when no profile survives for it.
    fn profile_or_regular(&mut self, plate: &str) -> Result<Vehicle> {
        Ok(self
            .vehicles
            .get(plate)?
            .unwrap_or_else(|| Vehicle::new(plate, "", REGULAR_LENGTH, REGULAR_HEIGHT)))
    }
}
