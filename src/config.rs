//! Configuration for ferrydesk
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a ferrydesk terminal instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files.
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── sailings.dat      (sailing records)
    ///     ├── vehicles.dat      (vehicle records)
    ///     └── reservations.dat  (reservation records)
    pub data_dir: PathBuf,

    /// Sailing store file name (relative to `data_dir`)
    pub sailing_file: String,

    /// Vehicle store file name (relative to `data_dir`)
    pub vehicle_file: String,

    /// Reservation store file name (relative to `data_dir`)
    pub reservation_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./ferrydesk_data"),
            sailing_file: "sailings.dat".to_string(),
            vehicle_file: "vehicles.dat".to_string(),
            reservation_file: "reservations.dat".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Full path of the sailing store file
    pub fn sailing_path(&self) -> PathBuf {
        self.data_dir.join(&self.sailing_file)
    }

    /// Full path of the vehicle store file
    pub fn vehicle_path(&self) -> PathBuf {
        self.data_dir.join(&self.vehicle_file)
    }

    /// Full path of the reservation store file
    pub fn reservation_path(&self) -> PathBuf {
        self.data_dir.join(&self.reservation_file)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all store files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the sailing store file name
    pub fn sailing_file(mut self, name: impl Into<String>) -> Self {
        self.config.sailing_file = name.into();
        self
    }

    /// Set the vehicle store file name
    pub fn vehicle_file(mut self, name: impl Into<String>) -> Self {
        self.config.vehicle_file = name.into();
        self
    }

    /// Set the reservation store file name
    pub fn reservation_file(mut self, name: impl Into<String>) -> Self {
        self.config.reservation_file = name.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
