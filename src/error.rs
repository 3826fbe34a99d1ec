//! Error types for ferrydesk
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using FerryError
pub type Result<T> = std::result::Result<T, FerryError>;

/// Unified error type for ferrydesk operations
#[derive(Debug, Error)]
pub enum FerryError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Store Errors
    // -------------------------------------------------------------------------
    /// Operation attempted on a store with no open file handle.
    #[error("record store is not open")]
    NotOpen,

    /// An on-disk record failed shape validation.
    #[error("malformed record: {0}")]
    Malformed(String),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    /// Sailing, vehicle, or reservation lookup failed.
    #[error("not found")]
    NotFound,

    /// Attempted creation under a key that already exists.
    #[error("already exists")]
    AlreadyExists,

    /// A capacity consume would drive a remaining pool negative.
    #[error("capacity exceeded")]
    CapacityExceeded,
}
