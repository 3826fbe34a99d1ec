//! # ferrydesk
//!
//! Ferry terminal core: sailings, vehicles, and vehicle reservations over
//! a persistent fixed-record binary store, with:
//! - One fixed-layout record file per entity type
//! - Two-pool lane-capacity accounting per sailing
//! - A reservation lifecycle (create → check-in | cancel) with fare
//!   computation at check-in
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Caller (CLI / UI layer)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Terminal                                │
//! │        (cross-store sequencing, capacity transactions)       │
//! └──────┬───────────────────┬───────────────────┬──────────────┘
//!        │                   │                   │
//!        ▼                   ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Sailings   │     │  Vehicles   │     │Reservations │
//! │  (ledger)   │     │ (directory) │     │   (book)    │
//! └──────┬──────┘     └──────┬──────┘     └──────┬──────┘
//!        │                   │                   │
//!        └───────────────────┼───────────────────┘
//!                            ▼
//!                   ┌─────────────────┐
//!                   │  RecordStore<R> │
//!                   │ (fixed records) │
//!                   └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod reservation;
pub mod sailing;
pub mod store;
pub mod terminal;
pub mod vehicle;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use error::{FerryError, Result};
pub use terminal::Terminal;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ferrydesk
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
