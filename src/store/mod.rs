//! Record Store Module
//!
//! Generic fixed-layout binary persistence used by every entity file.
//!
//! ## Responsibilities
//! - Durable key → payload mapping over a single file of same-sized records
//! - Point lookup, upsert (in-place overwrite or append), delete, scans
//! - Paginated forward scan with an explicit, process-local cursor
//!
//! ## File Format
//! ```text
//! ┌────────────────────────────────────────┐
//! │ Record 0   (R::SIZE bytes)             │
//! ├────────────────────────────────────────┤
//! │ Record 1   (R::SIZE bytes)             │
//! ├────────────────────────────────────────┤
//! │ ...                                    │
//! └────────────────────────────────────────┘
//! ```
//!
//! Every record is written at `index × R::SIZE`, so an update is a single
//! fixed-length overwrite at the found offset. Delete is a full-file
//! rewrite — the format keeps no free list or tombstones.

mod file;
mod record;

pub use file::RecordStore;
pub use record::{clip_text, read_text, write_text, FixedRecord};
