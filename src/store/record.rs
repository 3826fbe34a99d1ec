//! Fixed-record trait and field codecs
//!
//! Defines the shape contract a type must satisfy to live in a
//! [`RecordStore`](super::RecordStore), plus helpers for the NUL-padded
//! text fields shared by all record layouts.

use crate::error::{FerryError, Result};

/// A record with a deterministic fixed byte width.
///
/// `encode` must fill exactly `SIZE` bytes and `decode` must read exactly
/// `SIZE` bytes, so that record `i` always lives at offset `i × SIZE`.
pub trait FixedRecord: Sized {
    /// Exact serialized width in bytes
    const SIZE: usize;

    /// Owned lookup key (composite keys use a tuple)
    type Key: PartialEq;

    /// The key this record is stored under
    fn key(&self) -> Self::Key;

    /// Serialize into `buf`, which is exactly `SIZE` bytes
    fn encode(&self, buf: &mut [u8]);

    /// Deserialize from `buf`, which is exactly `SIZE` bytes
    fn decode(buf: &[u8]) -> Result<Self>;
}

/// Write `text` into a fixed-width field, NUL-padding the tail.
///
/// Over-length input is truncated at the field width. Callers that must not
/// silently lose key bytes validate length before constructing the record.
pub fn write_text(field: &mut [u8], text: &str) {
    let bytes = text.as_bytes();
    let n = bytes.len().min(field.len());
    field[..n].copy_from_slice(&bytes[..n]);
    for b in &mut field[n..] {
        *b = 0;
    }
}

/// Truncate text at a field width, backing up to a char boundary so the
/// result is always valid UTF-8.
pub fn clip_text(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

/// Read a NUL-padded fixed-width text field back into a `String`.
///
/// Trailing NULs are trimmed; an interior NUL or non-UTF-8 content fails
/// shape validation.
pub fn read_text(field: &[u8]) -> Result<String> {
    let end = field
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |pos| pos + 1);
    let head = &field[..end];
    if head.contains(&0) {
        return Err(FerryError::Malformed("interior NUL in text field".into()));
    }
    std::str::from_utf8(head)
        .map(str::to_owned)
        .map_err(|e| FerryError::Malformed(format!("non-UTF-8 text field: {}", e)))
}
