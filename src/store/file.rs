//! Record store file backend
//!
//! Owns one open file handle and walks it with blocking positional I/O.
//! All lookups are linear scans from position 0; pagination keeps a
//! process-local cursor that callers rewind explicitly.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::FixedRecord;
use crate::error::{FerryError, Result};

/// Outcome of reading one record slot
enum Slot<R> {
    Record(R),
    /// Decodable bytes were present but failed shape validation
    Malformed,
    /// Short read — no more records
    Eof,
}

/// Durable mapping from a record key to a fixed-shape payload.
///
/// The handle is owned by the store and released on [`close`](Self::close)
/// or drop. Every operation after `close` fails with
/// [`FerryError::NotOpen`] without touching the file system.
pub struct RecordStore<R: FixedRecord> {
    path: PathBuf,
    file: Option<File>,
    /// Next record index for `scan_page`
    cursor: u64,
    _record: PhantomData<R>,
}

impl<R: FixedRecord> RecordStore<R> {
    /// Open the store file, creating it empty if absent.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        debug!(path = %path.display(), record_size = R::SIZE, "record store opened");

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            cursor: 0,
            _record: PhantomData,
        })
    }

    /// Flush and release the file handle. No-op if already closed.
    pub fn close(&mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            file.sync_all()?;
            debug!(path = %self.path.display(), "record store closed");
        }
        Ok(())
    }

    /// Whether the store currently holds an open handle
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Number of whole record slots in the file
    pub fn record_count(&mut self) -> Result<u64> {
        let file = self.handle()?;
        Ok(file.metadata()?.len() / R::SIZE as u64)
    }

    /// Check whether a record with the given key is present
    pub fn exists(&mut self, key: &R::Key) -> Result<bool> {
        Ok(self.find(key)?.is_some())
    }

    /// Point lookup by key; `None` if no record matches
    pub fn get(&mut self, key: &R::Key) -> Result<Option<R>> {
        Ok(self.find(key)?.map(|(_, record)| record))
    }

    /// Insert or update a record.
    ///
    /// If a record with the same key exists its byte range is overwritten
    /// in place; otherwise the record is appended. At most one record per
    /// key ever exists in the file.
    pub fn upsert(&mut self, record: &R) -> Result<()> {
        let slot = match self.find(&record.key())? {
            Some((index, _)) => index,
            None => self.record_count()?,
        };

        let mut buf = vec![0u8; R::SIZE];
        record.encode(&mut buf);

        let offset = slot * R::SIZE as u64;
        let file = self.handle()?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(&buf)?;
        file.flush()?;
        Ok(())
    }

    /// Remove the record with the given key, if present.
    ///
    /// The store has no free list, so delete collects every surviving
    /// record, truncates the file, and rewrites the filtered set. If the
    /// rewrite fails partway the handle is dropped so the store reports
    /// itself closed instead of half-open.
    ///
    /// Returns `true` if a record was removed.
    pub fn delete(&mut self, key: &R::Key) -> Result<bool> {
        let all = self.collect(|_| true)?;
        let before = all.len();
        let survivors: Vec<R> = all.into_iter().filter(|r| r.key() != *key).collect();
        if survivors.len() == before {
            return Ok(false);
        }

        if let Err(e) = self.rewrite(&survivors) {
            warn!(path = %self.path.display(), "rewrite failed mid-delete, closing store");
            self.file = None;
            return Err(e);
        }
        Ok(true)
    }

    /// Read the next page of up to `page_size` records.
    ///
    /// Advances the internal cursor; a short or empty page means the scan
    /// hit end-of-file. The cursor does not wrap — call
    /// [`reset_scan`](Self::reset_scan) to start over.
    pub fn scan_page(&mut self, page_size: usize) -> Result<Vec<R>> {
        let mut page = Vec::with_capacity(page_size);
        while page.len() < page_size {
            match self.read_slot(self.cursor)? {
                Slot::Eof => break,
                Slot::Malformed => self.cursor += 1,
                Slot::Record(record) => {
                    page.push(record);
                    self.cursor += 1;
                }
            }
        }
        Ok(page)
    }

    /// Rewind the pagination cursor to the start of the file
    pub fn reset_scan(&mut self) {
        self.cursor = 0;
    }

    /// Full scan with no cursor side effects
    pub fn get_all(&mut self) -> Result<Vec<R>> {
        self.collect(|_| true)
    }

    /// Full scan keeping only records matching `predicate`,
    /// with no cursor side effects
    pub fn get_all_matching(&mut self, predicate: impl Fn(&R) -> bool) -> Result<Vec<R>> {
        self.collect(predicate)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn handle(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or(FerryError::NotOpen)
    }

    /// Scan from position 0 for the first record matching `key`
    fn find(&mut self, key: &R::Key) -> Result<Option<(u64, R)>> {
        let mut index = 0;
        loop {
            match self.read_slot(index)? {
                Slot::Eof => return Ok(None),
                Slot::Malformed => {}
                Slot::Record(record) => {
                    if record.key() == *key {
                        return Ok(Some((index, record)));
                    }
                }
            }
            index += 1;
        }
    }

    fn collect(&mut self, predicate: impl Fn(&R) -> bool) -> Result<Vec<R>> {
        let mut out = Vec::new();
        let mut index = 0;
        loop {
            match self.read_slot(index)? {
                Slot::Eof => return Ok(out),
                Slot::Malformed => {}
                Slot::Record(record) => {
                    if predicate(&record) {
                        out.push(record);
                    }
                }
            }
            index += 1;
        }
    }

    /// Read the record slot at `index`.
    ///
    /// A short read is end-of-file, not an error; a record that fails
    /// decoding is reported malformed and treated as absent.
    fn read_slot(&mut self, index: u64) -> Result<Slot<R>> {
        let offset = index * R::SIZE as u64;
        let file = self.handle()?;
        file.seek(SeekFrom::Start(offset))?;

        let mut buf = vec![0u8; R::SIZE];
        match file.read_exact(&mut buf) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(Slot::Eof),
            Err(e) => return Err(e.into()),
        }

        match R::decode(&buf) {
            Ok(record) => Ok(Slot::Record(record)),
            Err(FerryError::Malformed(reason)) => {
                warn!(
                    path = %self.path.display(),
                    index,
                    reason = %reason,
                    "skipping malformed record"
                );
                Ok(Slot::Malformed)
            }
            Err(e) => Err(e),
        }
    }

    /// Truncate the file and write `records` back in order
    fn rewrite(&mut self, records: &[R]) -> Result<()> {
        let file = self.handle()?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;

        let mut buf = vec![0u8; R::SIZE];
        for record in records {
            record.encode(&mut buf);
            file.write_all(&buf)?;
        }
        file.flush()?;
        Ok(())
    }
}

impl<R: FixedRecord> Drop for RecordStore<R> {
    fn drop(&mut self) {
        // Handle closes on all exit paths; sync failures at drop are ignored.
        let _ = self.close();
    }
}
