//! Restricts a raw file to an optional half-open absolute window.
//!
//! A [`FileWindow`] owns the underlying [`RawFile`] handle and translates
//! caller-facing natural positions into absolute positions by applying the
//! window's start offset. Reads that land past the window's end (or past end
//! of file) yield short results; mutations there are range errors.

use std::path::Path;

use crate::error::{Error, Result};
use crate::pos::{Absolute, Natural};
use crate::raw::RawFile;

/// A raw file constrained to a half-open absolute range `[start, end)`.
///
/// Both bounds are optional. The window is fixed for the lifetime of the
/// value; a window with equal present bounds is rejected at construction
/// since it admits no positions at all.
#[derive(Debug)]
pub struct FileWindow {
    raw: RawFile,
    start: Option<Absolute>,
    end: Option<Absolute>,
}

impl FileWindow {
    /// Opens `path` constrained to `[start, end)`.
    pub fn open(
        path: impl AsRef<Path>,
        start: Option<Absolute>,
        end: Option<Absolute>,
        write: bool,
    ) -> Result<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if start == end {
                return Err(Error::EmptyWindow);
            }
        }

        let raw = RawFile::open(path, write)?;
        Ok(Self { raw, start, end })
    }

    /// Translates a natural position to an absolute one.
    ///
    /// Fails with [`Error::PositionOutOfRange`] if the translated position
    /// falls at or past the window's end bound.
    pub fn to_absolute(&self, position: Natural) -> Result<Absolute> {
        let absolute = position.get() + self.start_offset();
        if let Some(end) = self.end {
            if absolute >= end.get() {
                return Err(Error::PositionOutOfRange { position });
            }
        }
        Ok(Absolute::new(absolute))
    }

    /// Returns whether the natural position is inside the window.
    pub fn contains(&self, position: Natural) -> bool {
        self.to_absolute(position).is_ok()
    }

    /// Returns whether an absolute position falls inside the window bounds.
    pub fn is_valid_absolute(&self, position: Absolute) -> bool {
        if let Some(start) = self.start {
            if position < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if position >= end {
                return false;
            }
        }
        true
    }

    /// Returns whether the underlying file was opened with write access.
    pub fn is_writable(&self) -> bool {
        self.raw.is_writable()
    }

    /// Returns the path the underlying file was opened from.
    pub fn path(&self) -> &Path {
        self.raw.path()
    }

    /// Reads the single byte at `position`, or `None` past the visible end.
    pub fn read_byte(&mut self, position: Natural) -> Result<Option<u8>> {
        let bytes = self.read(position, 1)?;
        Ok(bytes.first().copied())
    }

    /// Reads up to `amount` bytes at `position`.
    ///
    /// Reads past the window's end or past end of file return a short
    /// (possibly empty) result, not an error.
    pub fn read(&mut self, position: Natural, amount: usize) -> Result<Vec<u8>> {
        let absolute = match self.to_absolute(position) {
            Ok(absolute) => absolute,
            Err(Error::PositionOutOfRange { .. }) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let amount = match self.end {
            Some(end) => amount.min((end.get() - absolute.get()) as usize),
            None => amount,
        };
        self.raw.read_at(absolute, amount)
    }

    /// Overwrites bytes at `position`.
    pub fn edit(&mut self, position: Natural, data: &[u8]) -> Result<()> {
        let absolute = self.to_absolute(position)?;
        self.raw.write_at(absolute, data)
    }

    /// Inserts `count` zero bytes at `position`, shifting the suffix right.
    pub fn insert(&mut self, position: Natural, count: u64, chunk_size: usize) -> Result<()> {
        let absolute = self.to_absolute(position)?;
        self.raw.insert_bytes(absolute, count, chunk_size)
    }

    /// Removes `count` bytes at `position`, shifting the suffix left.
    ///
    /// Like [`RawFile::delete_bytes`] this does not truncate; the caller
    /// resizes afterwards.
    pub fn delete(&mut self, position: Natural, count: u64, chunk_size: usize) -> Result<()> {
        let absolute = self.to_absolute(position)?;
        self.raw.delete_bytes(absolute, count, chunk_size)
    }

    /// Returns the underlying file size. The window does not clip this.
    pub fn size(&self) -> Result<u64> {
        self.raw.size()
    }

    /// Reopens the underlying file by path.
    ///
    /// After an in-place save renames a rewritten temp file over the
    /// source, the old handle still refers to the replaced content; this
    /// swaps in a handle on the current file.
    pub(crate) fn reopen(&mut self) -> Result<()> {
        let writable = self.raw.is_writable();
        self.raw = RawFile::open(self.raw.path().to_path_buf(), writable)?;
        Ok(())
    }

    /// The absolute offset added to every natural position.
    pub(crate) fn start_offset(&self) -> u64 {
        self.start.map_or(0, Absolute::get)
    }

    pub(crate) fn raw_mut(&mut self) -> &mut RawFile {
        &mut self.raw
    }
}
