//! Positioned file access and the in-place byte-shift primitives.
//!
//! [`RawFile`] wraps a [`std::fs::File`] with positioned reads and writes,
//! size queries, and resizing, plus the two chunked shift operations that
//! realize insertion and deletion at the file level:
//! [`insert_bytes`](RawFile::insert_bytes) and
//! [`delete_bytes`](RawFile::delete_bytes).
//!
//! The shift primitives rewrite the file in place and are therefore only
//! ever invoked on a temporary copy during a save; an I/O failure midway
//! corrupts that copy, never the source file.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::pos::Absolute;

/// A file handle with positioned access and in-place shift primitives.
#[derive(Debug)]
pub struct RawFile {
    file: File,
    path: PathBuf,
    writable: bool,
}

impl RawFile {
    /// Opens a regular file for editing.
    ///
    /// Only regular files can be edited: directories, FIFOs, sockets, and
    /// character devices are rejected with [`Error::UnopenableFile`]. A
    /// missing file is [`Error::FileDoesNotExist`]; any other open failure
    /// is [`Error::UnknownOpen`].
    pub fn open(path: impl AsRef<Path>, write: bool) -> Result<Self> {
        let path = path.as_ref();

        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::FileDoesNotExist {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(Error::UnknownOpen {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        if let Some(reason) = non_regular_kind(&metadata) {
            return Err(Error::UnopenableFile {
                path: path.to_path_buf(),
                reason,
            });
        }

        let file = OpenOptions::new()
            .read(true)
            .write(write)
            .open(path)
            .map_err(|e| Error::UnknownOpen {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            writable: write,
        })
    }

    /// Returns the path this file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether the file was opened with write access.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Reads up to `want` bytes starting at `position`.
    ///
    /// Reading at or past end of file returns a short (possibly empty)
    /// buffer rather than an error.
    pub fn read_at(&mut self, position: Absolute, want: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; want];
        let read = self.read_into(position.get(), &mut bytes)?;
        bytes.truncate(read);
        Ok(bytes)
    }

    /// Writes `data` starting at `position`.
    pub fn write_at(&mut self, position: Absolute, data: &[u8]) -> Result<()> {
        self.write_all_at(position.get(), data)
    }

    /// Returns the current file size in bytes, reflecting any resize.
    pub fn size(&self) -> Result<u64> {
        Ok(self.file.metadata().map_err(Error::Io)?.len())
    }

    /// Sets the file length to exactly `size`, truncating or zero-extending.
    pub fn resize(&mut self, size: u64) -> Result<()> {
        self.file.set_len(size).map_err(Error::Io)
    }

    /// Grows the file by `count` bytes at `position`, zero-filling the hole.
    ///
    /// Every byte at or after `position` is shifted forward by `count`, in
    /// chunks of `chunk_size`, and the vacated range is filled with `0x00`.
    /// `count == 0` is a no-op and `position == size()` is a pure append.
    pub fn insert_bytes(&mut self, position: Absolute, count: u64, chunk_size: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        self.shift_right(position.get(), count, chunk_size)?;
        self.fill_zero(position.get(), count, chunk_size)
    }

    /// Grows the file by `data.len()` bytes at `position`, writing `data`
    /// into the hole instead of zeroes.
    pub fn insert_bytes_with(
        &mut self,
        position: Absolute,
        data: &[u8],
        chunk_size: usize,
    ) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.shift_right(position.get(), data.len() as u64, chunk_size)?;
        self.write_all_at(position.get(), data)
    }

    /// Removes `count` bytes at `position` by shifting the suffix left.
    ///
    /// The file is *not* truncated; the caller is expected to
    /// [`resize`](RawFile::resize) to `size() - count` afterwards.
    pub fn delete_bytes(&mut self, position: Absolute, count: u64, chunk_size: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let old_size = self.size()?;
        let mut buf = vec![0u8; chunk_size];
        let mut src = position.get() + count;
        while src < old_size {
            let amount = (old_size - src).min(chunk_size as u64) as usize;
            let read = self.read_into(src, &mut buf[..amount])?;
            if read != amount {
                log::warn!(
                    "deletion shift read {} bytes at {}, expected {}",
                    read,
                    src,
                    amount
                );
            }
            self.write_all_at(src - count, &buf[..read])?;
            src += amount as u64;
        }
        Ok(())
    }

    /// Shifts every byte at or after `position` forward by `count`.
    ///
    /// Chunks are walked from the end of the file backwards so each slice
    /// lands before the slices that would overwrite it. The first slice is
    /// the tail remainder of the shifted region, leaving every later slice
    /// a full chunk that ends exactly where the previous one began; the
    /// final slice therefore starts exactly at `position`.
    fn shift_right(&mut self, position: u64, count: u64, chunk_size: usize) -> Result<()> {
        let old_size = self.size()?;
        let shift_bytes = old_size.saturating_sub(position);
        if shift_bytes == 0 {
            return Ok(());
        }

        let chunk = chunk_size as u64;
        let iterations = shift_bytes.div_ceil(chunk);
        let first = match shift_bytes % chunk {
            0 => chunk,
            rem => rem,
        };

        let mut buf = vec![0u8; chunk_size];
        for i in 0..iterations {
            let amount = if i == 0 { first } else { chunk };
            let start = old_size - first - i * chunk;
            let read = self.read_into(start, &mut buf[..amount as usize])?;
            if read as u64 != amount {
                log::warn!(
                    "insertion shift read {} bytes at {}, expected {}",
                    read,
                    start,
                    amount
                );
            }
            self.write_all_at(start + count, &buf[..read])?;
        }
        Ok(())
    }

    /// Writes `count` zero bytes at `position` in `chunk_size` pieces.
    fn fill_zero(&mut self, position: u64, count: u64, chunk_size: usize) -> Result<()> {
        let zeroes = vec![0u8; chunk_size];
        let end = position + count;
        let mut at = position;
        while at < end {
            let amount = (end - at).min(chunk_size as u64) as usize;
            self.write_all_at(at, &zeroes[..amount])?;
            at += amount as u64;
        }
        Ok(())
    }

    /// Reads into `buf` starting at `offset` until full or end of file.
    fn read_into(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|e| Error::Read {
                position: Absolute::new(offset),
                source: e,
            })?;

        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(Error::Read {
                        position: Absolute::new(offset),
                        source: e,
                    });
                }
            }
        }
        Ok(filled)
    }

    fn write_all_at(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.file.seek(SeekFrom::Start(offset)).map_err(Error::Io)?;
        self.file.write_all(data).map_err(Error::Io)
    }
}

/// Returns why a file cannot be edited, or `None` for regular files.
fn non_regular_kind(metadata: &std::fs::Metadata) -> Option<&'static str> {
    let file_type = metadata.file_type();
    if file_type.is_dir() {
        return Some("directory");
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if file_type.is_char_device() {
            return Some("character device");
        }
        if file_type.is_fifo() {
            return Some("fifo");
        }
        if file_type.is_socket() {
            return Some("socket");
        }
    }

    None
}
