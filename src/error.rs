//! Error types for file editing operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when opening, reading, and mutating files, along with a
//! convenient [`Result<T>`] type alias.
//!
//! Save operations report their *expected* failure modes (bad filename,
//! missing destination directory, exhausted temp names) through
//! [`SaveStatus`](crate::save::SaveStatus) result codes instead; only
//! genuine I/O failures surface as errors there.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`:
//!
//! ```rust,no_run
//! use spanedit::{Editor, Natural, Result};
//!
//! fn first_byte(path: &str) -> Result<Option<u8>> {
//!     let mut editor = Editor::open(path)?;
//!     editor.read_byte(Natural::new(0))
//! }
//! ```
//!
//! For fine-grained handling, match on specific variants:
//!
//! ```rust,no_run
//! use spanedit::{Editor, Error};
//!
//! match Editor::open("data.bin") {
//!     Ok(editor) => { /* ... */ }
//!     Err(Error::FileDoesNotExist { path }) => {
//!         eprintln!("no such file: {}", path.display());
//!     }
//!     Err(Error::UnopenableFile { path, reason }) => {
//!         eprintln!("cannot edit {}: {}", path.display(), reason);
//!     }
//!     Err(e) => eprintln!("open failed: {}", e),
//! }
//! ```

use std::io;
use std::path::PathBuf;

use crate::pos::{Absolute, Natural};

/// The main error type for file editing operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred during a file operation.
    ///
    /// This wraps [`std::io::Error`] for failures that carry no more
    /// specific context: disk full, interrupted syscalls, and the like.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file to be opened does not exist.
    #[error("file does not exist: {}", path.display())]
    FileDoesNotExist {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The path names something that cannot be edited.
    ///
    /// Directories, FIFOs, sockets, and character devices are rejected at
    /// open time: they have no byte-addressable content to edit in place.
    #[error("file can not be opened ({}): {reason}", path.display())]
    UnopenableFile {
        /// The rejected path.
        path: PathBuf,
        /// What kind of non-editable file was found.
        reason: &'static str,
    },

    /// The file could not be opened for a reason other than the above.
    #[error("failed to open file {}", path.display())]
    UnknownOpen {
        /// The path that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A natural position translated to a point outside the visible window.
    ///
    /// Raised by any mutation, and by window translation, whose position
    /// falls at or past the window's end bound.
    #[error("natural position {position} is outside of the visible range")]
    PositionOutOfRange {
        /// The offending natural position.
        position: Natural,
    },

    /// A read failed for a reason other than reaching end of file.
    ///
    /// Hitting EOF is never an error; it yields a short read or an absent
    /// byte instead.
    #[error("failed to read file data at {position}")]
    Read {
        /// The absolute position the read targeted.
        position: Absolute,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A window with equal start and end bounds was requested.
    ///
    /// A zero-length window admits no natural positions at all, which makes
    /// it a programming error at construction time rather than something to
    /// discover on the first read.
    #[error("window start and end are equal, which admits no positions")]
    EmptyWindow,

    /// An operation was invoked in a file mode that forbids it.
    #[error("{operation} is unsupported in {mode} mode")]
    UnsupportedInMode {
        /// The operation that was attempted.
        operation: &'static str,
        /// The name of the active mode.
        mode: &'static str,
    },
}

impl Error {
    /// Returns `true` if this error was produced while opening a file.
    pub fn is_open_error(&self) -> bool {
        matches!(
            self,
            Error::FileDoesNotExist { .. }
                | Error::UnopenableFile { .. }
                | Error::UnknownOpen { .. }
        )
    }

    /// Returns `true` if this error is a position range violation.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::PositionOutOfRange { .. })
    }

    /// Returns `true` if this error is a mode capability violation.
    pub fn is_mode_error(&self) -> bool {
        matches!(self, Error::UnsupportedInMode { .. })
    }

    /// Returns the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Error::FileDoesNotExist { path } => Some(path),
            Error::UnopenableFile { path, .. } => Some(path),
            Error::UnknownOpen { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// A specialized Result type for editing operations.
pub type Result<T> = std::result::Result<T, Error>;
