//! # spanedit
//!
//! A pure-Rust library for editing binary files of arbitrary size without
//! loading them into memory.
//!
//! This crate exposes a random-access byte view of a file overlaid with an
//! in-memory, undoable edit history, and can materialize the edited result
//! back to disk, in place or to a new path. Reads go through a small cache
//! of fixed-size blocks, so a multi-gigabyte file costs no more to open and
//! edit than a tiny one.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spanedit::{Editor, Natural, Result};
//!
//! fn main() -> Result<()> {
//!     let mut editor = Editor::open("firmware.bin")?;
//!
//!     // Overwrite, grow, and shrink; everything is staged in memory.
//!     editor.edit(Natural::new(0x10), 0xFF)?;
//!     editor.insert(Natural::new(0x20), 4)?;
//!     editor.delete(Natural::new(0x40), 8)?;
//!
//!     // Reads see the staged state immediately.
//!     let header = editor.read_bytes(Natural::new(0), 16)?;
//!     println!("{} bytes staged over {:?}", editor.pending_actions(), header);
//!
//!     // Undo is free until a save materializes the history.
//!     editor.undo();
//!
//!     let status = editor.save()?;
//!     assert!(status.is_success());
//!     Ok(())
//! }
//! ```
//!
//! ## Windowed Editing
//!
//! A file can be opened constrained to a half-open absolute range, which
//! both limits what is visible and which operations are legal:
//!
//! ```rust,no_run
//! use spanedit::{Absolute, Editor, EditorOptions, FileMode, Natural};
//!
//! // Edit bytes [0x100, 0x200) only; insertion and deletion are refused
//! // because they would shift bytes across the window's end.
//! let options = EditorOptions::new().mode(FileMode::Partial {
//!     start: Some(Absolute::new(0x100)),
//!     end: Some(Absolute::new(0x200)),
//! });
//! let mut editor = Editor::open_with("disk.img", options)?;
//! editor.edit(Natural::new(0), 0xAA)?; // writes at absolute 0x100 on save
//! # Ok::<(), spanedit::Error>(())
//! ```
//!
//! ## How Reads Work
//!
//! Every submitted mutation is kept as an [`Action`] in an ordered log.
//! A read replays the applied actions newest-first: an action either
//! answers the read outright (the position hits an overwrite or an inserted
//! hole) or translates the position into the coordinate space before that
//! action ran. A position that survives the whole replay is exactly where
//! the original byte still lives on disk, and is fetched through the block
//! cache. The file itself is never modified until a save.
//!
//! ## Saving
//!
//! A whole-file save copies the source to a `<name>.<hex32>.tmp` sibling,
//! replays the history against the copy with chunked byte-shift primitives,
//! and atomically renames the copy over the destination. The source is
//! never left half-written: any failure before the rename leaves it
//! untouched. Spot-mode files are instead saved in place, which is why
//! that mode forbids insertion and deletion.
//!
//! Expected save failures (bad filename, missing directory) are reported
//! as [`SaveStatus`] codes; I/O failures surface as [`Error`].

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

/// Default size of each cached block in bytes.
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Default number of blocks the cache may hold.
pub const DEFAULT_MAX_BLOCK_COUNT: usize = 8;

/// Chunk size used by the byte-shift primitives during a save.
pub const SHIFT_CHUNK_SIZE: usize = 120;

/// How many random temp filenames a save tries before giving up.
pub const TEMP_NAME_RETRIES: usize = 10;

pub mod action;
pub mod editor;
pub mod error;
pub mod history;
pub mod mode;
pub mod options;
pub mod pos;
pub mod raw;
pub mod save;
pub mod window;

mod cache;

pub use action::{Action, Resolved, FILL_BYTE};
pub use editor::Editor;
pub use error::{Error, Result};
pub use history::{ActionLog, RedoStatus, UndoStatus};
pub use mode::{FileMode, SaveStrategy};
pub use options::EditorOptions;
pub use pos::{Absolute, Natural};
pub use raw::RawFile;
pub use save::SaveStatus;
pub use window::FileWindow;
