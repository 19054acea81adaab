//! The editor: a logical byte view over a file plus its edit history.
//!
//! An [`Editor`] combines the windowed file, the block cache, and the
//! action history into a byte-addressable view of the file *as edited*.
//! Mutations are queued in the history and only reach the disk when
//! [`save`](Editor::save) or [`save_as`](Editor::save_as) runs, so files
//! far larger than memory stay cheap to edit.
//!
//! # Example
//!
//! ```rust,no_run
//! use spanedit::{Editor, Natural};
//!
//! let mut editor = Editor::open("image.bin")?;
//!
//! // Stage some edits; nothing touches the disk yet.
//! editor.edit(Natural::new(0), 0xFF)?;
//! editor.insert(Natural::new(4), 16)?;
//!
//! // Reads observe the staged state.
//! assert_eq!(editor.read_byte(Natural::new(0))?, Some(0xFF));
//!
//! // Mistake? Take it back.
//! editor.undo();
//!
//! // Materialize the result.
//! let status = editor.save()?;
//! assert!(status.is_success());
//! # Ok::<(), spanedit::Error>(())
//! ```

use std::path::Path;

use crate::action::{Action, FILL_BYTE};
use crate::cache::BlockCache;
use crate::error::{Error, Result};
use crate::history::{ActionLog, RedoStatus, UndoStatus};
use crate::mode::{FileMode, SaveStrategy};
use crate::options::EditorOptions;
use crate::pos::Natural;
use crate::save::{self, SaveStatus};
use crate::window::FileWindow;
use crate::SHIFT_CHUNK_SIZE;

/// An undoable, byte-addressable editing view over a file on disk.
#[derive(Debug)]
pub struct Editor {
    file: FileWindow,
    history: ActionLog,
    cache: BlockCache,
    mode: FileMode,
    cached_size: Option<u64>,
}

impl Editor {
    /// Opens `path` for whole-file editing with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, EditorOptions::default())
    }

    /// Opens `path` with explicit cache geometry, mode, and write access.
    pub fn open_with(path: impl AsRef<Path>, options: EditorOptions) -> Result<Self> {
        let mode = options.mode;
        let file = FileWindow::open(path, mode.start(), mode.end(), options.write)?;
        Ok(Self {
            file,
            history: ActionLog::new(),
            cache: BlockCache::new(options.block_size, options.max_block_count),
            mode,
            cached_size: None,
        })
    }

    /// The mode this editor was opened in.
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// The path of the underlying file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Whether the underlying file can be written.
    ///
    /// When this is `false`, mutations can still be staged and read back;
    /// only saving is unavailable.
    pub fn is_writable(&self) -> bool {
        self.file.is_writable()
    }

    /// Number of actions currently in the history.
    pub fn pending_actions(&self) -> usize {
        self.history.len()
    }

    /// Whether any actions are staged.
    pub fn has_pending_actions(&self) -> bool {
        !self.history.is_empty()
    }

    /// Reads the logical byte at `position`, or `None` past the logical
    /// end.
    pub fn read_byte(&mut self, position: Natural) -> Result<Option<u8>> {
        match self.history.resolve(position) {
            crate::action::Resolved::Byte(byte) => Ok(Some(byte)),
            crate::action::Resolved::Position(translated) => self.read_raw(translated),
        }
    }

    /// Reads up to `amount` logical bytes starting at `position`.
    ///
    /// Stops early at the logical end of file, returning a short result.
    pub fn read_bytes(&mut self, position: Natural, amount: usize) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(amount);
        for i in 0..amount {
            match self.read_byte(position + i as u64)? {
                Some(byte) => data.push(byte),
                None => break,
            }
        }
        Ok(data)
    }

    /// Reads an untranslated position through the block cache.
    fn read_raw(&mut self, position: Natural) -> Result<Option<u8>> {
        let rounded = position.round_down(self.cache.block_size() as u64);
        match self.cache.load_if_missing(rounded, &mut self.file)? {
            Some(block) => Ok(block.byte_at(position)),
            None => Ok(None),
        }
    }

    /// Overwrites the byte at `position`.
    pub fn edit(&mut self, position: Natural, value: u8) -> Result<()> {
        self.edit_bytes(position, vec![value])
    }

    /// Overwrites `data.len()` bytes starting at `position`.
    ///
    /// Size-preserving and legal in every mode. Fails with
    /// [`Error::PositionOutOfRange`] if the span crosses the window's end.
    pub fn edit_bytes(&mut self, position: Natural, data: Vec<u8>) -> Result<()> {
        if !data.is_empty() {
            self.file.to_absolute(position)?;
            self.file.to_absolute(position + (data.len() as u64 - 1))?;
        }
        self.history.submit(Action::Edit { position, data });
        Ok(())
    }

    /// Inserts `count` zero bytes at `position`, shifting the suffix right.
    pub fn insert(&mut self, position: Natural, count: u64) -> Result<()> {
        self.require_insertion()?;
        self.file.to_absolute(position)?;
        self.history.submit(Action::Insert { position, count });
        self.cached_size = None;
        Ok(())
    }

    /// Inserts `count` copies of `fill` at `position`.
    pub fn insert_fill(&mut self, position: Natural, count: u64, fill: u8) -> Result<()> {
        // Plain insertion already fills with the insertion value.
        if fill == FILL_BYTE {
            return self.insert(position, count);
        }
        self.require_insertion()?;
        self.file.to_absolute(position)?;
        self.history.submit(Action::Bundle(vec![
            Action::Insert { position, count },
            Action::Edit {
                position,
                data: vec![fill; count as usize],
            },
        ]));
        self.cached_size = None;
        Ok(())
    }

    /// Inserts `count` bytes at `position`, tiling `pattern` cyclically
    /// into the new range.
    pub fn insert_pattern(&mut self, position: Natural, count: u64, pattern: &[u8]) -> Result<()> {
        if pattern.is_empty() {
            return self.insert(position, count);
        }
        self.require_insertion()?;
        self.file.to_absolute(position)?;

        let data: Vec<u8> = (0..count as usize)
            .map(|i| pattern[i % pattern.len()])
            .collect();
        self.history.submit(Action::Bundle(vec![
            Action::Insert { position, count },
            Action::Edit { position, data },
        ]));
        self.cached_size = None;
        Ok(())
    }

    /// Removes `count` bytes starting at `position`, shifting the suffix
    /// left.
    pub fn delete(&mut self, position: Natural, count: u64) -> Result<()> {
        if !self.mode.supports_deletion() {
            return Err(Error::UnsupportedInMode {
                operation: "deletion",
                mode: self.mode.name(),
            });
        }
        self.file.to_absolute(position)?;
        self.history.submit(Action::Delete { position, count });
        self.cached_size = None;
        Ok(())
    }

    /// Unapplies the most recent applied action.
    pub fn undo(&mut self) -> UndoStatus {
        self.history.undo()
    }

    /// Reapplies the next unapplied action.
    pub fn redo(&mut self) -> RedoStatus {
        self.history.redo()
    }

    /// Whether an undo would succeed right now.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo would succeed right now.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The logical file size: the underlying size plus every logged
    /// action's size difference. Always recomputed.
    pub fn size(&mut self) -> Result<u64> {
        let size = self.history.size_delta(self.file.size()?);
        self.cached_size = Some(size);
        Ok(size)
    }

    /// The logical file size, memoized until the next insertion, deletion,
    /// or save.
    pub fn size_cached(&mut self) -> Result<u64> {
        match self.cached_size {
            Some(size) => Ok(size),
            None => self.size(),
        }
    }

    /// Saves the edited file over its own path, using the strategy the
    /// mode prescribes.
    pub fn save(&mut self) -> Result<SaveStatus> {
        if !self.file.is_writable() {
            return Ok(SaveStatus::InsufficientPermissions);
        }
        match self.mode.save_strategy() {
            SaveStrategy::Whole => {
                let destination = self.file.path().to_path_buf();
                self.whole_save(&destination)
            }
            SaveStrategy::PartialOnly => {
                let status = save::save_partial(&mut self.file, &mut self.history, SHIFT_CHUNK_SIZE)?;
                if status.is_success() {
                    self.after_save();
                }
                Ok(status)
            }
        }
    }

    /// Saves the edited file to a new destination.
    ///
    /// Only supported by modes with the whole-file strategy; a spot file
    /// has no meaningful whole-file image to write elsewhere.
    pub fn save_as(&mut self, destination: impl AsRef<Path>) -> Result<SaveStatus> {
        if !self.file.is_writable() {
            return Ok(SaveStatus::InsufficientPermissions);
        }
        match self.mode.save_strategy() {
            SaveStrategy::Whole => self.whole_save(destination.as_ref()),
            SaveStrategy::PartialOnly => Ok(SaveStatus::InvalidMode),
        }
    }

    fn whole_save(&mut self, destination: &Path) -> Result<SaveStatus> {
        let status = save::save_whole(
            &mut self.file,
            &mut self.history,
            SHIFT_CHUNK_SIZE,
            destination,
        )?;
        if status.is_success() {
            self.after_save();
            // An in-place save renamed a rewritten file over the source;
            // the old handle still sees the replaced inode.
            if destination == self.file.path() {
                self.file.reopen()?;
            }
        }
        Ok(status)
    }

    fn after_save(&mut self) {
        self.cache.clear();
        self.cached_size = None;
    }

    fn require_insertion(&self) -> Result<()> {
        if !self.mode.supports_insertion() {
            return Err(Error::UnsupportedInMode {
                operation: "insertion",
                mode: self.mode.name(),
            });
        }
        Ok(())
    }
}
