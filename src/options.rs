//! Configuration for opening an editor.

use crate::mode::FileMode;
use crate::{DEFAULT_BLOCK_SIZE, DEFAULT_MAX_BLOCK_COUNT};

/// Options controlling cache geometry, file mode, and write access.
///
/// # Example
///
/// ```rust,no_run
/// use spanedit::{Editor, EditorOptions, FileMode};
///
/// let options = EditorOptions::new()
///     .block_size(4096)
///     .max_block_count(16)
///     .mode(FileMode::Whole);
/// let editor = Editor::open_with("firmware.bin", options)?;
/// # Ok::<(), spanedit::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct EditorOptions {
    pub(crate) block_size: usize,
    pub(crate) max_block_count: usize,
    pub(crate) mode: FileMode,
    pub(crate) write: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            max_block_count: DEFAULT_MAX_BLOCK_COUNT,
            mode: FileMode::Whole,
            write: true,
        }
    }
}

impl EditorOptions {
    /// Creates options with the defaults: whole-file mode, write access,
    /// 1 KiB blocks, 8 cached blocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the size of each cached block in bytes. Values below 1 are
    /// clamped to 1.
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    /// Sets how many blocks the cache may hold. Values below 1 are clamped
    /// to 1.
    pub fn max_block_count(mut self, max_block_count: usize) -> Self {
        self.max_block_count = max_block_count.max(1);
        self
    }

    /// Sets the file mode, including any window bounds it carries.
    pub fn mode(mut self, mode: FileMode) -> Self {
        self.mode = mode;
        self
    }

    /// Opens the file read-only. Mutations can still be staged in the
    /// history, but saving requires write access.
    pub fn read_only(mut self) -> Self {
        self.write = false;
        self
    }

    /// Sets whether the file is opened with write access.
    pub fn write(mut self, write: bool) -> Self {
        self.write = write;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EditorOptions::default();
        assert_eq!(options.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(options.max_block_count, DEFAULT_MAX_BLOCK_COUNT);
        assert_eq!(options.mode, FileMode::Whole);
        assert!(options.write);
    }

    #[test]
    fn test_builder_chain() {
        let options = EditorOptions::new()
            .block_size(64)
            .max_block_count(2)
            .read_only();
        assert_eq!(options.block_size, 64);
        assert_eq!(options.max_block_count, 2);
        assert!(!options.write);
    }

    #[test]
    fn test_zero_values_clamped() {
        let options = EditorOptions::new().block_size(0).max_block_count(0);
        assert_eq!(options.block_size, 1);
        assert_eq!(options.max_block_count, 1);
    }
}
