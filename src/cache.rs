use crate::error::Result;
use crate::pos::Natural;
use crate::window::FileWindow;

/// A cached span of up to `block_size` bytes aligned on a rounded position.
#[derive(Debug)]
pub(crate) struct Block {
    start: Natural,
    bytes: Vec<u8>,
}

impl Block {
    /// Returns the byte at `position`, or `None` if the block is a short
    /// tail block that does not reach that far.
    pub(crate) fn byte_at(&self, position: Natural) -> Option<u8> {
        debug_assert!(self.start <= position);
        let offset = (position.get() - self.start.get()) as usize;
        self.bytes.get(offset).copied()
    }
}

#[derive(Debug)]
struct Entry {
    block: Block,
    last_used: u64,
}

/// A bounded cache of file blocks, evicting the least recently used.
///
/// Blocks are keyed by their rounded start position; at most one block per
/// start is ever live. Cached bytes are read-only: writes bypass the cache
/// entirely and reach the file during save.
#[derive(Debug)]
pub(crate) struct BlockCache {
    entries: Vec<Entry>,
    block_size: usize,
    capacity: usize,
    tick: u64,
}

impl BlockCache {
    pub(crate) fn new(block_size: usize, capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            block_size,
            capacity: capacity.max(1),
            tick: 0,
        }
    }

    pub(crate) fn block_size(&self) -> usize {
        self.block_size
    }

    /// Looks up the block with the given rounded start, if cached.
    pub(crate) fn lookup(&mut self, start: Natural) -> Option<&Block> {
        let index = self.find(start)?;
        self.touch(index);
        Some(&self.entries[index].block)
    }

    /// Returns the block covering `start`, loading it from `source` if it
    /// is not cached yet.
    ///
    /// If the source yields no bytes at all (the position is past end of
    /// file or window), no block is created and `None` is returned. A full
    /// cache evicts its least recently used block before admitting the new
    /// one.
    pub(crate) fn load_if_missing(
        &mut self,
        start: Natural,
        source: &mut FileWindow,
    ) -> Result<Option<&Block>> {
        if self.find(start).is_some() {
            return Ok(self.lookup(start));
        }

        let bytes = source.read(start, self.block_size)?;
        if bytes.is_empty() {
            return Ok(None);
        }

        if self.entries.len() >= self.capacity {
            self.evict_lru();
        }

        self.tick += 1;
        self.entries.push(Entry {
            block: Block { start, bytes },
            last_used: self.tick,
        });
        Ok(self.entries.last().map(|e| &e.block))
    }

    /// Drops every cached block.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    fn find(&self, start: Natural) -> Option<usize> {
        self.entries.iter().position(|e| e.block.start == start)
    }

    fn touch(&mut self, index: usize) {
        self.tick += 1;
        self.entries[index].last_used = self.tick;
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| e.last_used)
            .map(|(i, _)| i);
        if let Some(index) = oldest {
            self.entries.swap_remove(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::Absolute;
    use tempfile::TempDir;

    fn window_over(dir: &TempDir, bytes: &[u8]) -> FileWindow {
        let path = dir.path().join("data.bin");
        std::fs::write(&path, bytes).unwrap();
        FileWindow::open(&path, None, None, false).unwrap()
    }

    #[test]
    fn test_load_and_lookup() {
        let dir = TempDir::new().unwrap();
        let mut source = window_over(&dir, &[10, 11, 12, 13, 14]);
        let mut cache = BlockCache::new(4, 2);

        let block = cache
            .load_if_missing(Natural::new(0), &mut source)
            .unwrap()
            .unwrap();
        assert_eq!(block.byte_at(Natural::new(2)), Some(12));
        assert_eq!(block.bytes.len(), 4);

        assert!(cache.lookup(Natural::new(0)).is_some());
        assert!(cache.lookup(Natural::new(4)).is_none());
    }

    #[test]
    fn test_tail_block_is_short() {
        let dir = TempDir::new().unwrap();
        let mut source = window_over(&dir, &[10, 11, 12, 13, 14]);
        let mut cache = BlockCache::new(4, 2);

        let block = cache
            .load_if_missing(Natural::new(4), &mut source)
            .unwrap()
            .unwrap();
        assert_eq!(block.bytes.len(), 1);
        assert_eq!(block.byte_at(Natural::new(4)), Some(14));
        assert_eq!(block.byte_at(Natural::new(5)), None);
    }

    #[test]
    fn test_past_eof_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let mut source = window_over(&dir, &[1, 2]);
        let mut cache = BlockCache::new(4, 2);

        assert!(cache
            .load_if_missing(Natural::new(4), &mut source)
            .unwrap()
            .is_none());
        assert_eq!(cache.entries.len(), 0);
    }

    #[test]
    fn test_no_duplicate_starts() {
        let dir = TempDir::new().unwrap();
        let mut source = window_over(&dir, &[1, 2, 3, 4, 5, 6, 7, 8]);
        let mut cache = BlockCache::new(4, 2);

        cache.load_if_missing(Natural::new(0), &mut source).unwrap();
        cache.load_if_missing(Natural::new(0), &mut source).unwrap();
        assert_eq!(cache.entries.len(), 1);
    }

    #[test]
    fn test_capacity_and_lru_eviction() {
        let dir = TempDir::new().unwrap();
        let bytes: Vec<u8> = (0..32).collect();
        let mut source = window_over(&dir, &bytes);
        let mut cache = BlockCache::new(4, 2);

        cache.load_if_missing(Natural::new(0), &mut source).unwrap();
        cache.load_if_missing(Natural::new(4), &mut source).unwrap();
        // Touch block 0 so block 4 becomes the eviction candidate.
        cache.lookup(Natural::new(0)).unwrap();
        cache.load_if_missing(Natural::new(8), &mut source).unwrap();

        assert_eq!(cache.entries.len(), 2);
        assert!(cache.lookup(Natural::new(0)).is_some());
        assert!(cache.lookup(Natural::new(4)).is_none());
        assert!(cache.lookup(Natural::new(8)).is_some());
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let mut source = window_over(&dir, &[1, 2, 3]);
        let mut cache = BlockCache::new(2, 4);

        cache.load_if_missing(Natural::new(0), &mut source).unwrap();
        cache.clear();
        assert_eq!(cache.entries.len(), 0);
    }

    #[test]
    fn test_windowed_source_clips_blocks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"0123456789").unwrap();
        let mut source = FileWindow::open(
            &path,
            Some(Absolute::new(2)),
            Some(Absolute::new(5)),
            false,
        )
        .unwrap();
        let mut cache = BlockCache::new(8, 2);

        let block = cache
            .load_if_missing(Natural::new(0), &mut source)
            .unwrap()
            .unwrap();
        assert_eq!(block.bytes.len(), 3);
        assert_eq!(block.byte_at(Natural::new(0)), Some(b'2'));
    }
}
