//! Positional mutation records and the reverse-replay algebra.
//!
//! An [`Action`] records one mutation against the logical file: an
//! overwrite, an insertion, a deletion, or a bundle of those applied as a
//! unit. Action positions are natural positions *as seen at submission
//! time*, i.e. relative to the logical file produced by every earlier
//! action in the log.
//!
//! [`Action::reverse_position`] is the algorithm that defines what the
//! logical file looks like without materializing it: walking the applied
//! actions newest-first, each action either answers the read outright (an
//! overwrite or fill covered the position) or translates the position into
//! the coordinate space that existed before it ran. A position that
//! survives the whole walk is the absolute spot in the underlying file
//! where the original byte still lives.

use crate::error::Result;
use crate::pos::Natural;
use crate::raw::RawFile;

/// The byte written into holes opened by an insertion.
pub const FILL_BYTE: u8 = 0x00;

/// A single recorded mutation of the logical file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Overwrites `data.len()` bytes starting at `position`. Empty data is
    /// a no-op. Preserves the file size.
    Edit {
        /// Natural position of the first overwritten byte.
        position: Natural,
        /// Replacement bytes.
        data: Vec<u8>,
    },
    /// Inserts `count` fill bytes at `position`, shifting the suffix right.
    Insert {
        /// Natural position the hole opens at.
        position: Natural,
        /// Number of bytes inserted.
        count: u64,
    },
    /// Removes `count` bytes starting at `position`, shifting the suffix
    /// left.
    Delete {
        /// Natural position of the first removed byte.
        position: Natural,
        /// Number of bytes removed.
        count: u64,
    },
    /// A group of actions applied in order and replayed in reverse order.
    Bundle(Vec<Action>),
}

/// The outcome of replaying one or more actions over a read position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// An action covered the position and produced the byte directly.
    Byte(u8),
    /// The position, translated into the space before the replayed actions.
    Position(Natural),
}

impl Action {
    /// The change in logical file size this action causes.
    pub fn size_difference(&self) -> i64 {
        match self {
            Action::Edit { .. } => 0,
            Action::Insert { count, .. } => *count as i64,
            Action::Delete { count, .. } => -(*count as i64),
            Action::Bundle(children) => children.iter().map(Action::size_difference).sum(),
        }
    }

    /// Whether this action can be unapplied. A bundle can only be undone
    /// if every child can.
    pub fn can_undo(&self) -> bool {
        match self {
            Action::Bundle(children) => children.iter().all(Action::can_undo),
            _ => true,
        }
    }

    /// Whether this action can be reapplied.
    pub fn can_redo(&self) -> bool {
        match self {
            Action::Bundle(children) => children.iter().all(Action::can_redo),
            _ => true,
        }
    }

    /// Replays this single action in reverse over `position`.
    pub fn reverse_position(&self, position: Natural) -> Resolved {
        reverse_resolve(std::slice::from_ref(self), position)
    }

    /// Materializes this action against a raw file during save.
    ///
    /// `offset` is the window's start offset; action positions are natural
    /// and the rewritten file keeps the bytes outside the window in place.
    pub(crate) fn apply_to(
        &self,
        raw: &mut RawFile,
        offset: u64,
        chunk_size: usize,
    ) -> Result<()> {
        match self {
            Action::Edit { position, data } => {
                raw.write_at(crate::pos::Absolute::new(offset + position.get()), data)
            }
            Action::Insert { position, count } => raw.insert_bytes(
                crate::pos::Absolute::new(offset + position.get()),
                *count,
                chunk_size,
            ),
            Action::Delete { position, count } => raw.delete_bytes(
                crate::pos::Absolute::new(offset + position.get()),
                *count,
                chunk_size,
            ),
            Action::Bundle(children) => {
                for child in children {
                    child.apply_to(raw, offset, chunk_size)?;
                }
                Ok(())
            }
        }
    }
}

/// Replays `actions` in reverse over `position`.
///
/// Nested bundles are walked with an explicit frame stack rather than call
/// recursion, so arbitrarily deep bundles cannot overflow the stack.
pub(crate) fn reverse_resolve(actions: &[Action], mut position: Natural) -> Resolved {
    // Each frame is a slice still to be walked and the index one past the
    // next action to visit (walking backwards).
    let mut frames: Vec<(&[Action], usize)> = vec![(actions, actions.len())];

    'frames: while let Some((slice, mut index)) = frames.pop() {
        while index > 0 {
            index -= 1;
            match &slice[index] {
                Action::Bundle(children) => {
                    frames.push((slice, index));
                    frames.push((children.as_slice(), children.len()));
                    continue 'frames;
                }
                Action::Edit { position: start, data } => {
                    if !data.is_empty()
                        && position >= *start
                        && position.get() < start.get() + data.len() as u64
                    {
                        return Resolved::Byte(data[(position.get() - start.get()) as usize]);
                    }
                }
                Action::Insert { position: start, count } => {
                    if position >= *start && position.get() < start.get() + count {
                        return Resolved::Byte(FILL_BYTE);
                    }
                    if position >= *start {
                        position = position - *count;
                    }
                }
                Action::Delete { position: start, count } => {
                    if position >= *start {
                        position = position + *count;
                    }
                }
            }
        }
    }

    Resolved::Position(position)
}
