//! The ordered, undoable log of submitted actions.
//!
//! An [`ActionLog`] holds every submitted [`Action`] plus a cursor: the
//! prefix before the cursor is *applied*, the suffix after it is
//! *unapplied* and available for redo. Submitting a new action discards the
//! unapplied suffix first, exactly like any editor's undo stack.

use crate::action::{reverse_resolve, Action, Resolved};
use crate::error::Result;
use crate::pos::Natural;
use crate::raw::RawFile;

/// Outcome of an undo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoStatus {
    /// The cursor moved back over one action.
    Success,
    /// There is nothing to undo.
    Nothing,
    /// The most recent applied action declares itself un-undoable.
    Unnable,
}

/// Outcome of a redo request (and of submitting a fresh action).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedoStatus {
    /// The cursor moved forward over one action.
    Success,
    /// There is nothing to redo.
    Nothing,
    /// The next unapplied action declares itself un-redoable.
    Unnable,
}

/// An ordered log of actions with an applied/unapplied cursor.
#[derive(Debug, Default)]
pub struct ActionLog {
    actions: Vec<Action>,
    /// Everything before this index is applied, everything after is not.
    cursor: usize,
}

impl ActionLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of actions in the log, applied or not.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the log holds no actions at all.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns `true` if at least one action is applied.
    pub fn has_applied(&self) -> bool {
        self.cursor > 0
    }

    /// Returns `true` if at least one action awaits redo.
    pub fn has_unapplied(&self) -> bool {
        self.cursor < self.actions.len()
    }

    /// Whether an undo would succeed right now.
    pub fn can_undo(&self) -> bool {
        self.has_applied() && self.actions[self.cursor - 1].can_undo()
    }

    /// Whether a redo would succeed right now.
    pub fn can_redo(&self) -> bool {
        self.has_unapplied() && self.actions[self.cursor].can_redo()
    }

    /// Discards the unapplied suffix.
    pub fn clear_unapplied(&mut self) {
        self.actions.truncate(self.cursor);
    }

    /// Appends a freshly submitted action, discarding any redo suffix.
    ///
    /// The action stores everything needed to re-execute it, so appending
    /// and advancing the cursor *is* the application.
    pub fn submit(&mut self, action: Action) -> RedoStatus {
        self.clear_unapplied();
        self.actions.push(action);
        self.cursor += 1;
        RedoStatus::Success
    }

    /// Moves the cursor back over the most recent applied action.
    pub fn undo(&mut self) -> UndoStatus {
        if !self.has_applied() {
            return UndoStatus::Nothing;
        }
        if !self.can_undo() {
            return UndoStatus::Unnable;
        }
        self.cursor -= 1;
        UndoStatus::Success
    }

    /// Moves the cursor forward over the next unapplied action.
    pub fn redo(&mut self) -> RedoStatus {
        if !self.has_unapplied() {
            return RedoStatus::Nothing;
        }
        if !self.can_redo() {
            return RedoStatus::Unnable;
        }
        self.cursor += 1;
        RedoStatus::Success
    }

    /// Replays the applied actions in reverse over a read position.
    ///
    /// Either some action yields the byte directly, or the surviving
    /// position is where the original byte still lives in the underlying
    /// file.
    pub fn resolve(&self, position: Natural) -> Resolved {
        reverse_resolve(&self.actions[..self.cursor], position)
    }

    /// The logical file size given the underlying size, summing the size
    /// difference of every action in the log.
    pub fn size_delta(&self, base_size: u64) -> u64 {
        let delta: i64 = self.actions.iter().map(Action::size_difference).sum();
        let size = base_size as i64 + delta;
        size.max(0) as u64
    }

    /// Materializes every action against `raw` in insertion order, then
    /// clears the log.
    ///
    /// Post-save the recorded positions are meaningless against the new
    /// on-disk file, so the history cannot survive; undo does not reach
    /// back across a save.
    pub(crate) fn save_to(
        &mut self,
        raw: &mut RawFile,
        offset: u64,
        chunk_size: usize,
    ) -> Result<()> {
        for action in &self.actions {
            action.apply_to(raw, offset, chunk_size)?;
        }
        self.actions.clear();
        self.cursor = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(pos: u64, data: &[u8]) -> Action {
        Action::Edit {
            position: Natural::new(pos),
            data: data.to_vec(),
        }
    }

    #[test]
    fn test_cursor_discipline() {
        let mut log = ActionLog::new();
        assert!(!log.has_applied());
        assert!(!log.has_unapplied());

        assert_eq!(log.submit(edit(0, &[1])), RedoStatus::Success);
        assert_eq!(log.submit(edit(1, &[2])), RedoStatus::Success);
        assert_eq!(log.len(), 2);
        assert!(log.has_applied());
        assert!(!log.has_unapplied());

        assert_eq!(log.undo(), UndoStatus::Success);
        assert!(log.has_applied());
        assert!(log.has_unapplied());

        assert_eq!(log.undo(), UndoStatus::Success);
        assert!(!log.has_applied());
        assert_eq!(log.undo(), UndoStatus::Nothing);

        assert_eq!(log.redo(), RedoStatus::Success);
        assert_eq!(log.redo(), RedoStatus::Success);
        assert_eq!(log.redo(), RedoStatus::Nothing);
    }

    #[test]
    fn test_submit_truncates_redo_suffix() {
        let mut log = ActionLog::new();
        log.submit(edit(0, &[1]));
        log.submit(edit(0, &[2]));
        log.undo();

        log.submit(edit(0, &[3]));
        assert_eq!(log.len(), 2);
        assert!(!log.has_unapplied());
        assert_eq!(log.redo(), RedoStatus::Nothing);

        // The surviving history is [1, 3]: the latest applied edit wins.
        assert_eq!(log.resolve(Natural::new(0)), Resolved::Byte(3));
        log.undo();
        assert_eq!(log.resolve(Natural::new(0)), Resolved::Byte(1));
    }

    #[test]
    fn test_resolve_ignores_unapplied_actions() {
        let mut log = ActionLog::new();
        log.submit(edit(0, &[0xAA]));
        log.submit(edit(0, &[0xBB]));

        assert_eq!(log.resolve(Natural::new(0)), Resolved::Byte(0xBB));
        log.undo();
        assert_eq!(log.resolve(Natural::new(0)), Resolved::Byte(0xAA));
        log.undo();
        assert_eq!(
            log.resolve(Natural::new(0)),
            Resolved::Position(Natural::new(0))
        );
        log.redo();
        assert_eq!(log.resolve(Natural::new(0)), Resolved::Byte(0xAA));
    }

    #[test]
    fn test_size_delta() {
        let mut log = ActionLog::new();
        assert_eq!(log.size_delta(100), 100);

        log.submit(Action::Insert {
            position: Natural::new(0),
            count: 10,
        });
        log.submit(Action::Delete {
            position: Natural::new(5),
            count: 3,
        });
        log.submit(edit(0, &[1, 2, 3]));
        assert_eq!(log.size_delta(100), 107);
    }

    #[test]
    fn test_size_delta_saturates_at_zero() {
        let mut log = ActionLog::new();
        log.submit(Action::Delete {
            position: Natural::new(0),
            count: 50,
        });
        assert_eq!(log.size_delta(10), 0);
    }

    #[test]
    fn test_clear_unapplied() {
        let mut log = ActionLog::new();
        log.submit(edit(0, &[1]));
        log.submit(edit(1, &[2]));
        log.undo();
        log.clear_unapplied();
        assert_eq!(log.len(), 1);
        assert_eq!(log.redo(), RedoStatus::Nothing);
    }
}
