//! File modes gating which operations are legal and how saves run.
//!
//! Some mutations cannot be done reasonably in every situation: inserting
//! into the middle of a bounded window would push bytes past its end, and a
//! spot-mapped file must never be rewritten wholesale. Each mode is a small
//! capability tuple answering those questions up front.

use crate::pos::Absolute;

/// How a save materializes the action history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStrategy {
    /// Rewrite the whole file through a temp copy and an atomic rename.
    Whole,
    /// Write edits directly into the source file in place. Only sound when
    /// the mode forbids insertion and deletion.
    PartialOnly,
}

/// The editing mode a file was opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    /// Editing the entire file. Insertion and deletion allowed.
    #[default]
    Whole,
    /// Editing a bounded slice of the file. No insertion or deletion.
    Partial {
        /// Window start, if bounded below.
        start: Option<Absolute>,
        /// Window end, if bounded above.
        end: Option<Absolute>,
    },
    /// Editing from a start position to end of file. Since the right end is
    /// open, insertion and deletion are allowed.
    OpenPartialRight {
        /// Window start, if bounded below.
        start: Option<Absolute>,
    },
    /// Editing a bounded slice that must be saved in place, never by
    /// rewriting the whole file. No insertion or deletion.
    Spot {
        /// Window start, if bounded below.
        start: Option<Absolute>,
        /// Window end, if bounded above.
        end: Option<Absolute>,
    },
}

impl FileMode {
    /// The window's start bound, if this mode has one.
    pub fn start(&self) -> Option<Absolute> {
        match self {
            FileMode::Whole => None,
            FileMode::Partial { start, .. } => *start,
            FileMode::OpenPartialRight { start } => *start,
            FileMode::Spot { start, .. } => *start,
        }
    }

    /// The window's end bound, if this mode has one.
    pub fn end(&self) -> Option<Absolute> {
        match self {
            FileMode::Whole => None,
            FileMode::Partial { end, .. } => *end,
            FileMode::OpenPartialRight { .. } => None,
            FileMode::Spot { end, .. } => *end,
        }
    }

    /// Whether insertion is legal in this mode.
    pub fn supports_insertion(&self) -> bool {
        matches!(self, FileMode::Whole | FileMode::OpenPartialRight { .. })
    }

    /// Whether deletion is legal in this mode.
    pub fn supports_deletion(&self) -> bool {
        matches!(self, FileMode::Whole | FileMode::OpenPartialRight { .. })
    }

    /// How saves materialize the history in this mode.
    pub fn save_strategy(&self) -> SaveStrategy {
        match self {
            FileMode::Spot { .. } => SaveStrategy::PartialOnly,
            _ => SaveStrategy::Whole,
        }
    }

    /// A short name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FileMode::Whole => "whole",
            FileMode::Partial { .. } => "partial",
            FileMode::OpenPartialRight { .. } => "open-partial",
            FileMode::Spot { .. } => "spot",
        }
    }
}
