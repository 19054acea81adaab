//! The save pipeline: materializing an action history to disk.
//!
//! A whole-file save never touches the source until the very last step. The
//! source is copied to a `<destination>.<hex32>.tmp` sibling, the copy is
//! grown to the larger of the old and new sizes, every action is replayed
//! against it through the raw shift primitives, the copy is cut to its
//! final size, and a rename over the destination commits the result
//! atomically. Any failure after the temp file exists removes it again.
//!
//! A partial save (spot mode) skips all of that and writes the actions
//! straight into the source file; the mode guarantees they are pure edits,
//! so no bytes move and no rewrite is needed.
//!
//! Expected failure modes are reported as [`SaveStatus`] codes rather than
//! errors: a bad filename or a missing destination directory is a normal
//! outcome for a save dialog to relay, not an exceptional condition.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::history::ActionLog;
use crate::raw::RawFile;
use crate::window::FileWindow;
use crate::TEMP_NAME_RETRIES;

/// Result code of a save operation.
#[must_use = "save status should be checked; most variants mean nothing was written"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// The destination now holds the edited file and the history is clear.
    Success,
    /// The destination filename was ill-formed (empty, `.`, or `..`).
    InvalidFilename,
    /// The destination's parent directory does not exist.
    InvalidDestination,
    /// The filesystem denied writing the destination or temp file.
    InsufficientPermissions,
    /// No unused temp filename was found within the retry limit. May be a
    /// sign of a bug.
    TempFileIterationLimit,
    /// The active mode supports no save strategy for this request.
    InvalidMode,
}

impl SaveStatus {
    /// Returns `true` for [`SaveStatus::Success`].
    pub fn is_success(self) -> bool {
        self == SaveStatus::Success
    }
}

/// Rewrites the file at `destination` with every logged action applied.
pub(crate) fn save_whole(
    window: &mut FileWindow,
    history: &mut ActionLog,
    chunk_size: usize,
    destination: &Path,
) -> Result<SaveStatus> {
    let destination = normalize_lexically(destination);
    if !has_valid_filename(&destination) {
        return Ok(SaveStatus::InvalidFilename);
    }

    // A bare filename is resolved against the source file's directory.
    let destination = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => destination,
        _ => match window.path().parent() {
            Some(source_parent) => source_parent.join(&destination),
            None => destination,
        },
    };

    let parent = destination.parent().unwrap_or(Path::new(""));
    if !parent.exists() {
        return Ok(SaveStatus::InvalidDestination);
    }

    let old_size = window.size()?;
    let new_size = history.size_delta(old_size);

    let temp_path = match generate_temp_path(&destination) {
        Some(path) => path,
        None => return Ok(SaveStatus::TempFileIterationLimit),
    };
    log::debug!(
        "saving {} -> {} via {} ({} -> {} bytes)",
        window.path().display(),
        destination.display(),
        temp_path.display(),
        old_size,
        new_size
    );

    if let Err(e) = std::fs::copy(window.path(), &temp_path) {
        return if e.kind() == std::io::ErrorKind::PermissionDenied {
            Ok(SaveStatus::InsufficientPermissions)
        } else {
            Err(Error::Io(e))
        };
    }

    if let Err(e) = replay_into_temp(
        &temp_path,
        history,
        window.start_offset(),
        chunk_size,
        old_size,
        new_size,
    ) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }

    if let Err(e) = std::fs::rename(&temp_path, &destination) {
        let _ = std::fs::remove_file(&temp_path);
        return if e.kind() == std::io::ErrorKind::PermissionDenied {
            Ok(SaveStatus::InsufficientPermissions)
        } else {
            Err(Error::Io(e))
        };
    }

    Ok(SaveStatus::Success)
}

/// Writes every logged action directly into the source file.
pub(crate) fn save_partial(
    window: &mut FileWindow,
    history: &mut ActionLog,
    chunk_size: usize,
) -> Result<SaveStatus> {
    let offset = window.start_offset();
    history.save_to(window.raw_mut(), offset, chunk_size)?;
    Ok(SaveStatus::Success)
}

/// Grows the temp copy, replays the history into it, and cuts it to its
/// final size. The handle is closed on return so the rename can proceed.
fn replay_into_temp(
    temp_path: &Path,
    history: &mut ActionLog,
    offset: u64,
    chunk_size: usize,
    old_size: u64,
    new_size: u64,
) -> Result<()> {
    let mut temp = RawFile::open(temp_path, true)?;
    temp.resize(old_size.max(new_size))?;
    history.save_to(&mut temp, offset, chunk_size)?;
    temp.resize(new_size)?;
    Ok(())
}

/// Resolves `.` and `..` components without consulting the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Whether the path ends in a usable filename: nonempty and neither `.`
/// nor `..`.
fn has_valid_filename(path: &Path) -> bool {
    path.file_name().is_some()
}

/// Picks an unused `<destination>.<hex32>.tmp` sibling, retrying with fresh
/// random values a bounded number of times.
fn generate_temp_path(destination: &Path) -> Option<PathBuf> {
    let parent = destination.parent().unwrap_or(Path::new(""));
    let file_name = destination.file_name()?;

    for _ in 0..TEMP_NAME_RETRIES {
        let mut name = file_name.to_os_string();
        name.push(format!(".{:x}.tmp", rand::random::<u32>()));
        let candidate = parent.join(&name);
        if !candidate.exists() {
            return Some(candidate);
        }
    }
    None
}
