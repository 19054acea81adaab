//! Shared helpers for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test
//! file compiles as a separate crate and may only use a subset of these
//! helpers.

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

/// Writes `bytes` to a fresh file inside `dir` and returns its path.
pub fn fixture_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("failed to write fixture file");
    path
}

/// Reads a file fully back into memory.
pub fn file_contents(path: &std::path::Path) -> Vec<u8> {
    std::fs::read(path).expect("failed to read file")
}

/// A 300-byte pattern where `bytes[i] == i % 256`, used by the shift
/// boundary scenarios.
pub fn counting_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}
