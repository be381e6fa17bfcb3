#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn scratch_dir() -> TempDir {
    init_logger();
    tempfile::tempdir().unwrap()
}

/// Writes `bytes` to `name` inside `dir` and returns the file's path.
pub fn scratch_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// A byte pattern that differs at every position of a page.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
