//! File walker — discovers the set of files a scan will analyze.
//!
//! A single path argument is either a file (analyzed directly) or a
//! directory (walked recursively). Hidden components (any path segment
//! starting with `.`, other than `.`/`..` themselves) are skipped, and
//! paths matching the configured exclude globs never reach the scheduler.
//! Traversal order is deterministic so two scans of the same tree produce
//! findings in the same order.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path does not exist: {0}")]
    NotFound(PathBuf),
    #[error("failed to read directory entry: {0}")]
    Io(#[from] std::io::Error),
}

/// Discover the files to analyze under `root`, honoring `config`'s exclude
/// patterns. Returns paths in a stable, deterministic order.
pub fn discover(root: &Path, config: &Config) -> Result<Vec<PathBuf>, WalkError> {
    if !root.exists() {
        return Err(WalkError::NotFound(root.to_path_buf()));
    }

    if root.is_file() {
        return Ok(if is_excluded(root, config) {
            Vec::new()
        } else {
            vec![root.to_path_buf()]
        });
    }

    let mut files = Vec::new();
    let mut walker = WalkBuilder::new(root);
    walker
        .hidden(true)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    for entry in walker.build() {
        let entry = entry.map_err(|err| {
            WalkError::Io(std::io::Error::other(err.to_string()))
        })?;
        let path = entry.path();
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if is_excluded(path, config) {
            continue;
        }
        if !is_python_source(path) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn is_excluded(path: &Path, config: &Config) -> bool {
    config.is_path_excluded(&path.to_string_lossy())
}

fn is_python_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "py")
}
