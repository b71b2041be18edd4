//! Infrastructure layer for filesystem and environment interactions.

pub mod paths;

pub use paths::{data_dir, expand_tilde, DATA_DIR_ENV};

use std::path::PathBuf;

/// Resolves a user-supplied path, expanding `~` first.
///
/// Relative paths are taken relative to `base` when one is given, otherwise
/// to the working directory.
#[must_use]
pub fn resolve_path(path: &str, base: Option<&str>) -> PathBuf {
    let expanded = PathBuf::from(expand_tilde(path));
    match base {
        Some(base) if expanded.is_relative() => PathBuf::from(expand_tilde(base)).join(expanded),
        _ => expanded,
    }
}
