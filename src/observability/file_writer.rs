//! Append-only trace file with size-based rotation.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// When to rotate and how many rotated files to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_bytes: u64,
    pub backups: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            backups: 3,
        }
    }
}

/// Line-oriented writer that rotates its file once it grows past the policy
/// limit.
///
/// Rotated files are renamed `<stem>.json.<n>` where `n` increases
/// monotonically within a process; only the newest `backups` are kept.
/// The handle is opened lazily so construction never touches the disk.
pub struct RotatingFile {
    path: PathBuf,
    policy: RotationPolicy,
    state: Mutex<WriterState>,
}

#[derive(Default)]
struct WriterState {
    file: Option<File>,
    rotations: u64,
}

impl RotatingFile {
    pub fn new(path: PathBuf, policy: RotationPolicy) -> Self {
        Self {
            path,
            policy,
            state: Mutex::new(WriterState::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `line` plus a newline and flushes.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from rotating, opening or writing the file, and an
    /// error when the internal lock was poisoned.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("trace writer poisoned: {e}")))?;

        if fs::metadata(&self.path).is_ok_and(|m| m.len() > self.policy.max_bytes) {
            state.file = None;
            state.rotations += 1;
            self.rotate(state.rotations)?;
        }

        if state.file.is_none() {
            state.file = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }

        match state.file.as_mut() {
            Some(file) => {
                writeln!(file, "{line}")?;
                file.flush()
            }
            None => Err(io::Error::new(io::ErrorKind::Other, "trace file unavailable")),
        }
    }

    fn rotate(&self, sequence: u64) -> io::Result<()> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        let backup = self.path.with_extension(format!("json.{stamp}{sequence:04}"));
        if self.path.exists() {
            fs::rename(&self.path, &backup)?;
        }
        self.prune_backups()
    }

    fn prune_backups(&self) -> io::Result<()> {
        let Some(dir) = self.path.parent() else {
            return Ok(());
        };
        let Some(stem) = self.path.file_stem().and_then(|s| s.to_str()) else {
            return Ok(());
        };
        let prefix = format!("{stem}.json.");

        let mut backups: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();

        // Suffixes are fixed-width per process, so name order is age order.
        backups.sort();
        let excess = backups.len().saturating_sub(self.policy.backups);
        for old in backups.into_iter().take(excess) {
            let _ = fs::remove_file(old);
        }
        Ok(())
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backups_in(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("traces.json."))
            .count()
    }

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingFile::new(dir.path().join("traces.json"), RotationPolicy::default());

        writer.write_line("{\"a\":1}").unwrap();
        writer.write_line("{\"b\":2}").unwrap();

        let content = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(content, "{\"a\":1}\n{\"b\":2}\n");
        assert_eq!(backups_in(dir.path()), 0);
    }

    #[test]
    fn rotates_past_the_limit_and_keeps_only_recent_backups() {
        let dir = tempfile::tempdir().unwrap();
        let policy = RotationPolicy { max_bytes: 8, backups: 2 };
        let writer = RotatingFile::new(dir.path().join("traces.json"), policy);

        for i in 0..6 {
            writer.write_line(&format!("line number {i}")).unwrap();
        }

        assert_eq!(backups_in(dir.path()), 2);
        let current = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(current, "line number 5\n");
    }
}
