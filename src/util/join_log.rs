//! Best-effort append-only log of player joins
//!
//! One file per server start. Failure to open or write never reaches
//! gameplay; errors are logged and dropped.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use parking_lot::Mutex;
use tracing::warn;

use crate::util::time::unix_secs;

/// Handle to the join log. Cheap to share behind the world.
pub struct JoinLog {
    file: Option<Mutex<File>>,
}

impl JoinLog {
    /// Open a fresh log file under `dir`, named by the current Unix time.
    /// Returns a disabled log if the directory or file cannot be created.
    pub fn open(dir: &Path) -> Self {
        let file = try_open(dir);
        if file.is_none() {
            warn!(dir = %dir.display(), "join log unavailable, continuing without it");
        }
        Self {
            file: file.map(Mutex::new),
        }
    }

    /// A log that records nothing (tests, or logging disabled).
    pub fn disabled() -> Self {
        Self { file: None }
    }

    /// Append one join record: `<name>,<unix_secs>`.
    pub fn record(&self, name: &str) {
        let Some(file) = &self.file else { return };
        let line = format!("{},{}\n", name, unix_secs());
        if let Err(e) = file.lock().write_all(line.as_bytes()) {
            warn!(error = %e, "failed to append join log entry");
        }
    }
}

fn try_open(dir: &Path) -> Option<File> {
    fs::create_dir_all(dir).ok()?;
    let path = dir.join(format!("{}.log", unix_secs()));
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_log_accepts_records() {
        let log = JoinLog::disabled();
        log.record("someone");
    }

    #[test]
    fn open_writes_one_line_per_join() {
        let dir = std::env::temp_dir().join(format!("join_log_test_{}", std::process::id()));
        let log = JoinLog::open(&dir);
        log.record("alice");
        log.record("bob");

        let mut contents = String::new();
        for entry in fs::read_dir(&dir).unwrap() {
            contents.push_str(&fs::read_to_string(entry.unwrap().path()).unwrap());
        }
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.lines().any(|l| l.starts_with("alice,")));

        let _ = fs::remove_dir_all(&dir);
    }
}
