//! Cross-process advisory lock guarding writers of the stats file.
//!
//! The lock lives in a companion file next to the stats file so the stats
//! file itself can be replaced by rename while the lock is held.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Result, StatError};

/// Delay between attempts while another process holds the lock
const RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// RAII guard for the store lock, released on drop
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Take the exclusive lock, polling until `timeout` has elapsed.
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StatError::io(parent, e))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| StatError::io(path, e))?;

        let started = Instant::now();
        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => {
                    tracing::debug!(
                        lock = %path.display(),
                        waited_ms = started.elapsed().as_millis() as u64,
                        "acquired store lock"
                    );
                    return Ok(Self {
                        file,
                        path: path.to_path_buf(),
                    });
                }
                Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                    if started.elapsed() >= timeout {
                        return Err(StatError::LockTimeout {
                            path: path.to_path_buf(),
                            waited: started.elapsed(),
                        });
                    }
                    thread::sleep(RETRY_INTERVAL);
                }
                Err(e) => return Err(StatError::io(path, e)),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(lock = %self.path.display(), error = %e, "failed to release store lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_creates_lock_file() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = temp_dir.path().join("nested").join("stats.json.lock");

        let lock = StoreLock::acquire(&lock_path, Duration::from_millis(100)).unwrap();
        assert!(lock_path.exists());
        assert_eq!(lock.path(), lock_path);
    }

    #[test]
    fn test_second_holder_times_out() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = temp_dir.path().join("stats.json.lock");

        let _held = StoreLock::acquire(&lock_path, Duration::from_millis(100)).unwrap();
        let result = StoreLock::acquire(&lock_path, Duration::from_millis(50));

        assert!(matches!(result, Err(StatError::LockTimeout { .. })));
    }

    #[test]
    fn test_lock_released_on_drop() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = temp_dir.path().join("stats.json.lock");

        {
            let _held = StoreLock::acquire(&lock_path, Duration::from_millis(100)).unwrap();
        }
        assert!(StoreLock::acquire(&lock_path, Duration::from_millis(100)).is_ok());
    }
}
