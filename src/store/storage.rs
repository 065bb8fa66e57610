//! # Record Storage
//!
//! Handles persistence of the [`Store`] as a single JSON file.
//!
//! ## Storage Location
//!
//! ```text
//! ~/.local/share/cmdstat/
//! ├── stats.json        # the store
//! └── stats.json.lock   # advisory lock held by writers
//! ```
//!
//! `$CMDSTAT_FILE` moves both files (see [`crate::config::stats_file`]).
//!
//! ## Write Discipline
//!
//! Every mutation is a whole-file read-modify-write under the lock, and every
//! save writes a temp file in the same directory and renames it over the
//! stats file. Readers that skip the lock therefore see either the old or
//! the new content, never a partial write.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;

use super::lock::StoreLock;
use super::record::Store;
use crate::error::{Result, StatError};

/// How long a writer waits for the store lock by default
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(2000);

/// Serialized form of an empty store
const EMPTY_STORE: &[u8] = b"[]\n";

/// The stats file and its lock
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    lock_timeout: Duration,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Override how long writers wait for the lock
    pub fn with_lock_timeout(self, lock_timeout: Duration) -> Self {
        Self {
            lock_timeout,
            ..self
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the companion lock file (`<stats file>.lock`)
    pub fn lock_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Read the store from disk.
    ///
    /// A missing or blank file is an empty store, and the file is rewritten
    /// as `[]` before returning when it can be. Content that does not parse,
    /// or that breaks the store invariants, is reported as
    /// [`StatError::StoreCorrupt`]. A valid file only needs read access.
    pub fn load(&self) -> Result<Store> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(StatError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return self.initialize();
        }
        self.parse(&content)
    }

    fn parse(&self, content: &str) -> Result<Store> {
        serde_json::from_str(content).map_err(|source| StatError::StoreCorrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Write `[]` into a missing or blank stats file.
    ///
    /// An unwritable location still loads as an empty store; writers then
    /// fail on save instead.
    fn initialize(&self) -> Result<Store> {
        match self.write_empty() {
            Ok(None) => Ok(Store::new()),
            // A writer replaced the file in the meantime
            Ok(Some(content)) => self.parse(&content),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "cannot initialize stats file"
                );
                Ok(Store::new())
            }
        }
    }

    fn write_empty(&self) -> io::Result<Option<String>> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Opened without truncation so a concurrent rename is never clobbered;
        // initialization only ever writes into a blank inode.
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;
        if !content.trim().is_empty() {
            return Ok(Some(content));
        }

        tracing::debug!(path = %self.path.display(), "initializing empty stats file");
        file.set_len(0)?;
        file.rewind()?;
        file.write_all(EMPTY_STORE)?;
        file.sync_all()?;
        Ok(None)
    }

    /// Replace the stats file with `store` atomically.
    pub fn save(&self, store: &Store) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| StatError::io(parent, e))?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| StatError::io(parent, e))?;
        serde_json::to_writer_pretty(&mut tmp, store)?;
        tmp.write_all(b"\n")
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StatError::io(tmp.path(), e))?;

        tmp.persist(&self.path)
            .map_err(|e| StatError::io(&self.path, e.error))?;

        tracing::debug!(path = %self.path.display(), commands = store.len(), "saved stats file");
        Ok(())
    }

    /// Run one locked read-modify-write of the store.
    ///
    /// The lock is held from before the load until after the save, so
    /// concurrent writers never lose each other's updates. Returns the store
    /// as written.
    pub fn with_exclusive_access<F>(&self, body: F) -> Result<Store>
    where
        F: FnOnce(Store) -> Store,
    {
        let _lock = StoreLock::acquire(&self.lock_path(), self.lock_timeout)?;
        let store = self.load()?;
        let updated = body(store);
        self.save(&updated)?;
        Ok(updated)
    }

    /// Reset the store to empty through the locked write path
    pub fn clear(&self) -> Result<()> {
        self.with_exclusive_access(|_| Store::new())?;
        tracing::info!(path = %self.path.display(), "cleared stats file");
        Ok(())
    }
}
