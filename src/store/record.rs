//! # Store Data Model
//!
//! One [`CommandRecord`] per distinct command name, kept in a [`Store`] in the
//! order each command was first seen.
//!
//! ## Data Format
//!
//! ```json
//! [
//!   {
//!     "command": "git",
//!     "count": 4,
//!     "kind": "command",
//!     "dirs": {
//!       "/home/user": 1,
//!       "/home/user/project": 3
//!     }
//!   }
//! ]
//! ```

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Aggregated usage of a single command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Bare command name, unique within a store
    pub command: String,
    /// Total number of observations, always the sum of `dirs`
    pub count: u64,
    /// How the shell classified the command the last time it ran
    pub kind: String,
    /// Observations per working directory
    pub dirs: BTreeMap<String, u64>,
}

impl CommandRecord {
    /// Create the record for a command's first observation
    pub fn new(command: &str, dir: &str, kind: &str) -> Self {
        let mut dirs = BTreeMap::new();
        dirs.insert(dir.to_string(), 1);
        Self {
            command: command.to_string(),
            count: 1,
            kind: kind.to_string(),
            dirs,
        }
    }

    /// Number of distinct directories the command was run from
    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    /// The `limit` directories with the most observations, busiest first.
    ///
    /// Directories with equal counts keep their lexicographic order.
    pub fn top_dirs(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut dirs: Vec<(&str, u64)> = self
            .dirs
            .iter()
            .map(|(dir, count)| (dir.as_str(), *count))
            .collect();
        dirs.sort_by(|a, b| b.1.cmp(&a.1));
        dirs.truncate(limit);
        dirs
    }
}

/// Every recorded command, in first-observation order.
///
/// Serializes as a bare JSON array, so an empty store is `[]`. Deserializing
/// rejects arrays with a repeated command or a count that is not the sum of
/// its directories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Store {
    records: Vec<CommandRecord>,
}

impl<'de> Deserialize<'de> for Store {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<CommandRecord>::deserialize(deserializer)?;

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.command.as_str()) {
                return Err(de::Error::custom(format!(
                    "command `{}' appears more than once",
                    record.command
                )));
            }
            let dir_total = record
                .dirs
                .values()
                .try_fold(0u64, |acc, n| acc.checked_add(*n));
            if dir_total != Some(record.count) {
                return Err(de::Error::custom(format!(
                    "count of `{}' does not match its directories",
                    record.command
                )));
            }
        }

        Ok(Self { records })
    }
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up the record for a command name
    pub fn get(&self, command: &str) -> Option<&CommandRecord> {
        self.records.iter().find(|r| r.command == command)
    }

    /// Sum of every record's count
    pub fn total_count(&self) -> u64 {
        self.records.iter().map(|r| r.count).sum()
    }

    pub(crate) fn get_mut(&mut self, command: &str) -> Option<&mut CommandRecord> {
        self.records.iter_mut().find(|r| r.command == command)
    }

    pub(crate) fn push(&mut self, record: CommandRecord) {
        self.records.push(record);
    }
}
