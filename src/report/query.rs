//! # Query Engine
//!
//! Selects, orders and limits the records a report shows:
//!
//! 1. **Filter**: keep only the named commands (no names keeps everything)
//! 2. **Sort**: stable sort on one column; numeric columns default to
//!    largest-first, text columns to A-Z, and `reverse` flips that
//! 3. **Limit**: keep the first `limit` records unless `all` is set
//!
//! Because the sort is stable and `reverse` flips the comparison rather than
//! the result, records with equal keys always stay in store order.

use std::cmp::Ordering;

use super::column::Column;
use crate::store::{CommandRecord, Store};

/// Number of commands shown when neither `--num` nor `--all` is given
pub const DEFAULT_LIMIT: usize = 20;

/// What to select from a store
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// Only report these commands; empty means every command
    pub commands: Vec<String>,
    /// Ignore `limit`
    pub all: bool,
    pub limit: usize,
    pub sort_key: Column,
    pub reverse: bool,
    /// Columns exposed to the renderer; `None` means the default layout
    /// (and full records for JSON)
    pub columns: Option<Vec<Column>>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            all: false,
            limit: DEFAULT_LIMIT,
            sort_key: Column::Count,
            reverse: false,
            columns: None,
        }
    }
}

/// Records selected by [`query`], in display order
#[derive(Debug, Clone)]
pub struct QueryResult<'a> {
    pub records: Vec<&'a CommandRecord>,
    pub columns: Option<Vec<Column>>,
    /// Total calls over the whole store, the base for percentages
    pub total_count: u64,
}

impl QueryResult<'_> {
    /// Columns a table should show
    pub fn table_columns(&self) -> &[Column] {
        self.columns.as_deref().unwrap_or(&Column::DEFAULT_LAYOUT)
    }

    /// Share of all recorded calls that went to `record`, in percent
    pub fn percent(&self, record: &CommandRecord) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        record.count as f64 / self.total_count as f64 * 100.0
    }

    /// Largest count among the selected records, the full-width bar
    pub fn max_count(&self) -> u64 {
        self.records.iter().map(|r| r.count).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Select records from `store` according to `opts`.
pub fn query<'a>(store: &'a Store, opts: &QueryOptions) -> QueryResult<'a> {
    let mut records: Vec<&CommandRecord> = store
        .records()
        .iter()
        .filter(|r| opts.commands.is_empty() || opts.commands.contains(&r.command))
        .collect();

    records.sort_by(|a, b| {
        let ord = compare(a, b, opts.sort_key);
        if opts.reverse {
            ord.reverse()
        } else {
            ord
        }
    });

    if !opts.all {
        records.truncate(opts.limit);
    }

    tracing::debug!(
        selected = records.len(),
        sort = %opts.sort_key,
        reverse = opts.reverse,
        "queried store"
    );

    QueryResult {
        records,
        columns: opts.columns.clone(),
        total_count: store.total_count(),
    }
}

/// Default-direction ordering of two records on `key`
fn compare(a: &CommandRecord, b: &CommandRecord, key: Column) -> Ordering {
    match key {
        Column::Command => a.command.cmp(&b.command),
        Column::Kind => a.kind.cmp(&b.kind),
        // Percent and usage are both proportional to count
        Column::Count | Column::Percent | Column::Usage => b.count.cmp(&a.count),
        Column::Dirs => b.dir_count().cmp(&a.dir_count()),
    }
}
