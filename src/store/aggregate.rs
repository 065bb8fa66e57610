//! Pure merge of one observed command into a [`Store`].
//!
//! All I/O lives in [`super::RecordStore`]; this module only folds events.

use super::record::{CommandRecord, Store};

/// Record one observation of `command` run from `dir`.
///
/// An existing record gains one call in `dir` and takes the new `kind`;
/// an unseen command is appended to the end of the store. No other record
/// is touched and the order of existing records never changes.
pub fn merge(mut store: Store, command: &str, dir: &str, kind: &str) -> Store {
    match store.get_mut(command) {
        Some(record) => {
            record.count += 1;
            record.kind = kind.to_string();
            *record.dirs.entry(dir.to_string()).or_insert(0) += 1;
        }
        None => store.push(CommandRecord::new(command, dir, kind)),
    }
    store
}
