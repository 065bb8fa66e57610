//! # Statistics Store
//!
//! The persisted per-command aggregates and the only code that touches the
//! stats file.
//!
//! - [`record`]: the [`CommandRecord`] / [`Store`] data model
//! - [`aggregate`]: pure [`merge`] of one observation into a store
//! - [`storage`]: [`RecordStore`] load / save / locked read-modify-write
//! - [`lock`]: the cross-process [`StoreLock`]

pub mod aggregate;
pub mod lock;
pub mod record;
pub mod storage;

pub use aggregate::merge;
pub use lock::StoreLock;
pub use record::{CommandRecord, Store};
pub use storage::{RecordStore, DEFAULT_LOCK_TIMEOUT};
