//! cmdstat - shell command usage statistics
//!
//! The capture hook records every interactively entered command into a
//! JSON store (count, kind and per-directory breakdown per command); the
//! report tool queries that store and renders it as a table, plain rows,
//! JSON or a detailed per-directory listing.

pub mod capture;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod store;

pub use error::{Result, StatError};
