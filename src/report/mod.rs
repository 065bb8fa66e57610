//! # Reporting
//!
//! The read path of cmdstat: [`query`] selects and orders records from a
//! loaded [`crate::store::Store`], [`render`] formats them, and
//! [`pager::display`] writes the result.

pub mod color;
pub mod column;
pub mod pager;
pub mod query;
pub mod render;
pub mod table;

pub use color::{parse_color, DEFAULT_BAR_COLOR};
pub use column::Column;
pub use query::{query, QueryOptions, QueryResult, DEFAULT_LIMIT};
pub use render::{render, usage_bar, OutputFormat, RenderOptions, PLAIN_DELIMITER};
