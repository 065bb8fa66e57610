//! Report columns and their names on the command line.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::{Result, StatError};

/// A field that can be shown, sorted on, or exported for each command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Command,
    Count,
    Percent,
    Usage,
    Kind,
    /// Number of distinct directories the command ran in
    Dirs,
}

impl Column {
    /// Table layout used when no columns are selected
    pub const DEFAULT_LAYOUT: [Column; 4] = [
        Column::Command,
        Column::Count,
        Column::Percent,
        Column::Usage,
    ];

    /// Table heading
    pub fn heading(self) -> &'static str {
        match self {
            Column::Command => "Command",
            Column::Count => "Count",
            Column::Percent => "Percent",
            Column::Usage => "Usage",
            Column::Kind => "Type",
            Column::Dirs => "Dirs",
        }
    }

    /// Numeric columns sort largest-first by default, text columns A to Z
    pub fn is_numeric(self) -> bool {
        !matches!(self, Column::Command | Column::Kind)
    }

    /// Parse a list of column names, dropping repeats.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<Column>> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let column: Column = name.as_ref().parse()?;
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        Ok(columns)
    }

    /// Parse the argument of `--sort`.
    pub fn parse_sort_key(name: &str) -> Result<Column> {
        name.parse()
            .map_err(|_| StatError::UnknownSortKey(name.to_string()))
    }
}

impl FromStr for Column {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "command" | "cmd" => Ok(Column::Command),
            "count" | "calls" => Ok(Column::Count),
            "usage" | "bar" => Ok(Column::Usage),
            "percent" | "pct" | "%" => Ok(Column::Percent),
            "type" | "kind" => Ok(Column::Kind),
            "dirs" | "directories" => Ok(Column::Dirs),
            _ => Err(StatError::UnknownColumn(s.to_string())),
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!("cmd".parse::<Column>().ok(), Some(Column::Command));
        assert_eq!("Calls".parse::<Column>().ok(), Some(Column::Count));
        assert_eq!("bar".parse::<Column>().ok(), Some(Column::Usage));
        assert_eq!("%".parse::<Column>().ok(), Some(Column::Percent));
        assert_eq!("TYPE".parse::<Column>().ok(), Some(Column::Kind));
        assert_eq!("dirs".parse::<Column>().ok(), Some(Column::Dirs));
    }

    #[test]
    fn test_unknown_column() {
        let err = Column::parse_list(&["cmd", "nope"]).expect_err("should fail");
        assert!(matches!(err, StatError::UnknownColumn(name) if name == "nope"));
    }

    #[test]
    fn test_unknown_sort_key() {
        let err = Column::parse_sort_key("size").expect_err("should fail");
        assert!(matches!(err, StatError::UnknownSortKey(name) if name == "size"));
    }

    #[test]
    fn test_parse_list_keeps_order_and_drops_repeats() {
        let columns = Column::parse_list(&["type", "cmd", "kind", "count"]).unwrap();
        assert_eq!(columns, vec![Column::Kind, Column::Command, Column::Count]);
    }

    #[test]
    fn test_numeric_columns() {
        assert!(Column::Count.is_numeric());
        assert!(Column::Dirs.is_numeric());
        assert!(!Column::Command.is_numeric());
        assert!(!Column::Kind.is_numeric());
    }
}
