//! Fixed-width text table.
//!
//! Column widths are measured in terminal cells (`unicode-width`), so wide
//! characters and block glyphs line up.

use std::fmt::{self, Display};

use crossterm::style::{Color, Stylize};
use unicode_width::UnicodeWidthStr;

/// Gap between columns
const SPACER: &str = " ";

#[derive(Debug, Default)]
pub struct Table {
    title: Option<String>,
    headings: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headings: Vec<String>) -> Self {
        Self {
            headings,
            ..Self::default()
        }
    }

    /// Line printed above the headings
    pub fn with_title(self, title: String) -> Self {
        Self {
            title: Some(title),
            ..self
        }
    }

    pub fn add_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.headings.len());
        self.rows.push(row);
    }

    /// Width of each column: its widest cell or heading
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headings.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.content.width());
            }
        }
        widths
    }

    fn rule(widths: &[usize]) -> String {
        let total = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * SPACER.len();
        "-".repeat(total)
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.headings.is_empty() {
            return Ok(());
        }
        let widths = self.column_widths();
        let rule = Self::rule(&widths);

        if let Some(title) = &self.title {
            writeln!(f, "{title}")?;
            writeln!(f, "{rule}")?;
        }
        let headings: Vec<Cell> = self.headings.iter().map(Cell::new).collect();
        write_row(f, &headings, &widths)?;
        writeln!(f, "{rule}")?;

        for row in &self.rows {
            write_row(f, row, &widths)?;
        }
        writeln!(f, "{rule}")
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[Cell], widths: &[usize]) -> fmt::Result {
    let last = cells.len().saturating_sub(1);
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let mut text = cell.content.clone();
        if i < last {
            text.push_str(&" ".repeat(width.saturating_sub(cell.content.width())));
            text.push_str(SPACER);
        }
        match cell.color {
            Some(color) => write!(f, "{}", text.with(color))?,
            None => write!(f, "{text}")?,
        }
    }
    writeln!(f)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    content: String,
    color: Option<Color>,
}

impl Cell {
    pub fn new<S: ToString>(content: S) -> Self {
        Self {
            content: content.to_string(),
            color: None,
        }
    }

    pub fn with_color(self, color: Color) -> Self {
        Self {
            color: Some(color),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(vec!["Command".into(), "Count".into()]);
        table.add_row(vec![Cell::new("git"), Cell::new(1234)]);
        table.add_row(vec![Cell::new("kubectl"), Cell::new(7)]);
        table
    }

    #[test]
    fn test_widths_include_headings() {
        assert_eq!(sample().column_widths(), vec![7, 5]);
    }

    #[test]
    fn test_render_pads_columns() {
        let rendered = sample().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Command Count",
                "-------------",
                "git     1234",
                "kubectl 7",
                "-------------",
            ]
        );
    }

    #[test]
    fn test_title_above_headings() {
        let rendered = sample().with_title("Stats".into()).to_string();
        assert!(rendered.starts_with("Stats\n-------------\nCommand Count\n"));
    }

    #[test]
    fn test_wide_characters_measured_in_cells() {
        let mut table = Table::new(vec!["Usage".into()]);
        table.add_row(vec![Cell::new("██████████")]);
        assert_eq!(table.column_widths(), vec![10]);
    }
}
