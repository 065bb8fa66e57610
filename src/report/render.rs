//! # Renderer
//!
//! Turns a [`QueryResult`] into text.
//!
//! | Format | Output |
//! |--------|--------|
//! | [`OutputFormat::Table`] | titled, padded table with usage bars |
//! | [`OutputFormat::Plain`] | one record per line, fields separated by a TAB, no color |
//! | [`OutputFormat::Json`] | pretty JSON array of the selected records |
//! | [`OutputFormat::Detailed`] | per-command calls, kind and top directories |

use std::path::{Component, Path, PathBuf};

use crossterm::style::{Color, Stylize};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::color::DEFAULT_BAR_COLOR;
use super::column::Column;
use super::query::QueryResult;
use super::table::{Cell, Table};
use crate::error::Result;
use crate::store::CommandRecord;

/// Eighth-block glyphs, from 1/8 to a full cell
const BAR_CHARS: [char; 8] = ['▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Narrowest usage bar, however little room the terminal has
const MIN_BAR_WIDTH: usize = 10;

/// Directories listed per command in detailed mode
const DETAIL_DIR_LIMIT: usize = 10;

/// Field separator of [`OutputFormat::Plain`]
pub const PLAIN_DELIMITER: char = '\t';

const TITLE: &str = "Command Statistics";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Plain,
    Json,
    Detailed,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub bar_color: Color,
    /// Emit ANSI styling
    pub color: bool,
    /// Terminal width in cells, used to size bars and rules
    pub term_width: usize,
    /// Home directory, shown as `~` in detailed mode
    pub home: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            bar_color: DEFAULT_BAR_COLOR,
            color: false,
            term_width: 80,
            home: None,
        }
    }
}

/// Render `result` in the requested format.
pub fn render(result: &QueryResult<'_>, opts: &RenderOptions) -> Result<String> {
    match opts.format {
        OutputFormat::Table => Ok(render_table(result, opts)),
        OutputFormat::Plain => Ok(render_plain(result)),
        OutputFormat::Json => render_json(result),
        OutputFormat::Detailed => Ok(render_detailed(result, opts)),
    }
}

/// Text of a non-bar cell
fn cell_text(column: Column, record: &CommandRecord, result: &QueryResult<'_>) -> String {
    match column {
        Column::Command => record.command.clone(),
        Column::Count => record.count.to_string(),
        Column::Percent => format!("{:.1}%", result.percent(record)),
        Column::Kind => record.kind.clone(),
        Column::Dirs => record.dir_count().to_string(),
        Column::Usage => String::new(),
    }
}

fn render_table(result: &QueryResult<'_>, opts: &RenderOptions) -> String {
    let columns = result.table_columns();

    // Bars get whatever the other columns leave of the terminal
    let fixed: usize = columns
        .iter()
        .filter(|c| **c != Column::Usage)
        .map(|c| {
            result
                .records
                .iter()
                .map(|r| cell_text(*c, r, result).width())
                .max()
                .unwrap_or(0)
                .max(c.heading().len())
        })
        .sum();
    let spacing = columns.len().saturating_sub(1);
    let bar_width = opts
        .term_width
        .saturating_sub(fixed + spacing)
        .max(MIN_BAR_WIDTH);
    let max_count = result.max_count();

    let headings = columns.iter().map(|c| c.heading().to_string()).collect();
    let title = if opts.color {
        TITLE.with(Color::Cyan).bold().to_string()
    } else {
        TITLE.to_string()
    };
    let mut table = Table::new(headings).with_title(title);

    for record in &result.records {
        let row = columns
            .iter()
            .map(|column| match column {
                Column::Usage => {
                    let cell = Cell::new(usage_bar(record.count, max_count, bar_width));
                    if opts.color {
                        cell.with_color(opts.bar_color)
                    } else {
                        cell
                    }
                }
                _ => Cell::new(cell_text(*column, record, result)),
            })
            .collect();
        table.add_row(row);
    }

    table.to_string()
}

fn render_plain(result: &QueryResult<'_>) -> String {
    let columns = result.table_columns();
    let max_count = result.max_count();
    let mut out = String::new();

    for record in &result.records {
        let fields: Vec<String> = columns
            .iter()
            .map(|column| match column {
                Column::Usage => usage_bar(record.count, max_count, MIN_BAR_WIDTH),
                _ => cell_text(*column, record, result),
            })
            .collect();
        out.push_str(&fields.join(&PLAIN_DELIMITER.to_string()));
        out.push('\n');
    }
    out
}

/// A record restricted to the selected columns, in selection order
struct Projected<'a> {
    record: &'a CommandRecord,
    columns: &'a [Column],
    percent: f64,
}

impl Serialize for Projected<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for column in self.columns {
            match column {
                Column::Command => map.serialize_entry("command", &self.record.command)?,
                Column::Count => map.serialize_entry("count", &self.record.count)?,
                Column::Kind => map.serialize_entry("kind", &self.record.kind)?,
                Column::Dirs => map.serialize_entry("dirs", &self.record.dirs)?,
                Column::Percent => {
                    let rounded = (self.percent * 10.0).round() / 10.0;
                    map.serialize_entry("percent", &rounded)?;
                }
                // Bars are a display concern only
                Column::Usage => {}
            }
        }
        map.end()
    }
}

fn render_json(result: &QueryResult<'_>) -> Result<String> {
    let mut json = match &result.columns {
        None => serde_json::to_string_pretty(&result.records)?,
        Some(columns) => {
            let mut fields: Vec<Column> = columns
                .iter()
                .copied()
                .filter(|c| *c != Column::Usage)
                .collect();
            // A bar-only selection still names each record
            if fields.is_empty() {
                fields.push(Column::Command);
            }
            let projected: Vec<Projected<'_>> = result
                .records
                .iter()
                .map(|record| Projected {
                    record,
                    columns: &fields,
                    percent: result.percent(record),
                })
                .collect();
            serde_json::to_string_pretty(&projected)?
        }
    };
    json.push('\n');
    Ok(json)
}

fn render_detailed(result: &QueryResult<'_>, opts: &RenderOptions) -> String {
    let rule = "-".repeat((opts.term_width / 2).max(MIN_BAR_WIDTH));
    let label = |text: &str| {
        if opts.color {
            text.with(Color::Cyan).bold().to_string()
        } else {
            text.to_string()
        }
    };
    let mut out = String::new();

    for record in &result.records {
        out.push_str(&format!("{rule}\n\t{}\n{rule}\n\n", label(&record.command)));
        out.push_str(&format!("{}: {}\n", label("calls"), record.count));
        out.push_str(&format!("{}: {}\n", label("class"), record.kind));
        out.push_str(&format!("{}:\n", label("top directories")));
        for (dir, count) in record.top_dirs(DETAIL_DIR_LIMIT) {
            let dir = prettify_dir(dir, opts.home.as_deref(), opts.color);
            out.push_str(&format!("\t{dir}: {count}\n"));
        }
        out.push('\n');
    }
    if !result.records.is_empty() {
        out.push_str(&rule);
        out.push('\n');
    }
    out
}

/// Bar for `count`, where `max` fills `width` cells.
///
/// Every bar shows at least the thinnest glyph so small counts stay visible.
pub fn usage_bar(count: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return BAR_CHARS[0].to_string();
    }
    let eighths = (count as f64 / max as f64 * width as f64 * 8.0).round() as usize;
    let full = eighths / 8;
    let partial = eighths % 8;

    let mut bar = BAR_CHARS[7].to_string().repeat(full);
    if partial > 0 {
        bar.push(BAR_CHARS[partial - 1]);
    }
    if bar.is_empty() {
        bar.push(BAR_CHARS[0]);
    }
    bar
}

/// Show `dir` with `~` for the home directory, optionally colored.
fn prettify_dir(dir: &str, home: Option<&Path>, color: bool) -> String {
    let path = Path::new(dir);
    let (root, rest) = match home.and_then(|h| path.strip_prefix(h).ok()) {
        Some(rest) => ("~", rest),
        None if path.is_absolute() => ("", path),
        None => return dir.to_string(),
    };

    let paint = |text: &str, c: Color| {
        if color {
            text.with(c).to_string()
        } else {
            text.to_string()
        }
    };

    let mut pretty = paint(root, Color::Blue);
    let mut segments = 0;
    for component in rest.components() {
        if let Component::Normal(segment) = component {
            pretty.push_str(&paint("/", Color::DarkCyan));
            pretty.push_str(&paint(&segment.to_string_lossy(), Color::Blue));
            segments += 1;
        }
    }
    if segments == 0 && root.is_empty() {
        pretty.push_str(&paint("/", Color::DarkCyan));
    }
    pretty
}
