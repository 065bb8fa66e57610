//! # cmdstat CLI Entry Point
//!
//! Reports the command usage recorded by `cmdstat-hook`.
//!
//! ## Usage
//!
//! ```bash
//! # Top 20 commands
//! cmdstat
//!
//! # Every command, sorted by name
//! cmdstat --all --sort command
//!
//! # Where do I run git and cargo from?
//! cmdstat -l git cargo
//!
//! # Tab-separated rows for scripts
//! cmdstat --no-header --columns cmd,count,type | sort -k2 -n
//!
//! # Raw JSON
//! cmdstat --json
//! ```
//!
//! ## Flow
//!
//! 1. **Validate**: columns, sort key and bar color are parsed before the
//!    store is touched
//! 2. **Load**: the store is read without the lock (writers replace it
//!    atomically)
//! 3. **Query**: filter, sort, limit
//! 4. **Render**: table, plain rows, JSON or detailed listing
//! 5. **Display**: through `$PAGER` when the output is taller than the terminal

use cmdstat::config::{self, Config};
use cmdstat::report::{
    self, pager, Column, OutputFormat, QueryOptions, RenderOptions, DEFAULT_BAR_COLOR,
};
use cmdstat::store::RecordStore;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

/// cmdstat - statistics about the shell commands you run
#[derive(Parser, Debug)]
#[command(name = "cmdstat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Show which shell commands you run, how often and where", long_about = None)]
struct Args {
    /// Only show statistics for these commands
    commands: Vec<String>,

    /// Display all commands from the stats file. Ignores --num
    #[arg(short, long)]
    all: bool,

    /// Number of commands to show [default: 20, or "limit" from the config]
    #[arg(short, long, value_name = "N")]
    num: Option<usize>,

    /// Show calls, type and top directories for each command
    #[arg(short, long)]
    long: bool,

    /// Columns to display, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        value_name = "COLUMNS",
        long_help = "Choose specific columns to display. Possible options are:
    'command/cmd',
    'count/calls',
    'usage/bar',
    'percent/pct/%',
    'type/kind',
    'dirs'."
    )]
    columns: Vec<String>,

    /// Column to sort by [default: count]
    #[arg(long, value_name = "COLUMN")]
    sort: Option<String>,

    /// Reverse the sort
    #[arg(long)]
    reverse: bool,

    /// Print the selected records as JSON
    #[arg(long)]
    json: bool,

    /// Omit the title and headings; print tab-separated rows
    #[arg(long)]
    no_header: bool,

    /// Usage bar color
    #[arg(
        long,
        value_name = "COLOR",
        long_help = "Choose a custom bar color. Can take the name of any valid ansi color, as well as rgb or raw ansi codes
    Examples:
    'green'
    'darkred'
    'dark_magenta'
    '132,50,1'
    '31'"
    )]
    bar_color: Option<String>,

    /// Never send output through $PAGER
    #[arg(long)]
    no_pager: bool,

    /// Irreversibly erase all recorded statistics
    #[arg(long)]
    clear_stats: bool,

    /// Do not ask for confirmation before --clear-stats
    #[arg(short, long, requires = "clear_stats")]
    yes: bool,

    /// Stats file to read
    #[arg(long, value_name = "FILE", env = config::STATS_FILE_ENV)]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    cmdstat::logging::init_stderr();

    let config = Config::load();
    let path = match &args.file {
        Some(path) => path.clone(),
        None => config::stats_file()?,
    };
    let store = RecordStore::new(path).with_lock_timeout(config.lock_timeout());

    if args.clear_stats {
        return clear_stats(&store, args.yes);
    }

    run_report(&args, &config, &store)
}

fn run_report(args: &Args, config: &Config, store: &RecordStore) -> Result<()> {
    let format = output_format(args);

    // Validate everything the user typed before reading the store
    let column_names = selected_columns(args, config, format);
    let columns = if column_names.is_empty() {
        None
    } else {
        Some(Column::parse_list(column_names)?)
    };
    let sort_key = match &args.sort {
        Some(name) => Column::parse_sort_key(name)?,
        None => Column::Count,
    };
    let bar_color = match args.bar_color.as_ref().or(config.bar_color.as_ref()) {
        Some(color) => report::parse_color(color)?,
        None => DEFAULT_BAR_COLOR,
    };

    let data = store
        .load()
        .with_context(|| format!("Failed to load stats from {}", store.path().display()))?;

    let query_opts = QueryOptions {
        commands: args.commands.clone(),
        all: args.all,
        limit: args.num.unwrap_or(config.limit),
        sort_key,
        reverse: args.reverse,
        columns,
    };
    let result = report::query(&data, &query_opts);

    let (term_width, _) = pager::term_dimensions();
    let render_opts = RenderOptions {
        format,
        bar_color,
        color: io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        term_width,
        home: directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
    };
    let output = report::render(&result, &render_opts)?;

    let paging = !args.no_pager
        && config.pager
        && matches!(format, OutputFormat::Table | OutputFormat::Detailed);
    pager::display(&output, paging).context("Failed to write report")?;

    Ok(())
}

fn output_format(args: &Args) -> OutputFormat {
    if args.json {
        OutputFormat::Json
    } else if args.long {
        OutputFormat::Detailed
    } else if args.no_header {
        OutputFormat::Plain
    } else {
        OutputFormat::Table
    }
}

/// Column names for this report. `--columns` always applies; the config's
/// default layout only shapes table and plain output, so `--json` alone
/// still prints full records.
fn selected_columns<'a>(
    args: &'a Args,
    config: &'a Config,
    format: OutputFormat,
) -> &'a [String] {
    if !args.columns.is_empty() {
        &args.columns
    } else if matches!(format, OutputFormat::Table | OutputFormat::Plain) {
        &config.columns
    } else {
        &[]
    }
}

fn clear_stats(store: &RecordStore, assume_yes: bool) -> Result<()> {
    if !assume_yes {
        println!("This will irreversibly clear the stats file.");
        if !confirm("Are you sure? y/n ")? {
            println!("Exiting.");
            return Ok(());
        }
    }

    store
        .clear()
        .with_context(|| format!("Failed to clear {}", store.path().display()))?;
    println!("Stats file cleared.");
    Ok(())
}

/// Ask until the user answers `y` or `n`; end of input counts as `n`.
fn confirm(prompt: &str) -> Result<bool> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{prompt}");
        io::stdout().flush().context("Failed to write prompt")?;

        match lines.next() {
            None => return Ok(false),
            Some(line) => match line.context("Failed to read answer")?.trim() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => continue,
            },
        }
    }
}
