//! Writing report output, through `$PAGER` when it would not fit on screen.

use std::io::{self, IsTerminal, Write};
use std::process::{Command, Stdio};

/// Pager used when `$PAGER` is unset
const DEFAULT_PAGER: &str = "less -R";

/// Terminal size as (columns, rows), 80x24 when not on a terminal
pub fn term_dimensions() -> (usize, usize) {
    crossterm::terminal::size()
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or((80, 24))
}

/// Whether output of `line_count` lines should go through the pager
pub fn needs_pager(line_count: usize, term_height: usize, paging: bool) -> bool {
    paging && line_count > term_height
}

/// Print `output`, paging it when `paging` is allowed, stdout is a terminal
/// and the output is taller than the terminal.
pub fn display(output: &str, paging: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let (_, height) = term_dimensions();

    if needs_pager(output.lines().count(), height, paging && stdout.is_terminal()) {
        match page(output) {
            Ok(()) => return Ok(()),
            Err(e) => tracing::debug!(error = %e, "pager unavailable, printing directly"),
        }
    }

    let mut handle = stdout.lock();
    match handle.write_all(output.as_bytes()).and_then(|()| handle.flush()) {
        // Output piped into `head` and friends
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn page(output: &str) -> io::Result<()> {
    let pager = std::env::var("PAGER")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PAGER.to_string());
    let mut parts = pager.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "empty PAGER"))?;

    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(output.as_bytes()) {
            // The user quit the pager before reading everything
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
            other => other?,
        }
    }
    child.wait()?;
    Ok(())
}
