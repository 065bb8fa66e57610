//! Tracing setup for the two binaries.
//!
//! Both read their filter from `$CMDSTAT_LOG` (e.g. `CMDSTAT_LOG=debug`) and
//! default to `warn`. The report tool logs to stderr; the capture hook must
//! never write to the user's terminal and logs to a daily file instead.

use std::path::Path;

use anyhow::{Context, Result};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "CMDSTAT_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Prefix of the capture hook's daily log files
const HOOK_LOG_PREFIX: &str = "hook.log";

/// Daily hook logs kept; older ones are deleted when the log is opened
const HOOK_LOG_FILES: usize = 7;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to stderr, for the interactive report tool
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Daily rolling appender for the hook log, keeping the last
/// [`HOOK_LOG_FILES`] days.
pub fn hook_appender(log_dir: &Path) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(HOOK_LOG_PREFIX)
        .max_log_files(HOOK_LOG_FILES)
        .build(log_dir)
        .context("Failed to open hook log")
}

/// Log to `<log_dir>/hook.log.<date>`, for the capture hook.
///
/// The returned guard flushes buffered events when dropped and must be kept
/// alive until the process is done logging. Returns `None` when the log
/// directory cannot be created; the hook then runs without logging.
pub fn init_file(log_dir: &Path) -> Option<WorkerGuard> {
    let file_appender = hook_appender(log_dir).ok()?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(non_blocking),
        )
        .try_init()
        .ok()?;

    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn log_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_hook_appender_writes_one_dated_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");

        let mut appender = hook_appender(&log_dir).unwrap();
        appender.write_all(b"dropping command event\n").unwrap();
        appender.flush().unwrap();

        let files = log_files(&log_dir);
        assert_eq!(files.len(), 1);
        assert!(files[0].starts_with("hook.log."));
    }

    #[test]
    fn test_hook_appender_prunes_to_limit() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");
        fs::create_dir_all(&log_dir).unwrap();
        for day in 1..=20 {
            fs::write(log_dir.join(format!("hook.log.2000-01-{day:02}")), "old\n").unwrap();
        }

        let mut appender = hook_appender(&log_dir).unwrap();
        appender.write_all(b"recorded command\n").unwrap();
        appender.flush().unwrap();

        let hook_logs = log_files(&log_dir)
            .into_iter()
            .filter(|name| name.starts_with("hook.log."))
            .count();
        assert!(hook_logs <= HOOK_LOG_FILES);
    }
}
