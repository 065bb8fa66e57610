//! # cmdstat-hook
//!
//! Records one interactively entered command line. Meant to be called from
//! the shell's pre-exec hook, for example in zsh:
//!
//! ```zsh
//! _cmdstat_preexec() {
//!     local cmd=${${(z)1}[1]}
//!     cmdstat-hook --cwd "$PWD" --kind "$(whence -w -- $cmd)" -- "$1"
//! }
//! autoload -Uz add-zsh-hook
//! add-zsh-hook preexec _cmdstat_preexec
//! ```
//!
//! The process re-launches itself detached and exits at once, so the shell
//! never waits on the store lock or the disk. It always exits 0 and never
//! prints anything; problems are written to `<data dir>/logs/hook.log.*`.

use cmdstat::capture::{CaptureHook, KnownKind, ShellResolver};
use cmdstat::config::{self, Config};
use cmdstat::logging;
use cmdstat::store::RecordStore;

use clap::error::ErrorKind;
use clap::Parser;
use std::env;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitCode, Stdio};

/// Record a command line in the cmdstat store
#[derive(Parser, Debug)]
#[command(name = "cmdstat-hook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Record a command line in the cmdstat store", long_about = None)]
struct Args {
    /// Directory the command runs in [default: $PWD]
    #[arg(long, value_name = "DIR")]
    cwd: Option<String>,

    /// How the shell classifies the command (`type -t` / `whence -w` output).
    /// Resolved with bash when omitted; empty means "not found"
    #[arg(long, value_name = "KIND")]
    kind: Option<String>,

    /// Stats file to update
    #[arg(long, value_name = "FILE", env = config::STATS_FILE_ENV)]
    file: Option<PathBuf>,

    /// Record in this process instead of a detached child
    #[arg(long, hide = true)]
    foreground: bool,

    /// The command line as typed
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND LINE"
    )]
    command_line: Vec<String>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => return ExitCode::SUCCESS,
    };

    let Some(cwd) = working_dir(args.cwd.as_deref()) else {
        return ExitCode::SUCCESS;
    };
    let line = args.command_line.join(" ");

    if !args.foreground && detach(&args, &cwd, &line).is_ok() {
        return ExitCode::SUCCESS;
    }

    capture(args, &cwd, &line);
    ExitCode::SUCCESS
}

fn working_dir(explicit: Option<&str>) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| env::var("PWD").ok().filter(|pwd| !pwd.is_empty()))
        .or_else(|| {
            env::current_dir()
                .ok()
                .map(|dir| dir.display().to_string())
        })
}

/// Re-run this binary in the background with `--foreground`.
// The parent exits right away; the orphaned child is reaped by init.
#[allow(clippy::zombie_processes)]
fn detach(args: &Args, cwd: &str, line: &str) -> io::Result<()> {
    let mut command = Command::new(env::current_exe()?);
    command.arg("--foreground").arg("--cwd").arg(cwd);
    if let Some(kind) = &args.kind {
        command.arg("--kind").arg(kind);
    }
    if let Some(file) = &args.file {
        command.arg("--file").arg(file);
    }
    command
        .arg("--")
        .arg(line)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

fn capture(args: Args, cwd: &str, line: &str) {
    let path = match args.file {
        Some(path) => path,
        None => match config::stats_file() {
            Ok(path) => path,
            Err(_) => return,
        },
    };
    let _guard = logging::init_file(&config::log_dir(&path));

    let config = Config::load();
    let store = RecordStore::new(path).with_lock_timeout(config.lock_timeout());

    let outcome = match args.kind {
        Some(kind) => CaptureHook::new(store, KnownKind(kind)).on_command_entered(line, cwd),
        None => CaptureHook::new(store, ShellResolver::default()).on_command_entered(line, cwd),
    };
    tracing::trace!(?outcome, "capture finished");
}
