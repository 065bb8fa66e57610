//! # Capture Hook
//!
//! Turns one interactively entered command line into one store update.
//!
//! ## Eligibility
//!
//! Only the first word of the line counts. It is skipped when it is empty,
//! when it is an explicit path (`/usr/bin/ls`, `./deploy.sh`), or when the
//! resolver does not know it. Otherwise any leading directories are
//! stripped (`bin/tool` → `tool`) and the bare name is merged into the store
//! under the store lock.
//!
//! ## Failure Policy
//!
//! The hook runs before every command the user types, so it never returns
//! an error: lock timeouts, I/O failures and corrupt stores are logged and
//! the event is dropped.

use std::thread::{self, JoinHandle};

use super::resolver::{Resolution, Resolver};
use crate::store::{merge, RecordStore};

/// Why an event was not recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyLine,
    ExplicitPath,
    Unresolvable,
}

/// What happened to one captured command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    Recorded { command: String, kind: String },
    Skipped(SkipReason),
    /// Eligible, but the store could not be updated
    Dropped,
}

/// Extract the bare command name from a command line.
pub fn command_name(raw_command_line: &str) -> Result<&str, SkipReason> {
    let token = raw_command_line
        .split_whitespace()
        .next()
        .ok_or(SkipReason::EmptyLine)?;

    if token.starts_with('/') || token.starts_with("./") {
        return Err(SkipReason::ExplicitPath);
    }

    let name = token.rsplit('/').next().unwrap_or(token);
    if name.is_empty() {
        return Err(SkipReason::EmptyLine);
    }
    Ok(name)
}

/// Records command lines into a [`RecordStore`]
#[derive(Debug, Clone)]
pub struct CaptureHook<R> {
    store: RecordStore,
    resolver: R,
}

impl<R: Resolver> CaptureHook<R> {
    pub fn new(store: RecordStore, resolver: R) -> Self {
        Self { store, resolver }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Record `raw_command_line` as run from `cwd`. Never fails.
    pub fn on_command_entered(&self, raw_command_line: &str, cwd: &str) -> Capture {
        let command = match command_name(raw_command_line) {
            Ok(command) => command,
            Err(reason) => {
                tracing::debug!(?reason, "skipping command line");
                return Capture::Skipped(reason);
            }
        };

        let kind = match self.resolver.resolve(command) {
            Resolution::Resolved(kind) => kind,
            Resolution::Unresolvable => {
                tracing::debug!(command, "skipping unresolvable command");
                return Capture::Skipped(SkipReason::Unresolvable);
            }
        };

        match self
            .store
            .with_exclusive_access(|store| merge(store, command, cwd, &kind))
        {
            Ok(_) => {
                tracing::debug!(command, kind = %kind, cwd, "recorded command");
                Capture::Recorded {
                    command: command.to_string(),
                    kind,
                }
            }
            Err(e) => {
                tracing::warn!(command, error = %e, "dropping command event");
                Capture::Dropped
            }
        }
    }
}

impl<R: Resolver + Send + 'static> CaptureHook<R> {
    /// Record the command line on a background thread.
    ///
    /// The caller may drop the handle; the event is then fire-and-forget and
    /// its outcome is only visible in the logs.
    pub fn spawn(self, raw_command_line: String, cwd: String) -> JoinHandle<Capture> {
        thread::spawn(move || self.on_command_entered(&raw_command_line, &cwd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::resolver::KnownKind;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Resolves every name except `missing`
    struct FakeResolver;

    impl Resolver for FakeResolver {
        fn resolve(&self, name: &str) -> Resolution {
            match name {
                "missing" => Resolution::Unresolvable,
                _ => Resolution::Resolved("command".to_string()),
            }
        }
    }

    fn hook_in(temp_dir: &TempDir) -> CaptureHook<FakeResolver> {
        CaptureHook::new(
            RecordStore::new(temp_dir.path().join("stats.json")),
            FakeResolver,
        )
    }

    #[test]
    fn test_command_name() {
        assert_eq!(command_name("git status -s"), Ok("git"));
        assert_eq!(command_name("   ls"), Ok("ls"));
        assert_eq!(command_name("bin/tool --flag"), Ok("tool"));
        assert_eq!(command_name("../scripts/run.sh"), Ok("run.sh"));
        assert_eq!(command_name(""), Err(SkipReason::EmptyLine));
        assert_eq!(command_name(" \t "), Err(SkipReason::EmptyLine));
        assert_eq!(command_name("dir/"), Err(SkipReason::EmptyLine));
    }

    #[test]
    fn test_explicit_paths_are_skipped() {
        assert_eq!(command_name("./deploy.sh prod"), Err(SkipReason::ExplicitPath));
        assert_eq!(command_name("/usr/bin/ls -la"), Err(SkipReason::ExplicitPath));
    }

    #[test]
    fn test_records_eligible_command() {
        let temp_dir = TempDir::new().unwrap();
        let hook = hook_in(&temp_dir);

        let outcome = hook.on_command_entered("git commit -m wip", "/home/u/proj");
        assert_eq!(
            outcome,
            Capture::Recorded {
                command: "git".into(),
                kind: "command".into()
            }
        );

        let store = hook.store().load().unwrap();
        let git = store.get("git").unwrap();
        assert_eq!(git.count, 1);
        assert_eq!(git.dirs.get("/home/u/proj"), Some(&1));
    }

    #[test]
    fn test_path_invocations_never_reach_store() {
        let temp_dir = TempDir::new().unwrap();
        let hook = hook_in(&temp_dir);

        assert_eq!(
            hook.on_command_entered("./deploy.sh", "/srv"),
            Capture::Skipped(SkipReason::ExplicitPath)
        );
        assert_eq!(
            hook.on_command_entered("/usr/bin/ls", "/srv"),
            Capture::Skipped(SkipReason::ExplicitPath)
        );
        assert!(!hook.store().path().exists());
    }

    #[test]
    fn test_unresolvable_command_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let hook = hook_in(&temp_dir);

        assert_eq!(
            hook.on_command_entered("missing --help", "/srv"),
            Capture::Skipped(SkipReason::Unresolvable)
        );
        assert!(!hook.store().path().exists());
    }

    #[test]
    fn test_corrupt_store_drops_event() {
        let temp_dir = TempDir::new().unwrap();
        let hook = hook_in(&temp_dir);
        fs::write(hook.store().path(), "{ not a list").unwrap();

        assert_eq!(hook.on_command_entered("git", "/srv"), Capture::Dropped);
        let on_disk = fs::read_to_string(hook.store().path()).unwrap();
        assert_eq!(on_disk, "{ not a list");
    }

    #[test]
    fn test_lock_timeout_drops_event() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("stats.json"))
            .with_lock_timeout(Duration::from_millis(30));
        let _held = crate::store::StoreLock::acquire(&store.lock_path(), Duration::from_secs(1))
            .unwrap();
        let hook = CaptureHook::new(store, KnownKind("alias".into()));

        assert_eq!(hook.on_command_entered("ll", "/srv"), Capture::Dropped);
    }

    #[test]
    fn test_spawned_capture_records() {
        let temp_dir = TempDir::new().unwrap();
        let hook = hook_in(&temp_dir);
        let store = hook.store().clone();

        let outcome = hook
            .spawn("cargo test".to_string(), "/work".to_string())
            .join()
            .unwrap();

        assert!(matches!(outcome, Capture::Recorded { .. }));
        assert_eq!(store.load().unwrap().get("cargo").map(|r| r.count), Some(1));
    }
}
