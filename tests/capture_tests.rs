//! Capture path tests
//!
//! Concurrent writers, the end-to-end capture scenario, and the properties
//! the store must keep across many merges.

use cmdstat::capture::{Capture, CaptureHook, KnownKind, SkipReason};
use cmdstat::report::{query, QueryOptions};
use cmdstat::store::{merge, RecordStore, Store};
use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn record_store(temp_dir: &TempDir) -> RecordStore {
    RecordStore::new(temp_dir.path().join("stats.json")).with_lock_timeout(Duration::from_secs(30))
}

/// Test that concurrent critical sections never lose an update
#[test]
fn test_concurrent_merges_lose_nothing() {
    const WRITERS: usize = 16;

    let temp_dir = TempDir::new().unwrap();
    let store = record_store(&temp_dir);
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let store = store.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store
                    .with_exclusive_access(|s| merge(s, "git", "/shared", "command"))
                    .map(|_| ())
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let loaded = store.load().unwrap();
    let git = loaded.get("git").unwrap();
    assert_eq!(git.count, WRITERS as u64);
    assert_eq!(git.dirs.get("/shared"), Some(&(WRITERS as u64)));
}

/// Test that fire-and-forget captures from many "shells" all land
#[test]
fn test_spawned_hooks_all_recorded() {
    const SHELLS: usize = 8;

    let temp_dir = TempDir::new().unwrap();
    let store = record_store(&temp_dir);

    let handles: Vec<_> = (0..SHELLS)
        .map(|i| {
            let hook = CaptureHook::new(store.clone(), KnownKind("file".into()));
            let dir = if i % 2 == 0 { "/even" } else { "/odd" };
            hook.spawn(format!("make target{i}"), dir.to_string())
        })
        .collect();

    for handle in handles {
        assert!(matches!(handle.join().unwrap(), Capture::Recorded { .. }));
    }

    let loaded = store.load().unwrap();
    let make = loaded.get("make").unwrap();
    assert_eq!(make.count, SHELLS as u64);
    assert_eq!(make.kind, "command");
    assert_eq!(make.dirs.get("/even"), Some(&4));
    assert_eq!(make.dirs.get("/odd"), Some(&4));
}

/// Test the documented scenario through the capture hook and the query engine
#[test]
fn test_capture_then_query_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let store = record_store(&temp_dir);
    let binary = CaptureHook::new(store.clone(), KnownKind("binary".into()));
    let builtin = CaptureHook::new(store.clone(), KnownKind("builtin".into()));

    for _ in 0..3 {
        binary.on_command_entered("git status", "/home/u/proj");
    }
    binary.on_command_entered("git pull", "/home/u");
    builtin.on_command_entered("ls -la", "/home/u");
    binary.on_command_entered("./deploy.sh", "/home/u");
    binary.on_command_entered("/usr/bin/ls", "/home/u");

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 2);

    let git = &loaded.records()[0];
    assert_eq!(git.command, "git");
    assert_eq!(git.count, 4);
    assert_eq!(git.kind, "binary");
    assert_eq!(git.dirs.get("/home/u/proj"), Some(&3));
    assert_eq!(git.dirs.get("/home/u"), Some(&1));

    let ls = &loaded.records()[1];
    assert_eq!(ls.command, "ls");
    assert_eq!(ls.kind, "builtin");
    assert_eq!(ls.count, 1);

    let top = query(
        &loaded,
        &QueryOptions {
            limit: 1,
            ..QueryOptions::default()
        },
    );
    assert_eq!(top.records.len(), 1);
    assert_eq!(top.records[0].command, "git");
}

/// Test that an empty --kind from the shell means "not found"
#[test]
fn test_empty_kind_is_unresolvable() {
    let temp_dir = TempDir::new().unwrap();
    let hook = CaptureHook::new(record_store(&temp_dir), KnownKind(String::new()));

    assert_eq!(
        hook.on_command_entered("typo --flag", "/tmp"),
        Capture::Skipped(SkipReason::Unresolvable)
    );
}

/// Test that count stays the sum of dirs after a long mixed history
#[test]
fn test_count_invariant_after_history() {
    let temp_dir = TempDir::new().unwrap();
    let store = record_store(&temp_dir);
    let hook = CaptureHook::new(store.clone(), KnownKind("command".into()));

    let commands = ["git", "cargo", "ls", "vim", "git", "git", "make"];
    let dirs = ["/a", "/b", "/c"];
    for i in 0..50 {
        let line = format!("{} arg{}", commands[i % commands.len()], i);
        hook.on_command_entered(&line, dirs[i % dirs.len()]);
    }

    let loaded = store.load().unwrap();
    assert_eq!(loaded.total_count(), 50);
    for record in loaded.records() {
        assert_eq!(record.count, record.dirs.values().sum::<u64>());
    }
}

/// Test that loading and saving without events keeps the file byte-identical
#[test]
fn test_zero_events_keep_file_identical() {
    let temp_dir = TempDir::new().unwrap();
    let store = record_store(&temp_dir);
    let mut data = Store::new();
    data = merge(data, "git", "/z", "command");
    data = merge(data, "git", "/a", "command");
    data = merge(data, "ls", "/a", "builtin");
    store.save(&data).unwrap();
    let before = fs::read(store.path()).unwrap();

    store.with_exclusive_access(|s| s).unwrap();

    let after = fs::read(store.path()).unwrap();
    assert_eq!(before, after);
}
