//! # Command Capture
//!
//! The write path of cmdstat, driven by the shell's pre-exec hook through the
//! `cmdstat-hook` binary.

pub mod hook;
pub mod resolver;

pub use hook::{command_name, Capture, CaptureHook, SkipReason};
pub use resolver::{normalize_kind, KnownKind, Resolution, Resolver, ShellResolver};
