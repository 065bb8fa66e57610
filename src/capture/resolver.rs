//! # Command Resolution
//!
//! Classifies a bare command name the way the shell would run it.
//!
//! Aliases and functions only exist inside the interactive shell, so the
//! shell hook normally passes the classification it already computed
//! (`type -t` in bash, `whence -w` in zsh) and [`KnownKind`] just normalizes
//! it. [`ShellResolver`] asks a fresh `bash` when no classification was
//! given; it can only see builtins, keywords and `$PATH` commands.

use std::process::{Command, Stdio};

/// Outcome of resolving a command name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The command exists; holds its kind (`command`, `alias`, `builtin`, ...)
    Resolved(String),
    /// The shell does not know the name; such commands are never recorded
    Unresolvable,
}

/// Something that can classify command names
pub trait Resolver {
    fn resolve(&self, name: &str) -> Resolution;
}

/// Normalize a shell's classification output.
///
/// Accepts bash `type -t` words (`file`, `keyword`, ...) and zsh
/// `whence -w` lines (`ls: command`). `file` becomes `command` and
/// `keyword` becomes `reserved` so both shells report the same kinds.
pub fn normalize_kind(raw: &str) -> Resolution {
    let line = raw.lines().next().unwrap_or("").trim();
    let word = match line.rsplit_once(": ") {
        Some((_, kind)) => kind.trim(),
        None => line,
    };

    match word.to_lowercase().as_str() {
        "" | "none" | "not found" => Resolution::Unresolvable,
        "file" | "hashed" => Resolution::Resolved("command".to_string()),
        "keyword" => Resolution::Resolved("reserved".to_string()),
        other => Resolution::Resolved(other.to_string()),
    }
}

/// A classification the caller already knows
#[derive(Debug, Clone)]
pub struct KnownKind(pub String);

impl Resolver for KnownKind {
    fn resolve(&self, _name: &str) -> Resolution {
        normalize_kind(&self.0)
    }
}

/// Resolves names by running `type -t` in a non-interactive shell
#[derive(Debug, Clone)]
pub struct ShellResolver {
    shell: String,
}

impl ShellResolver {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellResolver {
    fn default() -> Self {
        Self::new("bash")
    }
}

impl Resolver for ShellResolver {
    fn resolve(&self, name: &str) -> Resolution {
        // The name is passed as $1, never interpolated into the script
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(r#"type -t -- "$1""#)
            .arg(&self.shell)
            .arg(name)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(output) if output.status.success() => {
                normalize_kind(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(_) => Resolution::Unresolvable,
            Err(e) => {
                tracing::warn!(shell = %self.shell, error = %e, "failed to run resolver shell");
                Resolution::Unresolvable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bash_words() {
        assert_eq!(normalize_kind("file\n"), Resolution::Resolved("command".into()));
        assert_eq!(normalize_kind("alias"), Resolution::Resolved("alias".into()));
        assert_eq!(normalize_kind("builtin"), Resolution::Resolved("builtin".into()));
        assert_eq!(normalize_kind("keyword"), Resolution::Resolved("reserved".into()));
        assert_eq!(normalize_kind(""), Resolution::Unresolvable);
        assert_eq!(normalize_kind("  \n"), Resolution::Unresolvable);
    }

    #[test]
    fn test_normalize_zsh_whence() {
        assert_eq!(normalize_kind("ls: command"), Resolution::Resolved("command".into()));
        assert_eq!(normalize_kind("ll: alias"), Resolution::Resolved("alias".into()));
        assert_eq!(normalize_kind("nope: none"), Resolution::Unresolvable);
    }

    #[test]
    fn test_known_kind_ignores_name() {
        let resolver = KnownKind("function".to_string());
        assert_eq!(resolver.resolve("anything"), Resolution::Resolved("function".into()));
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_resolver_builtin_and_missing() {
        let resolver = ShellResolver::default();
        assert_eq!(resolver.resolve("cd"), Resolution::Resolved("builtin".into()));
        assert_eq!(
            resolver.resolve("definitely-not-a-command-4f9a"),
            Resolution::Unresolvable
        );
    }

    #[test]
    fn test_shell_resolver_missing_shell() {
        let resolver = ShellResolver::new("/nonexistent/shell");
        assert_eq!(resolver.resolve("ls"), Resolution::Unresolvable);
    }
}
