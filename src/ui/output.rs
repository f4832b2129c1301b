//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Everything the tool prints goes through here, so `--quiet` and
//! `--debug` behave the same across commands. Results go to stdout;
//! warnings, errors and debug traces go to stderr.
//!
//! Tokens must never reach these functions. Use [`redact`] on any text
//! that could echo one back (git stderr, remote error bodies).

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    #[default]
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a success message (respects quiet mode).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Trace one numbered step of a multi-step operation.
pub fn step(index: usize, total: usize, name: &str, verbosity: Verbosity) {
    debug(format!("step {}/{}: {}", index, total, name), verbosity);
}

/// Replace every occurrence of `secret` in `text`.
///
/// Blank secrets leave the text unchanged.
pub fn redact(text: &str, secret: &str) -> String {
    let secret = secret.trim();
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, "[REDACTED]")
}

/// Describe whether a secret value is present without showing it.
pub fn presence(value: &str) -> &'static str {
    if value.trim().is_empty() {
        "(not set)"
    } else {
        "(set)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    #[test]
    fn redact_replaces_all_occurrences() {
        assert_eq!(
            redact("token ghp_abc rejected (ghp_abc)", "ghp_abc"),
            "token [REDACTED] rejected ([REDACTED])"
        );
        assert_eq!(redact("nothing here", "  "), "nothing here");
    }

    #[test]
    fn presence_hides_value() {
        assert_eq!(presence("ghp_abc"), "(set)");
        assert_eq!(presence(" "), "(not set)");
    }
}
