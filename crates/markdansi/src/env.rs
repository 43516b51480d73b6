//! Environment snapshot and terminal capability detection.
//!
//! The renderer never reads process state itself. [`Environment::detect`] is
//! called once at the program boundary and the resulting value is threaded into
//! option resolution, so tests can build any environment they need.

use std::collections::HashMap;
use std::io::IsTerminal;

/// Terminal programs known to understand OSC-8 hyperlinks.
const HYPERLINK_PROGRAMS: [&str; 3] = ["iTerm.app", "WezTerm", "Hyper"];

/// A snapshot of the process environment relevant to rendering defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// Environment variables.
    pub vars: HashMap<String, String>,
    /// Whether stdout is attached to a terminal.
    pub stdout_is_tty: bool,
    /// Terminal column count, when known.
    pub columns: Option<usize>,
}

impl Environment {
    /// An empty environment: no variables, not a TTY, unknown width.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment.
    ///
    /// The width comes from the terminal when stdout is one, else from
    /// `COLUMNS`.
    #[must_use]
    pub fn detect() -> Self {
        let vars: HashMap<String, String> = std::env::vars().collect();
        let stdout_is_tty = std::io::stdout().is_terminal();
        let tty_columns = if stdout_is_tty {
            crossterm::terminal::size()
                .ok()
                .map(|(cols, _rows)| usize::from(cols))
                .filter(|&cols| cols > 0)
        } else {
            None
        };
        let columns = tty_columns.or_else(|| {
            vars.get("COLUMNS")
                .and_then(|c| c.trim().parse::<usize>().ok())
                .filter(|&cols| cols > 0)
        });
        tracing::debug!(
            markdansi.tty = stdout_is_tty,
            markdansi.columns = ?columns,
            "Environment detected"
        );
        Self {
            vars,
            stdout_is_tty,
            columns,
        }
    }

    /// Sets a variable.
    #[must_use]
    pub fn var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Sets whether stdout is a terminal.
    #[must_use]
    pub fn tty(mut self, is_tty: bool) -> Self {
        self.stdout_is_tty = is_tty;
        self
    }

    /// Sets the terminal width.
    #[must_use]
    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Best-effort detection of OSC-8 hyperlink support.
    #[must_use]
    pub fn supports_hyperlinks(&self) -> bool {
        if !self.stdout_is_tty {
            return false;
        }
        if self.get("FORCE_HYPERLINK") == Some("1") {
            return true;
        }
        if self.get("NO_COLOR").is_some() {
            return false;
        }
        if self.get("WT_SESSION").is_some() {
            return true;
        }
        if self
            .get("TERM_PROGRAM")
            .is_some_and(|prog| HYPERLINK_PROGRAMS.contains(&prog))
        {
            return true;
        }
        if ["DOMTERM", "VTE_VERSION", "KONSOLE_VERSION"]
            .iter()
            .any(|key| self.get(key).is_some())
        {
            return true;
        }
        if let Some(term) = self.get("TERM").map(str::to_lowercase) {
            if term.contains("xterm-kitty") || term.contains("wezterm") {
                return true;
            }
            if term.contains("vte") && self.get("COLORTERM") == Some("truecolor") {
                return true;
            }
            if term.contains("screen") && self.get("TERM_PROGRAM") == Some("tmux") {
                return true;
            }
        }
        false
    }
}

/// Wrap `text` as an OSC-8 hyperlink to `url`.
///
/// ```rust
/// assert_eq!(
///     markdansi::env::osc8("https://example.com", "x"),
///     "\x1b]8;;https://example.com\x07x\x1b]8;;\x07"
/// );
/// ```
#[must_use]
pub fn osc8(url: &str, text: &str) -> String {
    format!("\x1b]8;;{url}\x07{text}\x1b]8;;\x07")
}
