//! One-line status messages on stderr.

use owo_colors::OwoColorize;
use std::fmt;

/// Severity of a status line, which picks its marker and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

impl Level {
    fn marker(self) -> &'static str {
        match self {
            Level::Success => "✔",
            Level::Info => "ℹ",
            Level::Warning => "⚠",
            Level::Error => "✗",
        }
    }
}

/// A status line ready to print.
struct Status<'a> {
    level: Level,
    message: &'a str,
}

impl fmt::Display for Status<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = self.level.marker();
        match self.level {
            Level::Success => write!(f, "{} {}", marker.green().bold(), self.message),
            Level::Info => write!(f, "{} {}", marker.blue().bold(), self.message),
            Level::Warning => write!(f, "{} {}", marker.yellow().bold(), self.message.yellow()),
            Level::Error => write!(f, "{} {}", marker.red().bold(), self.message.red()),
        }
    }
}

/// Print a status line at `level`.
pub fn status(level: Level, message: &str) {
    eprintln!("{}", Status { level, message });
}

/// Print a success message to stderr.
///
/// ```no_run
/// crxkit_cli::ui::success("Compiled successfully.");
/// ```
pub fn success(message: &str) {
    status(Level::Success, message);
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    status(Level::Info, message);
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    status(Level::Warning, message);
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    status(Level::Error, message);
}
