//! Terminal UI utilities for status lines, spinners and diagnostics.
//!
//! Everything here writes to stderr so that stdout stays free for machine
//! readable output. Environment detection (TTY, `NO_COLOR`, `FORCE_COLOR`)
//! degrades the output gracefully when terminal features are missing.
//!
//! # Examples
//!
//! ```no_run
//! use crxkit_cli::ui;
//!
//! ui::init_colors_with(ui::should_use_color());
//!
//! let spinner = ui::Spinner::new("Creating an optimized production build...");
//! spinner.clear();
//!
//! ui::success("Compiled successfully.");
//! ui::print_diagnostics("Compiled with warnings.", &["unused import".to_string()]);
//! ```

mod format;
mod messages;
mod spinner;

pub use format::{format_duration, format_size, print_deploy_summary};
pub use messages::{error, info, status, success, warning, Level};
pub use spinner::Spinner;

use owo_colors::OwoColorize;

/// Whether stdout is attached to an interactive terminal.
///
/// Port negotiation only prompts, and the console is only cleared, when this
/// returns `true`.
pub fn is_interactive() -> bool {
    console::Term::stdout().is_term()
}

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR, falls back to terminal detection.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::user_attended_stderr()
}

/// Turn colors on or off for `console` and the spinner templates.
pub fn init_colors_with(enabled: bool) {
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}

/// Clear the terminal before the first compile messages appear.
pub fn clear_console() {
    let _ = console::Term::stdout().clear_screen();
}

/// Print a titled block of compiler diagnostics.
///
/// Messages are separated by a blank line, matching how bundlers print
/// multi-line diagnostics.
pub fn print_diagnostics(title: &str, messages: &[String]) {
    eprintln!();
    eprintln!("{}", title.bold());
    eprintln!();
    for message in messages {
        eprintln!("{}\n", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_diagnostics_empty() {
        print_diagnostics("Compiled successfully!", &[]);
    }

    #[test]
    fn test_print_diagnostics_multiple() {
        print_diagnostics(
            "Compiled with warnings.",
            &["first".to_string(), "second\nline".to_string()],
        );
    }

    #[test]
    fn test_init_colors_with() {
        init_colors_with(false);
        assert!(!console::colors_enabled_stderr());
        init_colors_with(true);
    }
}
