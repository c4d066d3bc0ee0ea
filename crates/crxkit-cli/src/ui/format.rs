//! Formatting utilities for sizes, durations, and the deploy summary.

use console::Term;
use owo_colors::OwoColorize;
use std::path::Path;
use std::time::Duration;

/// Format a byte count with the largest fitting unit (B, KB, MB, GB).
///
/// # Examples
///
/// ```
/// use crxkit_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.2} {}", size, UNITS[unit])
    }
}

/// Format a duration as `ms`, fractional seconds, or `Xm Ys`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use crxkit_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print the summary block shown after a successful deployment.
pub fn print_deploy_summary(output_dir: &Path, files: usize, bytes: u64, elapsed: Duration) {
    let width = (Term::stderr().size().1 as usize).min(60);

    eprintln!();
    eprintln!("{}", "Deployment Summary".bold().underline());
    eprintln!("{}", "─".repeat(width));
    eprintln!("  {} {}", "▸".blue(), output_dir.display().bright_white().bold());
    eprintln!(
        "  {} {} files, {} (manifest.json included)",
        "▸".blue(),
        files,
        format_size(bytes)
    );
    eprintln!("{}", "─".repeat(width));
    eprintln!(
        "  {} {}",
        "Done in".bold(),
        format_duration(elapsed).green()
    );
}
