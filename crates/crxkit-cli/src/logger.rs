//! Logging infrastructure for the crxkit CLI.
//!
//! Structured logging on top of the `tracing` ecosystem. Operator-facing
//! status lines go through [`crate::ui`]; this subscriber carries the
//! diagnostic stream (`debug!` step transitions, `warn!` for best-effort
//! failures such as staging cleanup).
//!
//! # Example
//!
//! ```rust,no_run
//! use crxkit_cli::logger::init_logger;
//! use tracing::{debug, info};
//!
//! init_logger(false, false, false);
//!
//! info!("Starting build");
//! debug!(step = "stage", "Staging public assets");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "crxkit=debug,crxkit_cli=debug";
const QUIET_FILTER: &str = "crxkit_cli=error";
const DEFAULT_FILTER: &str = "crxkit_cli=info";

/// Initialize the tracing subscriber with the specified options.
///
/// Must be called once at the start of the program, before any logging.
///
/// The filter is chosen in this order:
/// 1. `--verbose`: DEBUG for crxkit crates
/// 2. `--quiet`: ERROR only
/// 3. `RUST_LOG` environment variable
/// 4. INFO for crxkit crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize logger with custom environment filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    // try_init: integration tests may race to install a subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Check if colored output should be enabled.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal capabilities decide.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::Term::stderr().features().colors_supported()
}
