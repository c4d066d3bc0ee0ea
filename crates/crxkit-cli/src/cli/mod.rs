//! Command-line interface definition for crxkit.
//!
//! Uses clap v4's derive macros. The dispatcher is deliberately small: pick a
//! browser target, then either build-and-deploy or start the dev server.
//!
//! # Command Structure
//!
//! - `crxkit build <firefox|chrome>` - Production build, validation and deploy
//! - `crxkit start <firefox|chrome>` - Development server with live reload

mod commands;
pub mod enums;

use clap::Parser;

pub use commands::{BuildArgs, Command, StartArgs};
pub use enums::*;

/// crxkit - build and deploy multi-entry browser extensions
#[derive(Parser, Debug)]
#[command(
    name = "crxkit",
    version,
    about = "Build, deploy and develop multi-entry browser extensions",
    long_about = "crxkit drives the extension bundler, validates its diagnostics and\n\
                  materializes a deployable package (public assets, compiled entry points\n\
                  and a generated manifest.json) for Firefox or Chrome."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
