use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::Target;

/// Available crxkit subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a production build and deploy it
    ///
    /// Stages public assets, runs the bundler in production mode, validates
    /// its diagnostics and copies the result plus manifest.json into
    /// `_build/<target>`.
    Build(BuildArgs),

    /// Start the development server
    ///
    /// Stages public assets and the manifest once, then rebuilds on every
    /// source change and writes the artifacts to disk for the browser's
    /// extension loader.
    #[command(alias = "dev")]
    Start(StartArgs),
}

/// Arguments for the build command
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Browser to package for
    #[arg(value_enum, value_name = "TARGET")]
    pub target: Target,

    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Path to crxkit.config.json (defaults to <cwd>/crxkit.config.json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for the start command
#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    /// Browser to develop against
    #[arg(value_enum, value_name = "TARGET")]
    pub target: Target,

    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Path to crxkit.config.json (defaults to <cwd>/crxkit.config.json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
