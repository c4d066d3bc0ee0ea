//! Miette diagnostic conversion for CLI errors.
//!
//! This module provides conversion from CLI errors to miette diagnostics
//! for readable error reporting at the process boundary.

use crate::error::{BuildError, CliError};
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        CliError::Manifest(e) => miette::miette!(
            help = "The manifest is read from src/manifest.yml and written as manifest.json",
            "{}",
            e
        ),
        _ => miette::miette!("{}", err),
    }
}

/// Convert BuildError to miette Report
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::StrictWarnings(warnings) => miette::miette!(
            help = "Most CI servers set CI automatically. Set CI=false to deploy anyway",
            "Treating warnings as errors because CI is set.\n\n{}",
            warnings.join("\n\n")
        ),
        BuildError::CompileErrors(errors) => {
            miette::miette!("Failed to compile.\n\n{}", errors.join("\n\n"))
        }
        _ => miette::miette!("{}", err),
    }
}
