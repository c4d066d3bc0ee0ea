//! The bundler seam.
//!
//! crxkit never bundles anything itself. A [`Compiler`] takes a
//! [`BuildConfiguration`], writes artifacts into the configured output
//! directory, and reports [`Diagnostics`]. The production implementation is
//! [`CommandCompiler`], which shells out to the project's bundler; tests plug
//! in scripted implementations.

pub mod command;
pub mod config;
pub mod messages;

pub use command::{CommandCompiler, BUILD_CONFIG_ENV};
pub use config::{BuildConfiguration, BuildOptions, HtmlPage, Mode};
pub use messages::format_messages;

use crate::error::{BuildError, CliError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors and warnings from one compile attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self { errors, warnings }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Result of a compile attempt that produced diagnostics.
#[derive(Debug, Clone, Default)]
pub struct CompileOutput {
    pub diagnostics: Diagnostics,
    /// Raw bundler statistics, if the bundler reported any
    pub stats: Option<serde_json::Value>,
}

impl From<Diagnostics> for CompileOutput {
    fn from(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics,
            stats: None,
        }
    }
}

/// The compiler could not produce output at all.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Bad configuration, missing executable, unreadable stats
    #[error("{0}")]
    Configuration(String),
}

impl From<CompileError> for BuildError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::Configuration(message) => BuildError::Configuration(message),
        }
    }
}

impl From<CompileError> for CliError {
    fn from(err: CompileError) -> Self {
        CliError::Build(err.into())
    }
}

/// A bundler that can be driven by the build pipeline and the dev server.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Run one compilation.
    ///
    /// Returns `Ok` whenever the bundler ran, even if it reported errors;
    /// `Err` only when no output could be produced.
    async fn run(&self, config: &BuildConfiguration) -> Result<CompileOutput, CompileError>;
}
