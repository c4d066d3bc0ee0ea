//! crxkit - build, deploy and develop multi-entry browser extensions.
//!
//! This crate drives an external bundler for a browser extension with several
//! entry points, validates what it reports and turns the result into a
//! loadable package for Firefox or Chrome.
//!
//! # Architecture
//!
//! - [`paths`] - Every project location, resolved once from the root
//! - [`manifest`] - `src/manifest.yml` to `manifest.json`
//! - [`staging`] - Staging reset and tree copies
//! - [`compiler`] - The bundler contract, its configuration and diagnostics
//! - [`pipeline`] - Production build: stage, compile, validate, deploy, clean up
//! - [`dev`] - Development server with live reload
//! - [`config`] - Project config file and process environment
//! - [`error`] - Error types with actionable messages
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```rust,no_run
//! use crxkit_cli::compiler::CommandCompiler;
//! use crxkit_cli::config::{Layout, ProcessEnv, Target};
//! use crxkit_cli::paths::PathSet;
//! use crxkit_cli::pipeline::BuildPipeline;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn run() -> crxkit_cli::Result<()> {
//! let paths = PathSet::from_cwd(Path::new("."), Target::Firefox, &Layout::default())?;
//! let compiler = Arc::new(CommandCompiler::new("npx", vec!["webpack".into()], &paths.app_directory));
//! let result = BuildPipeline::new(paths, ProcessEnv::from_process(), Target::Firefox, compiler)
//!     .run()
//!     .await?;
//! println!("deployed to {}", result.output_dir.display());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod compiler;
pub mod config;
pub mod dev;
pub mod error;
pub mod logger;
pub mod manifest;
pub mod paths;
pub mod pipeline;
pub mod staging;
pub mod ui;

pub use error::{BuildError, CliError, ConfigError, Result, ResultExt};
