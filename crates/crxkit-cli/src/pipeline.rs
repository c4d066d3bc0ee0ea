//! The one-shot production build.
//!
//! ```text
//! Stage ──▶ Compile ──▶ Validate ──▶ Deploy ──▶ Cleanup ──▶ Deployed
//!             │            │
//!             ▼            ▼
//!   Failed(configuration)  Failed(compile errors | strict warnings)
//! ```
//!
//! Steps run strictly in order and each one completes before the next starts.
//! Failures before Deploy leave staging as the compiler wrote it, so it can be
//! inspected. Once Deploy has been attempted, Cleanup always runs and its
//! failure is logged but never changes the outcome.

use crate::compiler::{format_messages, BuildConfiguration, Compiler, Diagnostics};
use crate::config::{ProcessEnv, Target};
use crate::error::{BuildError, Result};
use crate::manifest::{ManifestDocument, WrittenManifest};
use crate::paths::PathSet;
use crate::staging::{self, CopyOptions, CopyStats};
use crate::ui;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Printed after non-fatal warnings.
pub const WARNINGS_HINT: &str =
    "To ignore, add // eslint-disable-next-line to the line before.";

/// What happened to the staging directory after deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    Removed,
    /// Removal failed; the message was logged
    Failed(String),
}

/// A completed deployment.
#[derive(Debug, Clone)]
pub struct DeployResult {
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
    /// Non-fatal warnings reported by the compiler
    pub warnings: Vec<String>,
    /// Files written into the output directory, manifest included
    pub files_deployed: usize,
    pub bytes: u64,
    pub cleanup: CleanupOutcome,
}

/// Decide what a compile attempt's diagnostics mean.
///
/// Returns the warnings to surface when deployment may proceed.
pub fn evaluate(diagnostics: &Diagnostics, strict_warnings: bool) -> Result<Vec<String>, BuildError> {
    if diagnostics.has_errors() {
        return Err(BuildError::CompileErrors(diagnostics.errors.clone()));
    }
    if diagnostics.has_warnings() && strict_warnings {
        return Err(BuildError::StrictWarnings(diagnostics.warnings.clone()));
    }
    Ok(diagnostics.warnings.clone())
}

/// Production build pipeline for one target.
pub struct BuildPipeline {
    paths: PathSet,
    env: ProcessEnv,
    target: Target,
    compiler: Arc<dyn Compiler>,
}

impl BuildPipeline {
    pub fn new(paths: PathSet, env: ProcessEnv, target: Target, compiler: Arc<dyn Compiler>) -> Self {
        Self {
            paths,
            env,
            target,
            compiler,
        }
    }

    /// Run every step once.
    pub async fn run(&self) -> Result<DeployResult> {
        self.stage()?;

        let diagnostics = self.compile().await?;
        let warnings = evaluate(&diagnostics, self.env.strict_warnings)?;

        if warnings.is_empty() {
            ui::success("Compiled successfully.");
        } else {
            ui::print_diagnostics("Compiled with warnings.", &warnings);
            ui::info(WARNINGS_HINT);
        }

        let deployed = self.deploy();
        let cleanup = cleanup(&self.paths.staging).await;
        let (stats, manifest) = deployed?;

        Ok(DeployResult {
            output_dir: self.paths.output.clone(),
            manifest_path: manifest.path,
            warnings,
            files_deployed: stats.files + 1,
            bytes: stats.bytes + manifest.bytes,
            cleanup,
        })
    }

    fn stage(&self) -> Result<()> {
        tracing::debug!(staging = %self.paths.staging.display(), "Staging public assets");
        staging::reset_staging(&self.paths.staging)?;
        staging::copy_tree(&self.paths.public, &self.paths.staging, CopyOptions::default())?;
        Ok(())
    }

    async fn compile(&self) -> Result<Diagnostics> {
        let config = BuildConfiguration::production(&self.paths, &self.env, self.target);
        let spinner = ui::Spinner::new("Creating an optimized production build...");

        match self.compiler.run(&config).await {
            Ok(output) => {
                let diagnostics = format_messages(&output.diagnostics);
                if diagnostics.has_errors() {
                    spinner.fail("Failed to compile.");
                } else {
                    spinner.clear();
                }
                Ok(diagnostics)
            }
            Err(err) => {
                spinner.fail("Failed to compile.");
                Err(err.into())
            }
        }
    }

    /// Load the manifest, copy staging into the output, then write the manifest.
    fn deploy(&self) -> Result<(CopyStats, WrittenManifest)> {
        let manifest = ManifestDocument::load(&self.paths.manifest_source)?;

        let stats = staging::copy_tree(
            &self.paths.staging,
            &self.paths.output,
            CopyOptions::dereferenced(),
        )?;

        let written = manifest.write_to(&self.paths.output)?;

        tracing::info!(
            output = %self.paths.output.display(),
            files = stats.files + 1,
            "Deployed"
        );
        Ok((stats, written))
    }
}

/// Remove the staging directory. Never fails the build.
async fn cleanup(staging: &Path) -> CleanupOutcome {
    match tokio::fs::remove_dir_all(staging).await {
        Ok(()) => {
            tracing::debug!(staging = %staging.display(), "Removed staging directory");
            CleanupOutcome::Removed
        }
        Err(e) => {
            tracing::warn!(staging = %staging.display(), error = %e, "Failed to remove staging directory");
            CleanupOutcome::Failed(e.to_string())
        }
    }
}
