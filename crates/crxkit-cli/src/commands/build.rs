//! Build command implementation.
//!
//! Implements `crxkit build <target>`: one production compile, validated and
//! deployed into `_build/<target>`.

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::compiler::CommandCompiler;
use crate::config::{CrxConfig, ProcessEnv};
use crate::error::Result;
use crate::paths::PathSet;
use crate::pipeline::BuildPipeline;
use crate::ui;
use std::sync::Arc;
use std::time::Instant;

/// Execute the build command.
///
/// # Build Process
///
/// 1. Resolve the project root and load crxkit.config.json
/// 2. Read the process environment once
/// 3. Run the pipeline: stage, compile, validate, deploy, clean up
/// 4. Display the deploy summary
///
/// # Errors
///
/// Returns errors for invalid configuration, compile errors, warnings while
/// `CI` is set, and filesystem failures while staging or deploying.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let start_time = Instant::now();

    let root = utils::resolve_project_root(args.cwd.as_deref())?;
    let config = CrxConfig::load(&root, args.config.as_deref())?;
    config.validate()?;

    let env = ProcessEnv::from_process();
    let paths = PathSet::from_cwd(&root, args.target, &config.layout())?;
    let compiler = Arc::new(CommandCompiler::from_config(
        &config.compiler,
        &paths.app_directory,
    ));

    tracing::debug!(target = %args.target, root = %paths.app_directory.display(), "Starting build");

    let result = BuildPipeline::new(paths, env, args.target, compiler)
        .run()
        .await?;

    ui::print_deploy_summary(
        &result.output_dir,
        result.files_deployed,
        result.bytes,
        start_time.elapsed(),
    );

    Ok(())
}
