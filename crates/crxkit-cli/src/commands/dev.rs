//! Development server command implementation.
//!
//! Implements `crxkit start <target>`. The lifecycle itself lives in
//! [`crate::dev::DevServerBootstrap`]; this layer only gathers its inputs.

use crate::cli::StartArgs;
use crate::commands::utils;
use crate::compiler::CommandCompiler;
use crate::config::{CrxConfig, ProcessEnv};
use crate::dev::{BootstrapOutcome, DevServerBootstrap, TerminalPrompt};
use crate::error::Result;
use crate::paths::PathSet;
use crate::ui;
use std::sync::Arc;

/// Execute the start command.
///
/// Returns `Ok(())` both after a signal-driven shutdown and when no port
/// could be used.
pub async fn execute(args: StartArgs) -> Result<()> {
    let root = utils::resolve_project_root(args.cwd.as_deref())?;
    let config = CrxConfig::load(&root, args.config.as_deref())?;
    config.validate()?;

    let env = ProcessEnv::from_process();
    let paths = PathSet::from_cwd(&root, args.target, &config.layout())?;
    let project = utils::project_info(&paths);
    let compiler = Arc::new(CommandCompiler::from_config(
        &config.compiler,
        &paths.app_directory,
    ));

    let mut bootstrap = DevServerBootstrap::new(paths, env, args.target, compiler)
        .debounce_ms(config.debounce_ms)
        .project(project);

    if ui::is_interactive() {
        bootstrap = bootstrap.interactive(TerminalPrompt);
    }

    match bootstrap.run().await? {
        BootstrapOutcome::PortDeclined => tracing::debug!("Dev server not started"),
        BootstrapOutcome::Stopped(signal) => tracing::debug!(%signal, "Dev server stopped"),
    }

    Ok(())
}
