//! Dev server lifecycle.
//!
//! ```text
//! Stage ──▶ Negotiate port ──▶ Configure ──▶ Serve ──▶ Idle ──▶ Close
//!                 │
//!                 ▼
//!           PortDeclined (no server, exit 0)
//! ```
//!
//! The bootstrap owns the listening socket and the watch subscriptions for
//! its whole lifetime. Closing happens exactly once, when the shutdown future
//! resolves.

use crate::compiler::{format_messages, BuildConfiguration, Compiler};
use crate::config::{default_debounce_ms, ProcessEnv, Target};
use crate::dev::port::{self, PortPrompt};
use crate::dev::server::DevServer;
use crate::dev::shutdown::{ShutdownListener, ShutdownSignal};
use crate::dev::state::{DevServerState, SharedState};
use crate::dev::urls::{prepare_urls, Urls};
use crate::dev::watch::WatchPolicy;
use crate::dev::watcher::{FileChange, FileWatcher};
use crate::dev::DevEvent;
use crate::error::{CliError, Result};
use crate::manifest;
use crate::paths::PathSet;
use crate::pipeline::WARNINGS_HINT;
use crate::staging::{self, CopyOptions};
use crate::ui;
use owo_colors::OwoColorize;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// What the operator sees in the "Compiled successfully!" banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    /// Package name from `package.json`
    pub name: String,
    /// Command that creates a production build, e.g. `yarn build`
    pub build_command: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            name: "the extension".to_string(),
            build_command: "npm run build".to_string(),
        }
    }
}

/// How a dev server run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The desired port was taken and no alternative was accepted; nothing
    /// was started
    PortDeclined,
    /// The server ran and was closed after this signal
    Stopped(ShutdownSignal),
}

/// Stages the extension, starts the dev server and keeps it rebuilding.
pub struct DevServerBootstrap {
    paths: PathSet,
    env: ProcessEnv,
    target: Target,
    compiler: Arc<dyn Compiler>,
    prompt: Option<Arc<dyn PortPrompt + Send + Sync>>,
    interactive: bool,
    debounce_ms: u64,
    project: ProjectInfo,
}

impl DevServerBootstrap {
    /// A non-interactive bootstrap: an occupied port ends the run.
    pub fn new(paths: PathSet, env: ProcessEnv, target: Target, compiler: Arc<dyn Compiler>) -> Self {
        Self {
            paths,
            env,
            target,
            compiler,
            prompt: None,
            interactive: false,
            debounce_ms: default_debounce_ms(),
            project: ProjectInfo::default(),
        }
    }

    /// Ask through `prompt` before moving to another port, and clear the
    /// console once the server is up.
    pub fn interactive<P>(mut self, prompt: P) -> Self
    where
        P: PortPrompt + Send + Sync + 'static,
    {
        self.prompt = Some(Arc::new(prompt));
        self.interactive = true;
        self
    }

    pub fn debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn project(mut self, project: ProjectInfo) -> Self {
        self.project = project;
        self
    }

    /// Run until SIGINT or SIGTERM.
    ///
    /// The handlers are installed before anything is staged or bound, so an
    /// early signal still ends in a single orderly close.
    pub async fn run(self) -> Result<BootstrapOutcome> {
        let listener = ShutdownListener::install();
        self.run_until(listener.wait()).await
    }

    /// Run until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> Result<BootstrapOutcome>
    where
        F: Future<Output = ShutdownSignal>,
    {
        self.stage()?;

        let chosen = self.negotiate_port().await?;
        let Some(port) = chosen else {
            tracing::debug!(port = self.env.port, "No usable port, not starting");
            return Ok(BootstrapOutcome::PortDeclined);
        };

        let urls = prepare_urls(self.env.protocol(), &self.env.host, port);
        let policy = WatchPolicy::new(&self.paths.src);
        let config = BuildConfiguration::development(
            &self.paths,
            &self.env,
            self.target,
            &urls,
            &policy,
        );

        let addr = port::resolve_addr(&self.env.host, port)?;
        let state: SharedState = Arc::new(DevServerState::new(self.paths.staging.clone()));
        let handle = DevServer::bind(addr, state.clone()).await?.serve()?;

        if self.interactive {
            ui::clear_console();
        }
        ui::info("Starting the development server...");

        let (watcher, changes) = match FileWatcher::new(
            vec![self.paths.src.clone(), self.paths.public.clone()],
            policy,
            self.debounce_ms,
        ) {
            Ok(watching) => watching,
            Err(e) => {
                handle.close().await?;
                return Err(e);
            }
        };

        let rebuild = RebuildLoop {
            compiler: self.compiler.clone(),
            config,
            state,
            public: self.paths.public.clone(),
            staging: self.paths.staging.clone(),
            urls,
            project: self.project.clone(),
        };
        let rebuild_task = tokio::spawn(rebuild.run(changes));

        let signal = shutdown.await;
        tracing::debug!(%signal, "Shutting down dev server");

        rebuild_task.abort();
        let _ = rebuild_task.await;
        drop(watcher);
        handle.close().await?;

        Ok(BootstrapOutcome::Stopped(signal))
    }

    /// Probing and prompting block, so they run on the blocking pool.
    async fn negotiate_port(&self) -> Result<Option<u16>> {
        let host = self.env.host.clone();
        let desired = self.env.port;
        let prompt = self.prompt.clone();

        tokio::task::spawn_blocking(move || {
            let prompt = prompt.as_deref().map(|p| p as &dyn PortPrompt);
            port::choose_port(&host, desired, prompt)
        })
        .await
        .map_err(|e| CliError::Server(format!("Port negotiation failed: {}", e)))?
    }

    /// Public assets and the manifest are staged once, before the server starts.
    fn stage(&self) -> Result<()> {
        staging::reset_staging(&self.paths.staging)?;
        staging::copy_tree(&self.paths.public, &self.paths.staging, CopyOptions::default())?;
        manifest::generate(&self.paths.manifest_source, &self.paths.staging)?;
        Ok(())
    }
}

/// Recompiles on every burst of file changes.
struct RebuildLoop {
    compiler: Arc<dyn Compiler>,
    config: BuildConfiguration,
    state: SharedState,
    public: PathBuf,
    staging: PathBuf,
    urls: Urls,
    project: ProjectInfo,
}

impl RebuildLoop {
    async fn run(self, mut changes: mpsc::Receiver<FileChange>) {
        self.build().await;

        while let Some(change) = changes.recv().await {
            tracing::debug!(path = %change.path().display(), "File changed");
            let mut recopy = change.path().starts_with(&self.public);

            // Coalesce whatever else arrived during the last build.
            while let Ok(next) = changes.try_recv() {
                recopy |= next.path().starts_with(&self.public);
            }

            if recopy {
                if let Err(e) = staging::copy_tree(&self.public, &self.staging, CopyOptions::default()) {
                    ui::warning(&format!("Failed to copy public assets: {}", e));
                }
            }

            self.build().await;
        }
    }

    async fn build(&self) {
        self.state.start_build();
        self.state.broadcast(&DevEvent::BuildStarted);
        ui::info("Compiling...");

        let started = Instant::now();
        let event = match self.compiler.run(&self.config).await {
            Ok(output) => {
                let diagnostics = format_messages(&output.diagnostics);
                let duration_ms = started.elapsed().as_millis() as u64;

                if diagnostics.has_errors() {
                    ui::print_diagnostics("Failed to compile.", &diagnostics.errors);
                    let error = diagnostics.errors.join("\n\n");
                    self.state.fail_build(error.clone());
                    DevEvent::BuildFailed { error }
                } else {
                    if diagnostics.has_warnings() {
                        ui::print_diagnostics("Compiled with warnings.", &diagnostics.warnings);
                        ui::info(WARNINGS_HINT);
                    } else {
                        print_instructions(&self.project, &self.urls);
                    }
                    self.state
                        .complete_build(duration_ms, diagnostics.warnings.len());
                    DevEvent::BuildCompleted { duration_ms }
                }
            }
            Err(e) => {
                let error = e.to_string();
                ui::print_diagnostics("Failed to compile.", std::slice::from_ref(&error));
                self.state.fail_build(error.clone());
                DevEvent::BuildFailed { error }
            }
        };

        self.state.broadcast(&event);
    }
}

fn print_instructions(project: &ProjectInfo, urls: &Urls) {
    ui::success("Compiled successfully!");
    eprintln!();
    eprintln!("You can now view {} in the browser.", project.name.bold());
    eprintln!();

    match &urls.lan {
        Some(lan) => {
            eprintln!("  {}         {}", "Local:".bold(), urls.local);
            eprintln!("  {} {}", "On Your Network:".bold(), lan);
        }
        None => eprintln!("  {}", urls.local),
    }

    eprintln!();
    eprintln!("Note that the development build is not optimized.");
    eprintln!(
        "To create a production build, use {}.",
        project.build_command.cyan()
    );
    eprintln!();
}
