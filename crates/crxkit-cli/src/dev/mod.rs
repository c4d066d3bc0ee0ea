//! Development server.
//!
//! [`DevServerBootstrap`] stages the extension once, negotiates a port,
//! starts the HTTP server and the rebuild loop, then idles until a
//! termination signal arrives.
//!
//! - Live reload via Server-Sent Events on [`SSE_PATH`]
//! - Rebuilt artifacts written to the staging directory on disk
//! - File watching with debouncing and a `node_modules` exclusion policy
//! - Error overlay in the browser while the build is failing

pub mod bootstrap;
pub mod error_overlay;
pub mod port;
pub mod server;
pub mod shutdown;
pub mod state;
pub mod urls;
pub mod watch;
pub mod watcher;

pub use bootstrap::{BootstrapOutcome, DevServerBootstrap, ProjectInfo};
pub use port::{choose_port, PortPrompt, TerminalPrompt};
pub use server::{DevServer, ServerHandle};
pub use shutdown::{ShutdownListener, ShutdownSignal};
pub use state::{BuildStatus, DevServerState, SharedState};
pub use urls::{prepare_urls, Urls};
pub use watch::WatchPolicy;
pub use watcher::{FileChange, FileWatcher};

use serde::{Deserialize, Serialize};

/// Server-Sent Events endpoint for live-reload clients.
pub const SSE_PATH: &str = "/__crxkit_sse__";

/// Live-reload client script.
pub const RELOAD_SCRIPT_PATH: &str = "/__crxkit_reload__.js";

/// Events in the dev server lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DevEvent {
    /// Build started
    BuildStarted,

    /// Build completed, possibly with warnings
    BuildCompleted { duration_ms: u64 },

    /// Build failed with error
    BuildFailed { error: String },

    /// Client connected
    ClientConnected { id: usize },
}
