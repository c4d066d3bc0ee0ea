//! Termination signals for the dev server.

use std::fmt;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Which signal ended the dev server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Interrupt => f.write_str("SIGINT"),
            ShutdownSignal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Interrupt and terminate handlers, registered when the listener is built.
///
/// A signal delivered between [`ShutdownListener::install`] and
/// [`ShutdownListener::wait`] is buffered rather than killing the process.
/// Must be created inside a tokio runtime.
pub struct ShutdownListener {
    #[cfg(unix)]
    interrupt: Option<Signal>,
    #[cfg(unix)]
    terminate: Option<Signal>,
}

impl ShutdownListener {
    /// Register the handlers. A handler that cannot be installed is logged
    /// and its signal is never reported.
    #[cfg(unix)]
    pub fn install() -> Self {
        Self {
            interrupt: register(SignalKind::interrupt(), "SIGINT"),
            terminate: register(SignalKind::terminate(), "SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    pub fn install() -> Self {
        Self {}
    }

    /// Resolve on the first signal. Consumes the listener, so later signals
    /// are not observed.
    #[cfg(unix)]
    pub async fn wait(mut self) -> ShutdownSignal {
        tokio::select! {
            _ = recv(self.interrupt.as_mut()) => ShutdownSignal::Interrupt,
            _ = recv(self.terminate.as_mut()) => ShutdownSignal::Terminate,
        }
    }

    #[cfg(not(unix))]
    pub async fn wait(self) -> ShutdownSignal {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::debug!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        ShutdownSignal::Interrupt
    }
}

#[cfg(unix)]
fn register(kind: SignalKind, name: &str) -> Option<Signal> {
    match signal(kind) {
        Ok(stream) => Some(stream),
        Err(e) => {
            tracing::debug!(error = %e, signal = name, "Failed to install signal handler");
            None
        }
    }
}

#[cfg(unix)]
async fn recv(stream: Option<&mut Signal>) {
    match stream {
        Some(stream) => {
            stream.recv().await;
        }
        None => std::future::pending::<()>().await,
    }
}
