//! Development server with live reload via Server-Sent Events.
//!
//! Serves the staging directory from disk, so what the browser loads over
//! HTTP is exactly what the extension loader reads from the filesystem.

use crate::dev::{error_overlay, DevEvent, SharedState, RELOAD_SCRIPT_PATH, SSE_PATH};
use crate::error::{CliError, Result};
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{sse::Event, sse::KeepAlive, IntoResponse, Response, Sse},
    routing::get,
    Router,
};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_stream::{wrappers::ReceiverStream, Stream, StreamExt};
use tower_http::cors::{Any, CorsLayer};

/// How long [`ServerHandle::close`] waits for in-flight requests.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

const RELOAD_SCRIPT: &str = include_str!("../../assets/dev/reload-client.js");

/// A bound, not yet serving, development server.
pub struct DevServer {
    listener: TcpListener,
    state: SharedState,
}

impl DevServer {
    /// Bind the listening socket.
    pub async fn bind(addr: SocketAddr, state: SharedState) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", addr, e)))?;
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Start serving in the background.
    pub fn serve(self) -> Result<ServerHandle> {
        let local_addr = self.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(self.state.clone());
        let listener = self.listener;

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        tracing::debug!(%local_addr, "Dev server listening");

        Ok(ServerHandle {
            local_addr,
            shutdown: shutdown_tx,
            task,
            state: self.state,
        })
    }
}

/// A running development server.
///
/// [`ServerHandle::close`] consumes the handle, so the server can only be
/// released once.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
    state: SharedState,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and release the listening socket.
    pub async fn close(self) -> Result<()> {
        self.state.disconnect_all();
        let _ = self.shutdown.send(());

        let mut task = self.task;
        match tokio::time::timeout(CLOSE_TIMEOUT, &mut task).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => Err(CliError::Server(format!("Server error: {}", e))),
            Ok(Err(e)) => Err(CliError::Server(format!("Server task failed: {}", e))),
            Err(_) => {
                tracing::debug!("Graceful shutdown timed out, aborting connections");
                task.abort();
                let _ = task.await;
                Ok(())
            }
        }
    }
}

/// Build the router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route(SSE_PATH, get(handle_sse))
        .route(RELOAD_SCRIPT_PATH, get(handle_reload_script))
        .fallback(handle_request)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn handle_sse(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let (id, rx) = state.register_client();
    tracing::debug!(id, "Live-reload client connected");

    state.broadcast(&DevEvent::ClientConnected { id });

    let stream = ReceiverStream::new(rx).map(|data| Ok(Event::default().data(data)));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

async fn handle_reload_script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        RELOAD_SCRIPT,
    )
}

/// Serve a file from staging, or the error overlay for pages while the last
/// build is failing.
async fn handle_request(State(state): State<SharedState>, uri: Uri) -> Response {
    let path = uri.path();

    if let Some(error) = state.status().error() {
        if is_page_request(path) {
            return (
                [
                    (header::CONTENT_TYPE, "text/html; charset=utf-8"),
                    (header::CACHE_CONTROL, "no-cache"),
                ],
                error_overlay::render_error_overlay(error),
            )
                .into_response();
        }
    }

    let Some(file_path) = resolve_request_path(state.out_dir(), path) else {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    };

    if !file_path.is_file() {
        return (StatusCode::NOT_FOUND, format!("File not found: {}", path)).into_response();
    }

    match tokio::fs::read(&file_path).await {
        Ok(content) => (
            [
                (header::CONTENT_TYPE, determine_content_type(path)),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            content,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(path = %file_path.display(), error = %e, "Failed to read file");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file").into_response()
        }
    }
}

fn is_page_request(path: &str) -> bool {
    path == "/" || path.ends_with(".html")
}

/// Map a URL path onto `root`, refusing anything that would leave it.
fn resolve_request_path(root: &Path, url_path: &str) -> Option<PathBuf> {
    let relative = Path::new(url_path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }
    Some(root.join(relative))
}

fn determine_content_type(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    match extension {
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        _ => "application/octet-stream",
    }
}
