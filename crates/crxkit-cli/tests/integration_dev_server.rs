//! Integration tests for the development server.
//!
//! Tests cover port negotiation, the bootstrap lifecycle, file serving, the
//! error overlay and the SSE live-reload channel.

mod common;

use common::{Project, ScriptedCompiler};
use crxkit_cli::config::{ProcessEnv, Target};
use crxkit_cli::dev::{
    BootstrapOutcome, DevEvent, DevServer, DevServerBootstrap, DevServerState, PortPrompt,
    ShutdownSignal, RELOAD_SCRIPT_PATH, SSE_PATH,
};
use std::net::{SocketAddr, TcpListener};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

fn local_env(port: u16) -> ProcessEnv {
    ProcessEnv {
        host: "127.0.0.1".to_string(),
        port,
        ..ProcessEnv::default()
    }
}

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn port_is_bindable(port: u16) -> bool {
    TcpListener::bind(("127.0.0.1", port)).is_ok()
}

/// Minimal HTTP/1.1 GET, returning the whole response.
async fn get(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        path
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .unwrap()
        .unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

async fn wait_until_listening(port: u16) -> SocketAddr {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    for _ in 0..100 {
        if TcpStream::connect(addr).await.is_ok() {
            return addr;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("dev server never started listening on {}", addr);
}

/// Read from an open SSE response until `needle` shows up.
async fn read_until(stream: &mut TcpStream, needle: &str) -> String {
    let mut seen = String::new();
    let mut buf = [0u8; 1024];

    tokio::time::timeout(Duration::from_secs(5), async {
        while !seen.contains(needle) {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "stream closed before {:?} arrived", needle);
            seen.push_str(&String::from_utf8_lossy(&buf[..n]));
        }
    })
    .await
    .unwrap();

    seen
}

struct Declines;

impl PortPrompt for Declines {
    fn confirm_alternative(&self, _desired: u16, _alternative: u16) -> bool {
        false
    }
}

#[tokio::test]
async fn test_occupied_port_non_interactive_starts_nothing() {
    let project = Project::new();
    let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();
    let compiler = ScriptedCompiler::clean().shared();

    let outcome = DevServerBootstrap::new(
        project.paths(Target::Firefox),
        local_env(port),
        Target::Firefox,
        compiler.clone(),
    )
    .run_until(std::future::pending())
    .await
    .unwrap();

    assert_eq!(outcome, BootstrapOutcome::PortDeclined);
    assert_eq!(compiler.calls(), 0);

    drop(occupied);
    assert!(port_is_bindable(port));
}

#[tokio::test]
async fn test_declined_prompt_starts_nothing() {
    let project = Project::new();
    let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();

    let outcome = DevServerBootstrap::new(
        project.paths(Target::Chrome),
        local_env(port),
        Target::Chrome,
        ScriptedCompiler::clean().shared(),
    )
    .interactive(Declines)
    .run_until(std::future::pending())
    .await
    .unwrap();

    assert_eq!(outcome, BootstrapOutcome::PortDeclined);
}

/// Declines and remembers which thread asked.
struct RecordingPrompt(Arc<Mutex<Option<ThreadId>>>);

impl PortPrompt for RecordingPrompt {
    fn confirm_alternative(&self, _desired: u16, _alternative: u16) -> bool {
        *self.0.lock().unwrap() = Some(std::thread::current().id());
        false
    }
}

#[tokio::test]
async fn test_port_prompt_runs_off_the_async_thread() {
    let project = Project::new();
    let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();
    let asked_on = Arc::new(Mutex::new(None));

    let outcome = DevServerBootstrap::new(
        project.paths(Target::Firefox),
        local_env(port),
        Target::Firefox,
        ScriptedCompiler::clean().shared(),
    )
    .interactive(RecordingPrompt(asked_on.clone()))
    .run_until(std::future::pending())
    .await
    .unwrap();

    assert_eq!(outcome, BootstrapOutcome::PortDeclined);
    let asked_on = asked_on.lock().unwrap().expect("prompt was not consulted");
    // The test runtime is single-threaded, so the prompt ran on the blocking pool
    assert_ne!(asked_on, std::thread::current().id());
}

#[tokio::test]
async fn test_bootstrap_serves_then_releases_port_on_signal() {
    let project = Project::new();
    let paths = project.paths(Target::Firefox);
    let port = free_port();
    let compiler = ScriptedCompiler::clean().shared();
    let (signal_tx, signal_rx) = oneshot::channel::<()>();

    let bootstrap = DevServerBootstrap::new(
        paths.clone(),
        local_env(port),
        Target::Firefox,
        compiler.clone(),
    )
    .debounce_ms(10)
    .run_until(async move {
        let _ = signal_rx.await;
        ShutdownSignal::Interrupt
    });

    let driver_compiler = compiler.clone();
    let driver = async move {
        let addr = wait_until_listening(port).await;

        let manifest = get(addr, "/manifest.json").await;
        assert!(manifest.starts_with("HTTP/1.1 200"));
        assert!(manifest.contains("Pocket Saver"));

        let icon = get(addr, "/icon.png").await;
        assert!(icon.to_lowercase().contains("content-type: image/png"));

        let script = get(addr, RELOAD_SCRIPT_PATH).await;
        assert!(script.contains("EventSource"));

        for _ in 0..100 {
            if driver_compiler.calls() > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        signal_tx.send(()).unwrap();
    };

    let (outcome, ()) = tokio::join!(bootstrap, driver);

    assert_eq!(
        outcome.unwrap(),
        BootstrapOutcome::Stopped(ShutdownSignal::Interrupt)
    );
    assert!(compiler.calls() >= 1);
    assert!(paths.staging.join("js/background.bundle.js").is_file());
    assert!(port_is_bindable(port));
}

#[tokio::test]
async fn test_missing_manifest_fails_before_binding() {
    let project = Project::new();
    std::fs::remove_file(project.root().join("src/manifest.yml")).unwrap();
    let port = free_port();

    let result = DevServerBootstrap::new(
        project.paths(Target::Firefox),
        local_env(port),
        Target::Firefox,
        ScriptedCompiler::clean().shared(),
    )
    .run_until(std::future::pending())
    .await;

    assert!(result.is_err());
    assert!(port_is_bindable(port));
}

async fn serve(out_dir: &Path) -> (Arc<DevServerState>, crxkit_cli::dev::ServerHandle) {
    let state = Arc::new(DevServerState::new(out_dir.to_path_buf()));
    let server = DevServer::bind(SocketAddr::from(([127, 0, 0, 1], 0)), state.clone())
        .await
        .unwrap();
    (state, server.serve().unwrap())
}

#[tokio::test]
async fn test_serves_staging_from_disk() {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("js")).unwrap();
    std::fs::write(temp.path().join("js/frame.bundle.js"), "frame()").unwrap();
    let (_state, handle) = serve(temp.path()).await;
    let addr = handle.local_addr();

    let response = get(addr, "/js/frame.bundle.js").await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("application/javascript"));
    assert!(response.ends_with("frame()"));

    // Rewritten on disk, served fresh
    std::fs::write(temp.path().join("js/frame.bundle.js"), "frame2()").unwrap();
    assert!(get(addr, "/js/frame.bundle.js").await.ends_with("frame2()"));

    assert!(get(addr, "/missing.js").await.starts_with("HTTP/1.1 404"));

    handle.close().await.unwrap();
}

#[tokio::test]
async fn test_error_overlay_while_build_fails() {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::write(temp.path().join("save.html"), "<html>save</html>").unwrap();
    std::fs::create_dir_all(temp.path().join("js")).unwrap();
    std::fs::write(temp.path().join("js/save.bundle.js"), "save()").unwrap();
    let (state, handle) = serve(temp.path()).await;
    let addr = handle.local_addr();

    state.fail_build("Syntax error: Unexpected token <".to_string());

    let page = get(addr, "/save.html").await;
    assert!(page.contains("Unexpected token &lt;"));
    assert!(!page.contains("<html>save</html>"));

    // Scripts are still served so the extension keeps loading
    assert!(get(addr, "/js/save.bundle.js").await.ends_with("save()"));

    state.complete_build(10, 0);
    assert!(get(addr, "/save.html").await.contains("<html>save</html>"));

    handle.close().await.unwrap();
}

#[tokio::test]
async fn test_sse_delivers_build_events_and_close_ends_stream() {
    let temp = tempfile::TempDir::new().unwrap();
    let (state, handle) = serve(temp.path()).await;
    let addr = handle.local_addr();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: localhost\r\nAccept: text/event-stream\r\n\r\n",
        SSE_PATH
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let greeting = read_until(&mut stream, "ClientConnected").await;
    assert!(greeting.contains("text/event-stream"));
    assert_eq!(state.client_count(), 1);

    state.broadcast(&DevEvent::BuildCompleted { duration_ms: 42 });
    let update = read_until(&mut stream, "BuildCompleted").await;
    assert!(update.contains(r#""duration_ms":42"#));

    // An open event stream must not hold up shutdown
    tokio::time::timeout(Duration::from_secs(10), handle.close())
        .await
        .unwrap()
        .unwrap();
}
