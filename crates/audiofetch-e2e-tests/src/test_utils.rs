use audiofetch_lib::DownloadEntry;
use axum::Router;
use axum::extract::Path as UrlPath;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use eyre::Result;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Delay used by the `/slow/` route; longer than any timeout the tests configure.
pub const SLOW_RESPONSE_DELAY: Duration = Duration::from_secs(3);

/// Deterministic body served for `name`, sized so distinct names give distinct sizes.
pub fn fake_audio(name: &str) -> Vec<u8> {
    let len = 4096 + name.len() * 1024;
    name.bytes().cycle().take(len).collect()
}

async fn serve_audio(UrlPath(name): UrlPath<String>) -> Response {
    if name.starts_with("missing") {
        return StatusCode::NOT_FOUND.into_response();
    }
    if name.starts_with("forbidden") {
        return StatusCode::FORBIDDEN.into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "audio/mpeg")],
        fake_audio(&name),
    )
        .into_response()
}

async fn serve_slow(UrlPath(name): UrlPath<String>) -> Response {
    tokio::time::sleep(SLOW_RESPONSE_DELAY).await;
    serve_audio(UrlPath(name)).await
}

async fn redirect(UrlPath(name): UrlPath<String>) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, format!("/audio/{name}"))],
    )
        .into_response()
}

/// Serves `/audio/{name}`, `/slow/{name}` and `/moved/{name}` on an ephemeral port.
pub async fn start_audio_server() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route("/audio/{name}", get(serve_audio))
        .route("/slow/{name}", get(serve_slow))
        .route("/moved/{name}", get(redirect));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}

/// Answers every connection with a `Content-Length` of `declared` bytes, sends only
/// `sent` of them and hangs up.
pub async fn start_truncated_server(declared: usize, sent: usize) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: audio/mpeg\r\nContent-Length: {declared}\r\n\r\n"
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&vec![0x55u8; sent]).await;
            let _ = socket.shutdown().await;
        }
    });
    addr
}

pub fn entry_for(addr: SocketAddr, route: &str, name: &str) -> DownloadEntry {
    DownloadEntry::new(name, format!("http://{addr}/{route}/{name}"))
}

/// A port nothing is listening on.
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

pub fn write_test_config(dir: &Path, timeout_secs: u64) -> Result<PathBuf> {
    let config_path = dir.join("audiofetch.json");
    let config = serde_json::json!({
        "http": {
            "connect_timeout_secs": 5,
            "timeout_secs": timeout_secs,
        }
    });
    std::fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    Ok(config_path)
}

pub fn output_lines(out: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(out)
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("audiofetch_lib=debug,audiofetch_e2e_tests=debug")
        .with_test_writer()
        .try_init()
        .ok();
}
