//! Remote input resolution against a local in-process HTTP responder.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use loveweb_core::{DownloadError, Error, SourceInput};
use loveweb_sources::{InputResolver, Staging};

/// Serve canned HTTP/1.1 responses; `respond` maps request path → raw
/// response bytes.
async fn spawn_server<F>(respond: F) -> String
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let respond = Arc::clone(&respond);
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let path = request
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();
                let _ = socket.write_all(respond(&path).as_bytes()).await;
            });
        }
    });

    format!("http://{}", addr)
}

fn ok(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

fn not_found() -> String {
    "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string()
}

fn redirect(location: &str) -> String {
    format!(
        "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        location
    )
}

#[tokio::test]
async fn test_download_materializes_temp_file() {
    let base = spawn_server(|_| ok("love bytes")).await;
    let resolver = InputResolver::new();
    let mut staging = Staging::new();

    let input = SourceInput::classify(&format!("{}/game.love", base));
    let path = resolver.resolve(&input, &mut staging).await.unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"love bytes");

    staging.cleanup();
    assert!(!path.exists());
}

#[tokio::test]
async fn test_404_fails_with_status_and_no_temp_file() {
    let base = spawn_server(|_| not_found()).await;
    let resolver = InputResolver::new();
    let mut staging = Staging::new();

    let input = SourceInput::classify(&format!("{}/missing.love", base));
    let err = resolver.resolve(&input, &mut staging).await.unwrap_err();
    match err {
        Error::DownloadFailed(DownloadError::Status(status)) => assert_eq!(status, 404),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_redirect_is_followed_to_terminal_response() {
    let base = spawn_server(|path| match path {
        "/start" => redirect("/final"),
        "/final" => ok("redirected bytes"),
        _ => not_found(),
    })
    .await;
    let resolver = InputResolver::new();
    let mut staging = Staging::new();

    let input = SourceInput::classify(&format!("{}/start", base));
    let path = resolver.resolve(&input, &mut staging).await.unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"redirected bytes");
}

#[tokio::test]
async fn test_redirect_loop_hits_bound() {
    let base = spawn_server(|_| redirect("/loop")).await;
    let resolver = InputResolver::new();
    let mut staging = Staging::new();

    let input = SourceInput::classify(&format!("{}/loop", base));
    let err = resolver.resolve(&input, &mut staging).await.unwrap_err();
    assert!(matches!(
        err,
        Error::DownloadFailed(DownloadError::TooManyRedirects(_))
    ));
}
