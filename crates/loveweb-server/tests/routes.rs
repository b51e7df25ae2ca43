//! Route-level tests driven through the router with oneshot requests.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use base64::Engine as _;
use tower::ServiceExt;

use loveweb_engine::AssetCatalog;
use loveweb_server::{router, AppState, InMemoryDelivery, InMemoryRegistry};

fn fake_assets(dir: &Path) -> AssetCatalog {
    for flavor in ["release", "compat"] {
        let flavor_dir = dir.join(flavor);
        std::fs::create_dir_all(&flavor_dir).unwrap();
        std::fs::write(flavor_dir.join("love.js"), b"// runtime").unwrap();
        std::fs::write(flavor_dir.join("love.wasm"), b"\x00asm").unwrap();
        if flavor == "release" {
            std::fs::write(flavor_dir.join("love.worker.js"), b"// worker").unwrap();
        }
    }
    AssetCatalog::new(dir)
}

fn test_router(assets_dir: &Path) -> axum::Router {
    let state = AppState::new(
        fake_assets(assets_dir),
        Arc::new(InMemoryRegistry::new()),
        Arc::new(InMemoryDelivery::new()),
    );
    router(state)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn single_byte_game() -> serde_json::Value {
    serde_json::json!({
        "files": [{
            "path": "main.lua",
            "content": base64::engine::general_purpose::STANDARD.encode(b"x"),
        }]
    })
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_compile_single_file_returns_html_with_manifest() {
    let assets = tempfile::tempdir().unwrap();
    let app = test_router(assets.path());

    let response = app.oneshot(post_json("/compile", single_byte_game())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("\"filename\":\"main.lua\""));
    assert!(html.contains("\"start\":0"));
    assert!(html.contains("\"end\":1"));
}

#[tokio::test]
async fn test_compile_rejects_empty_files() {
    let assets = tempfile::tempdir().unwrap();
    let app = test_router(assets.path());

    let response = app
        .oneshot(post_json("/compile", serde_json::json!({ "files": [] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_compile_directory_mode_returns_base64_map() {
    let assets = tempfile::tempdir().unwrap();
    let app = test_router(assets.path());

    let mut body = single_byte_game();
    body["singleFile"] = serde_json::json!(false);

    let response = app.oneshot(post_json("/compile", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["success"], true);
    for name in ["index.html", "game.js", "game.data", "love.js", "love.wasm"] {
        assert!(json["files"].get(name).is_some(), "missing {name}");
    }
    let payload = base64::engine::general_purpose::STANDARD
        .decode(json["files"]["game.data"].as_str().unwrap())
        .unwrap();
    assert_eq!(payload, b"x");
}

#[tokio::test]
async fn test_export_sets_archive_headers() {
    let assets = tempfile::tempdir().unwrap();
    let app = test_router(assets.path());

    let mut body = single_byte_game();
    body["title"] = serde_json::json!("Pong");

    let response = app.oneshot(post_json("/export", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Pong.love\""
    );

    let bytes = body_bytes(response).await;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    assert!(archive.by_name("main.lua").is_ok());
}

#[tokio::test]
async fn test_export_rejects_reference_input() {
    let assets = tempfile::tempdir().unwrap();
    let app = test_router(assets.path());

    let response = app
        .oneshot(post_json(
            "/export",
            serde_json::json!({ "files": ["https://example.com/game.love"] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_publish_rejects_taken_name() {
    let assets = tempfile::tempdir().unwrap();
    let app = test_router(assets.path());

    let mut body = single_byte_game();
    body["name"] = serde_json::json!("pong");

    let first = app.clone().oneshot(post_json("/publish", body.clone())).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(first).await).unwrap();
    assert_eq!(json["url"], "/published/pong");

    let second = app.clone().oneshot(post_json("/publish", body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    // Retrieval re-serves the stored document verbatim.
    let served = app
        .oneshot(Request::builder().uri("/published/pong").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(served.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(served).await).unwrap();
    assert!(html.contains("\"filename\":\"main.lua\""));
}

#[tokio::test]
async fn test_play_link_round_trip() {
    let assets = tempfile::tempdir().unwrap();
    let app = test_router(assets.path());

    let created = app
        .clone()
        .oneshot(post_json("/play", single_byte_game()))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(created).await).unwrap();
    let path = json["path"].as_str().unwrap().to_string();

    let served = app
        .oneshot(Request::builder().uri(&path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(served.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_path_traversal_is_rejected() {
    let assets = tempfile::tempdir().unwrap();
    let app = test_router(assets.path());

    let body = serde_json::json!({
        "files": [{
            "path": "../escape.lua",
            "content": base64::engine::general_purpose::STANDARD.encode(b"x"),
        }]
    });
    let response = app.oneshot(post_json("/compile", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
