//! Route handlers for the packaging service.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::Engine as _;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use loveweb_core::{Artifact, Error, PackagingJob, Result, SourceInput};
use loveweb_engine::{AssetCatalog, Flavor, Orchestrator};
use loveweb_sources::{input::decode_inline, Staging};

use crate::store::{ContentDelivery, EphemeralStore, NameRegistry};

const PLAY_LINK_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<Orchestrator>,
    assets: AssetCatalog,
    registry: Arc<dyn NameRegistry>,
    delivery: Arc<dyn ContentDelivery>,
    ephemeral: Arc<EphemeralStore>,
}

impl AppState {
    pub fn new(
        assets: AssetCatalog,
        registry: Arc<dyn NameRegistry>,
        delivery: Arc<dyn ContentDelivery>,
    ) -> Self {
        Self {
            orchestrator: Arc::new(Orchestrator::new(assets.clone())),
            assets,
            registry,
            delivery,
            ephemeral: Arc::new(EphemeralStore::new(PLAY_LINK_TTL)),
        }
    }
}

/// One entry of the `files` array: either an encoded source file or a
/// single input reference (path, URL or data URI).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileSpec {
    Source { path: String, content: String },
    Reference(String),
}

#[derive(Debug, Deserialize)]
struct CompileRequest {
    files: Vec<FileSpec>,
    #[serde(default = "default_title")]
    title: String,
    #[serde(default = "default_memory")]
    memory: u64,
    #[serde(default)]
    compatibility: bool,
    #[serde(default = "default_single_file", rename = "singleFile")]
    single_file: bool,
}

#[derive(Debug, Deserialize)]
struct PublishRequest {
    name: String,
    #[serde(flatten)]
    compile: CompileRequest,
}

fn default_title() -> String {
    loveweb_core::DEFAULT_TITLE.to_string()
}

fn default_memory() -> u64 {
    loveweb_core::DEFAULT_MEMORY_LIMIT
}

fn default_single_file() -> bool {
    true
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/compile", post(compile))
        .route("/export", post(export))
        .route("/publish", post(publish))
        .route("/play", post(play_create))
        .route("/play/:id", get(play_get))
        .route("/published/:name", get(published_get))
        .route("/love.js", get(runtime_script))
        .route("/love.wasm", get(runtime_wasm))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = router(state);
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!("loveweb server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Stage the request's file set and classify the resulting input.
async fn stage_input(files: &[FileSpec], staging: &mut Staging) -> Result<SourceInput> {
    if files.is_empty() {
        return Err(Error::InvalidInput(
            "files must be a non-empty array".to_string(),
        ));
    }
    match &files[0] {
        FileSpec::Reference(reference) => Ok(SourceInput::classify(reference)),
        FileSpec::Source { .. } => {
            let dir = staging.temp_dir("src")?;
            for file in files {
                let FileSpec::Source { path, content } = file else {
                    return Err(Error::InvalidInput(
                        "files must be all objects or a single reference".to_string(),
                    ));
                };
                if path.starts_with('/') || path.split('/').any(|c| c == "..") {
                    return Err(Error::InvalidInput(format!("invalid file path: {path}")));
                }
                let full = dir.join(path);
                if let Some(parent) = full.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(&full, decode_inline(content)?).await?;
            }
            Ok(SourceInput::local(dir))
        }
    }
}

fn job_from_request(input: SourceInput, req: &CompileRequest) -> PackagingJob {
    PackagingJob::new(input)
        .with_title(&req.title)
        .with_memory_limit(req.memory)
        .with_single_file(req.single_file)
        .with_compatibility(req.compatibility)
}

async fn compile(State(state): State<AppState>, Json(req): Json<CompileRequest>) -> Response {
    let mut staging = Staging::new();
    let result = compile_inner(&state, &req, &mut staging).await;
    staging.cleanup();
    result.unwrap_or_else(error_response)
}

async fn compile_inner(
    state: &AppState,
    req: &CompileRequest,
    staging: &mut Staging,
) -> Result<Response> {
    let input = stage_input(&req.files, staging).await?;
    let job = job_from_request(input, req);
    match state.orchestrator.package(&job).await? {
        Artifact::SingleDocument(bytes) => Ok(Html(bytes).into_response()),
        Artifact::DirectoryTree(files) => {
            let encoded: std::collections::BTreeMap<&String, String> = files
                .iter()
                .map(|(path, bytes)| {
                    (path, base64::engine::general_purpose::STANDARD.encode(bytes))
                })
                .collect();
            Ok(Json(serde_json::json!({ "success": true, "files": encoded })).into_response())
        }
        other => Err(Error::InvalidInput(format!(
            "unexpected artifact kind {}",
            other.kind()
        ))),
    }
}

async fn export(State(state): State<AppState>, Json(req): Json<CompileRequest>) -> Response {
    let mut staging = Staging::new();
    let result = export_inner(&state, &req, &mut staging).await;
    staging.cleanup();
    result.unwrap_or_else(error_response)
}

async fn export_inner(
    state: &AppState,
    req: &CompileRequest,
    staging: &mut Staging,
) -> Result<Response> {
    if !req.files.iter().all(|f| matches!(f, FileSpec::Source { .. })) || req.files.is_empty() {
        return Err(Error::InvalidInput(
            "files must be an array of {path, content} objects".to_string(),
        ));
    }
    let input = stage_input(&req.files, staging).await?;
    let job = job_from_request(input, req);
    match state.orchestrator.export_source(&job).await? {
        Artifact::SourceArchive(bytes) => {
            let filename = req.title.replace(['"', '\\'], "");
            Ok((
                [
                    (header::CONTENT_TYPE, "application/zip".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}.love\"", filename),
                    ),
                ],
                bytes,
            )
                .into_response())
        }
        other => Err(Error::InvalidInput(format!(
            "unexpected artifact kind {}",
            other.kind()
        ))),
    }
}

async fn publish(State(state): State<AppState>, Json(req): Json<PublishRequest>) -> Response {
    let mut staging = Staging::new();
    let result = publish_inner(&state, &req, &mut staging).await;
    staging.cleanup();
    result.unwrap_or_else(error_response)
}

async fn publish_inner(
    state: &AppState,
    req: &PublishRequest,
    staging: &mut Staging,
) -> Result<Response> {
    if req.name.trim().is_empty() {
        return Err(Error::InvalidInput("name must not be empty".to_string()));
    }
    if state.registry.is_taken(&req.name).await? {
        return Err(Error::NameAlreadyTaken(req.name.clone()));
    }

    let input = stage_input(&req.compile.files, staging).await?;
    // Published games are always one self-contained document.
    let job = job_from_request(input, &req.compile).with_single_file(true);
    let bytes = match state.orchestrator.package(&job).await? {
        Artifact::SingleDocument(bytes) => bytes,
        other => {
            return Err(Error::InvalidInput(format!(
                "unexpected artifact kind {}",
                other.kind()
            )))
        }
    };

    let url = state
        .delivery
        .store(&req.name, &bytes)
        .await
        .map_err(|e| Error::UpstreamDeliveryFailure(e.to_string()))?;
    state.registry.register(&req.name, &url).await?;

    Ok(Json(serde_json::json!({ "name": req.name, "url": url })).into_response())
}

async fn play_create(State(state): State<AppState>, Json(req): Json<CompileRequest>) -> Response {
    let mut staging = Staging::new();
    let result = play_create_inner(&state, &req, &mut staging).await;
    staging.cleanup();
    result.unwrap_or_else(error_response)
}

async fn play_create_inner(
    state: &AppState,
    req: &CompileRequest,
    staging: &mut Staging,
) -> Result<Response> {
    let input = stage_input(&req.files, staging).await?;
    let job = job_from_request(input, req).with_single_file(true);
    let bytes = match state.orchestrator.package(&job).await? {
        Artifact::SingleDocument(bytes) => bytes,
        other => {
            return Err(Error::InvalidInput(format!(
                "unexpected artifact kind {}",
                other.kind()
            )))
        }
    };
    let id = state.ephemeral.insert(bytes).await;
    Ok(Json(serde_json::json!({ "id": id, "path": format!("/play/{}", id) })).into_response())
}

async fn play_get(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.ephemeral.get(&id).await {
        Some(bytes) => Html(bytes).into_response(),
        None => (StatusCode::NOT_FOUND, "play link not found or expired").into_response(),
    }
}

async fn published_get(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.delivery.retrieve(&name).await {
        Ok(Some(bytes)) => Html(bytes).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, format!("'{}' is not published", name)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn runtime_script(State(state): State<AppState>) -> Response {
    runtime_asset(&state, "love.js", "application/javascript").await
}

async fn runtime_wasm(State(state): State<AppState>) -> Response {
    runtime_asset(&state, "love.wasm", "application/wasm").await
}

async fn runtime_asset(state: &AppState, name: &str, content_type: &'static str) -> Response {
    match state.assets.load(Flavor::Compat, name).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, content_type.to_string()),
                (
                    header::CACHE_CONTROL,
                    "public, max-age=31536000, immutable".to_string(),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::InvalidInput(_) | Error::MalformedPayload(_) | Error::ArchiveCorrupt(_) => {
            StatusCode::BAD_REQUEST
        }
        Error::InputUnavailable(_) => StatusCode::NOT_FOUND,
        Error::MemoryLimitExceeded { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        Error::NameAlreadyTaken(_) => StatusCode::CONFLICT,
        Error::DownloadFailed(_) | Error::UpstreamDeliveryFailure(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: Error) -> Response {
    let status = error_status(&err);
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}
