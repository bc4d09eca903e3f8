//! filehash service
//!
//! HTTP front end for extension-filtered SHA-256 fingerprinting of single
//! files and whole folders.

mod error;
mod guard;

use anyhow::Context;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use filehash_core::hashing::PREVIEW_LEN;
use filehash_core::{
    classify, compute_file_hash, load_config, read_preview, HashOutcome, PathKind, ProcessError,
    Processor,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::ApiError;
use crate::guard::check_path;

/// Application state shared across handlers
struct AppState {
    processor: Processor,
    root: Option<PathBuf>,
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct FileQuery {
    file_path: String,
}

#[derive(Debug, Deserialize)]
struct FolderQuery {
    folder_path: String,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn root() -> Json<MessageResponse> {
    MessageResponse::new("File Processing API is running.")
}

/// Validate, preview and hash one file. `file_path` arrives percent-decoded.
async fn process_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let path = PathBuf::from(&query.file_path);
    check_path(&path, state.root.as_deref())?;

    let message = tokio::task::spawn_blocking(move || fingerprint_file(&state.processor, &path))
        .await??;
    Ok(MessageResponse::new(message))
}

fn fingerprint_file(processor: &Processor, path: &Path) -> Result<String, ApiError> {
    match classify(path)? {
        PathKind::File => {}
        PathKind::Directory => return Err(ApiError::IsDirectory(path.to_path_buf())),
        PathKind::Neither => return Err(ProcessError::NotFileOrDirectory(path.to_path_buf()).into()),
    }

    let extension = processor.check_file(path).map_err(|err| match err {
        ProcessError::UnsupportedExtension { extension, .. } => ApiError::Unsupported {
            extension,
            supported: processor.extensions().clone(),
        },
        other => other.into(),
    })?;

    tracing::info!("Processing single file: {:?} (Type: '{}')", path, extension);
    let preview = read_preview(path, PREVIEW_LEN)?;
    tracing::debug!("File content preview: {}...", preview);

    let digest = compute_file_hash(path)?;
    tracing::info!("File: {:?} Hash: {}", path, digest);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(format!(
        "File '{}' (type: '{}') processed successfully.",
        name, extension
    ))
}

/// Hash every supported file below a folder. Per-file failures are logged only.
async fn process_folder(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FolderQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let path = PathBuf::from(&query.folder_path);
    check_path(&path, state.root.as_deref())?;

    tokio::task::spawn_blocking(move || fingerprint_folder(&state.processor, &path)).await??;
    Ok(MessageResponse::new(format!(
        "Processing folder at: {}",
        query.folder_path
    )))
}

fn fingerprint_folder(processor: &Processor, path: &Path) -> Result<(), ApiError> {
    match classify(path)? {
        PathKind::Directory => {}
        PathKind::File => return Err(ApiError::IsFile(path.to_path_buf())),
        PathKind::Neither => return Err(ProcessError::NotFileOrDirectory(path.to_path_buf()).into()),
    }

    tracing::info!("Processing folder: {:?}", path);
    let report = match processor.run(path) {
        Ok(report) => report,
        Err(err) if err.is_warning() => {
            tracing::warn!("{}", err);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    for result in &report.results {
        match &result.outcome {
            HashOutcome::Hashed { digest } => {
                tracing::info!("File: {:?} Hash: {}", result.path, digest)
            }
            HashOutcome::Failed { reason } => tracing::warn!("{}", reason),
        }
    }
    tracing::info!(
        hashed = report.hashed(),
        failed = report.failed(),
        skipped = report.skipped,
        "Folder processed: {:?}",
        path
    );
    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/process-file/", get(process_file))
        .route("/process-folder", get(process_folder))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; log records from filehash-core are bridged in
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config().context("Failed to load configuration")?;
    let processor = Processor::new(config.supported_extensions());
    tracing::info!("Supported extensions: {}", processor.extensions());
    let root = match &config.root {
        Some(root) => {
            let normalized = guard::normalize(root)
                .with_context(|| format!("Invalid root directory {:?}", root))?;
            tracing::info!("Confining requests to {:?}", normalized);
            Some(normalized)
        }
        None => None,
    };

    let state = Arc::new(AppState { processor, root });

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting file processing service on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
