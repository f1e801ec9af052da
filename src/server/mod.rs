//! HTTP upload endpoint.
//!
//! A thin shell around [`stats::analyze`]: the client posts one transcript
//! as `multipart/form-data` (field `file`) to `POST /analyze` and receives
//! the [`Report`] as JSON, or `{"error": "..."}` on failure.
//!
//! Each request runs the engine on the blocking pool under a wall-clock
//! timeout. Blocking work cannot be cancelled, so an analysis past its
//! timeout keeps running and keeps its slot; a semaphore caps how many
//! analyses run at once. Requests share nothing else.

mod error;

pub use error::ApiError;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::Semaphore;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::stats::{self, AnalyzeOptions, Report};
use crate::transcript;

/// Room for multipart boundaries and part headers on top of the file limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Name of the form field carrying the transcript.
pub const FILE_FIELD: &str = "file";

/// Settings shared by all requests.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Largest accepted transcript in bytes
    pub max_upload_bytes: u64,
    /// Wall-clock limit for one response. Waiting for a free analysis slot
    /// counts against it. The analysis itself is not stopped when it expires.
    pub timeout: Duration,
    /// Analyses allowed to run at once
    pub max_concurrent: usize,
    /// Engine settings
    pub analyze: AnalyzeOptions,
}

impl ServerOptions {
    /// Derive server options from the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes(),
            timeout: config.analysis_timeout(),
            max_concurrent: config.server.max_concurrent,
            analyze: config.analyze_options(),
        }
    }
}

/// Shared request state.
struct AppState {
    options: ServerOptions,
    permits: Arc<Semaphore>,
}

/// Build the application router.
pub fn router(options: ServerOptions) -> Router {
    let body_limit = usize::try_from(options.max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);
    let permits = Arc::new(Semaphore::new(options.max_concurrent.max(1)));

    Router::new()
        .route("/analyze", post(analyze_upload))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState { options, permits }))
}

/// Bind `addr` and serve until Ctrl+C.
#[cfg(not(tarpaulin_include))]
pub async fn serve(addr: &str, options: ServerOptions) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        addr = %addr,
        max_upload_bytes = options.max_upload_bytes,
        timeout_secs = options.timeout.as_secs(),
        max_concurrent = options.max_concurrent,
        "chatstats server listening"
    );

    axum::serve(listener, router(options))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server stopped with error")?;

    Ok(())
}

#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down...");
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn analyze_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Report>, ApiError> {
    let options = &state.options;
    let Upload { filename, bytes } = read_upload(&mut multipart, options.max_upload_bytes).await?;
    let size = bytes.len();

    let analyze_options = options.analyze.clone();
    let permits = Arc::clone(&state.permits);
    let work = async move {
        let permit = permits
            .acquire_owned()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        tokio::task::spawn_blocking(move || {
            // Held until the analysis finishes, even after a timeout
            let _permit = permit;
            let text = transcript::decode(&bytes);
            stats::analyze(&text, &analyze_options)
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))
    };

    let analysis = match tokio::time::timeout(options.timeout, work).await {
        Err(_) => {
            warn!(filename = %filename, size, "analysis timed out");
            return Err(ApiError::Timeout {
                secs: options.timeout.as_secs(),
            });
        }
        Ok(result) => result??,
    };

    if !analysis.excluded_senders.is_empty() {
        info!(
            filename = %filename,
            excluded = analysis.excluded_senders.len(),
            "senders beyond the two most active were excluded"
        );
    }

    Ok(Json(analysis.report))
}

/// An uploaded transcript file.
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// Read the `file` field, enforcing the size limit while streaming.
async fn read_upload(multipart: &mut Multipart, limit: u64) -> Result<Upload, ApiError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(ApiError::EmptyFilename);
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::from_multipart(e, limit))?
        {
            if (bytes.len() + chunk.len()) as u64 > limit {
                return Err(ApiError::PayloadTooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(Upload { filename, bytes });
    }

    Err(ApiError::MissingFile)
}
