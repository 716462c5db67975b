use crate::config::Config;
use crate::engine::{Languages, RecognitionEngine};
use crate::error::{OcrError, NO_TEXT_TIPS};
use crate::{engines, pipeline};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

/// Multipart framing and field headers are not counted against the file
/// size limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// None when engine initialization failed; requests get
    /// `EngineUnavailable` until a restart brings it up
    pub engine: Option<Arc<dyn RecognitionEngine>>,
    pub config: Arc<Config>,
}

/// Recognition response. `found` discriminates the normal empty-result
/// outcome from a successful recognition; neither is an error.
#[derive(Serialize)]
pub struct RecognizeResponse {
    pub found: bool,
    pub message: String,
    pub lines: Vec<String>,
    pub word_count: usize,
    pub confidence: f32,
    pub processing_time_ms: u64,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub engine_ready: bool,
}

#[derive(Serialize)]
pub struct EngineStatus {
    pub name: &'static str,
    pub description: &'static str,
    pub supported_languages: Vec<String>,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub engine: Option<EngineStatus>,
    pub primary_language: String,
    pub secondary_language: String,
    pub confidence_threshold: f32,
    pub max_file_size_bytes: usize,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let engine = match engines::create(&config) {
        Ok(engine) => {
            tracing::info!("recognition engine '{}' ready", engine.name());
            Some(engine)
        }
        Err(e) => {
            tracing::error!("recognition engine failed to initialize: {e}");
            None
        }
    };

    let addr = format!("{}:{}", config.host, config.port);
    let app = router(engine, Arc::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(engine: Option<Arc<dyn RecognitionEngine>>, config: Arc<Config>) -> Router {
    let max_body = config.max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .route("/recognize", post(handle_recognize))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { engine, config })
}

/// Handle recognition requests
async fn handle_recognize(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RecognizeResponse>, OcrError> {
    let start = Instant::now();

    let mut file_data: Option<Bytes> = None;
    let mut languages_field: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| OcrError::InvalidRequest(format!("failed to parse multipart: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                file_data = Some(field.bytes().await.map_err(|e| {
                    OcrError::InvalidRequest(format!("failed to read file data: {e}"))
                })?);
            }
            "languages" => {
                languages_field = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| OcrError::InvalidRequest(format!("invalid languages: {e}")))?,
                );
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let data = file_data.ok_or(OcrError::MissingFile)?;

    if data.len() > state.config.max_file_size {
        tracing::warn!(
            "rejecting {} byte upload (limit {})",
            data.len(),
            state.config.max_file_size
        );
        return Err(OcrError::ImageTooLarge {
            size: data.len(),
            max: state.config.max_file_size,
        });
    }

    let languages = match languages_field {
        Some(s) => Languages::parse(&s).ok_or_else(|| {
            OcrError::InvalidRequest("languages must be \"primary\" or \"primary,secondary\"".to_string())
        })?,
        None => state.config.languages.clone(),
    };

    let engine = state
        .engine
        .clone()
        .ok_or_else(|| OcrError::EngineUnavailable("recognition engine not initialized".to_string()))?;

    match pipeline::run(&data, engine, &languages, state.config.confidence_threshold).await {
        Ok(result) => {
            let processing_time_ms = start.elapsed().as_millis() as u64;
            tracing::info!(
                "recognized {} lines in {}ms, confidence {:.2}",
                result.word_count,
                processing_time_ms,
                result.mean_confidence
            );

            Ok(Json(RecognizeResponse {
                found: true,
                message: result.to_message(),
                word_count: result.word_count,
                confidence: result.mean_confidence,
                lines: result.lines,
                processing_time_ms,
            }))
        }
        Err(OcrError::NoTextFound) => {
            let processing_time_ms = start.elapsed().as_millis() as u64;
            tracing::info!("no text found after {}ms", processing_time_ms);

            Ok(Json(RecognizeResponse {
                found: false,
                message: NO_TEXT_TIPS.to_string(),
                lines: Vec::new(),
                word_count: 0,
                confidence: 0.0,
                processing_time_ms,
            }))
        }
        Err(e) => Err(e),
    }
}

/// Handle health check requests
async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine_ready: state.engine.is_some(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: state.engine.as_ref().map(|engine| EngineStatus {
            name: engine.name(),
            description: engine.description(),
            supported_languages: engine.supported_languages(),
        }),
        primary_language: state.config.languages.primary.clone(),
        secondary_language: state.config.languages.secondary.clone(),
        confidence_threshold: state.config.confidence_threshold,
        max_file_size_bytes: state.config.max_file_size,
    })
}
