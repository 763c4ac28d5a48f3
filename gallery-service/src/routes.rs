//! REST routes for the gallery API
//!
//! `POST /api/v1/dalle` forwards a prompt to the generation backend and
//! returns the hosted image URL; `GET`/`POST /api/v1/post` read and extend
//! the shared gallery. Both routes validate their input before doing any work
//! and report failures as a JSON message body.

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};

use crate::dalle::OpenAiClient;
use crate::store::PostStore;

/// Posts may carry data-URL photos in some deployments; allow large JSON
/// bodies (50 MB).
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Upstream image generation seam. Lets tests drive the routes without
/// contacting the real generation backend.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<String, String>;
}

#[async_trait]
impl ImageBackend for OpenAiClient {
    async fn generate_image(&self, prompt: &str) -> Result<String, String> {
        OpenAiClient::generate_image(self, prompt).await
    }
}

/// API errors mapped onto HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Storage(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

/// Shared state for the API routes
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PostStore>,
    pub generator: Arc<dyn ImageBackend>,
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/v1/dalle", post(generate_image))
        .route("/api/v1/post", get(list_posts).post(create_post))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

async fn health() -> &'static str {
    "Hello API"
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    prompt: String,
}

async fn generate_image(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    let prompt = req.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::Validation("prompt is required".to_string()));
    }

    let photo = state.generator.generate_image(prompt).await.map_err(|e| {
        error!("Image generation failed: {}", e);
        ApiError::Upstream(e)
    })?;

    info!("Image generated for prompt ({} chars)", prompt.len());
    Ok(Json(json!({ "photo": photo })))
}

#[derive(Debug, Deserialize)]
struct CreatePostRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    photo: String,
}

async fn create_post(
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Result<Json<Value>, ApiError> {
    let name = req.name.trim();
    let prompt = req.prompt.trim();
    let photo = req.photo.trim();
    if name.is_empty() || prompt.is_empty() || photo.is_empty() {
        return Err(ApiError::Validation(
            "name, prompt and photo are required".to_string(),
        ));
    }

    let post = state
        .store
        .create(name, prompt, photo)
        .map_err(ApiError::Storage)?;

    Ok(Json(json!({ "data": post })))
}

async fn list_posts(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let posts = state.store.list().map_err(ApiError::Storage)?;
    Ok(Json(json!({ "data": posts })))
}
