//! # Chat Server Request Handlers
//!
//! File: cli/src/commands/srv/handlers.rs
//!
//! ## Overview
//!
//! Axum handlers behind the routes built in `server_logic::create_app`:
//!
//! | Route                                  | Handler          |
//! |----------------------------------------|------------------|
//! | `GET /`                                | `index`          |
//! | `POST /api/sessions`                   | `create_session` |
//! | `POST /api/sessions/{id}/messages`     | `post_message`   |
//! | `GET /api/sessions/{id}/history`       | `get_history`    |
//! | `DELETE /api/sessions/{id}/history`    | `clear_history`  |
//! | `GET /api/dataset`                     | `get_dataset`    |
//! | `PUT /api/dataset?name=<file name>`    | `put_dataset`    |
//!
//! Failures are returned as `{"error": "..."}` with a matching status code.
//!
use super::sessions::{AppState, StoreError, TurnReply};
use crate::common::loader::{ArchiveLoader, DatasetLoader};
use crate::core::error::EvError;
use crate::core::templating::{render_chat_page, ChatPage};
use crate::predictor::{DatasetSummary, Step, Turn};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Name assumed for an upload sent without `?name=`; format is then sniffed.
const UNNAMED_UPLOAD: &str = "upload";

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => {
                error!("Request failed: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownSession(_) => ApiError::NotFound(err.to_string()),
            StoreError::Poisoned => ApiError::Internal(err.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub step: Step,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub name: Option<String>,
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let summary = state.dataset()?.summary();
    let page = ChatPage::new(state.title(), &summary);
    render_chat_page(&page)
        .map(Html)
        .map_err(|e| ApiError::Internal(format!("{:#}", e)))
}

pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreated>), ApiError> {
    let session_id = state.create_session()?;
    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id,
            step: Step::Greet,
        }),
    ))
}

pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<TurnReply>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty.".to_string()));
    }
    Ok(Json(state.send(id, &request.message)?))
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Turn>>, ApiError> {
    Ok(Json(state.history(id)?))
}

pub async fn clear_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.clear(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_dataset(State(state): State<AppState>) -> Result<Json<DatasetSummary>, ApiError> {
    Ok(Json(state.dataset()?.summary()))
}

/// Replaces the dataset with the uploaded file. On any failure the old dataset stays.
///
/// ## Arguments
///
/// * `params`: `?name=` carries the upload's file name, which selects the format.
/// * `body`: The raw file, at most `MAX_UPLOAD_BYTES`.
///
/// ## Returns
///
/// * `Result<Json<DatasetSummary>, ApiError>`: Summary of the dataset now in use.
///
/// ## Errors
///
/// Returns `ApiError::BadRequest` for an empty body, a file that fails to load
/// or inflate within `MAX_INFLATED_BYTES`, or one with no usable rows.
pub async fn put_dataset(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<DatasetSummary>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty.".to_string()));
    }
    let name = params
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNNAMED_UPLOAD.to_string());
    let loader = ArchiveLoader::new(name, body.to_vec());
    info!("Received dataset upload {}", loader.describe());

    let dataset = tokio::task::spawn_blocking(move || loader.load())
        .await
        .map_err(|e| ApiError::Internal(format!("Dataset loading task failed: {}", e)))?
        .map_err(|e| {
            warn!("Rejected dataset upload: {:#}", e);
            ApiError::BadRequest(format!("{:#}", e))
        })?;

    if dataset.is_empty() {
        let err = EvError::Dataset(format!("'{}' contains no usable rows.", dataset.source()));
        return Err(ApiError::BadRequest(err.to_string()));
    }

    Ok(Json(state.replace_dataset(dataset)?))
}
