//! Session lifecycle HTTP handlers.
//!
//! Endpoints:
//! - PUT    /api/v1/sessions/{user_id}/grade  - Set the student's grade
//! - GET    /api/v1/sessions/{user_id}        - Get session state
//! - DELETE /api/v1/sessions/{user_id}        - Delete a session
//! - POST   /api/v1/sessions/{user_id}/export - Export the transcript to disk

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use coursewise_core::session::SessionStore;
use coursewise_infra::session::export_transcript;
use coursewise_types::chat::SessionState;
use coursewise_types::error::SessionError;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

const MIN_GRADE: u8 = 8;
const MAX_GRADE: u8 = 12;

/// Request body for PUT /sessions/{user_id}/grade.
#[derive(Debug, Deserialize)]
pub struct SetGradeRequest {
    pub grade: u8,
}

/// Session summary returned after setting the grade.
#[derive(Debug, Serialize)]
pub struct GradeResponse {
    pub user_id: String,
    pub grade: u8,
    pub conversation_stage: String,
}

/// PUT /api/v1/sessions/{user_id}/grade - Set the student's grade level.
///
/// Creates the session if it does not exist. The grade is immutable once
/// set; repeating the same value is accepted, a different value conflicts.
pub async fn set_grade(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<SetGradeRequest>,
) -> Result<ApiResponse<GradeResponse>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    if !(MIN_GRADE..=MAX_GRADE).contains(&body.grade) {
        return Err(AppError::Validation(format!(
            "grade must be between {MIN_GRADE} and {MAX_GRADE}, got {}",
            body.grade
        )));
    }

    let mut session = state
        .store
        .get(&user_id)
        .await?
        .unwrap_or_else(|| SessionState::new(&user_id));

    match session.grade {
        Some(existing) if existing != body.grade => {
            return Err(AppError::Conflict(format!(
                "grade is already set to {existing}"
            )));
        }
        _ => session.grade = Some(body.grade),
    }

    let response = GradeResponse {
        user_id: session.user_id.clone(),
        grade: body.grade,
        conversation_stage: session.conversation_stage.to_string(),
    };
    state.store.put(&user_id, session).await?;

    tracing::info!(user_id = %user_id, grade = body.grade, "grade set");

    Ok(ApiResponse::success(
        response,
        request_id,
        start.elapsed().as_millis() as u64,
    ))
}

/// GET /api/v1/sessions/{user_id} - Get the full session state.
pub async fn get_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<SessionState>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = state
        .store
        .get(&user_id)
        .await?
        .ok_or(AppError::Session(SessionError::NotFound))?;

    Ok(ApiResponse::success(
        session,
        request_id,
        start.elapsed().as_millis() as u64,
    ))
}

/// Deletion acknowledgement.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub user_id: String,
    pub deleted: bool,
}

/// DELETE /api/v1/sessions/{user_id} - Delete a session.
///
/// Deleting an absent session succeeds; the operation is idempotent.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<DeleteResponse>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    state.store.delete(&user_id).await?;

    tracing::info!(user_id = %user_id, "session deleted");

    Ok(ApiResponse::success(
        DeleteResponse {
            user_id,
            deleted: true,
        },
        request_id,
        start.elapsed().as_millis() as u64,
    ))
}

/// Export acknowledgement.
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub user_id: String,
    /// Name of the written chat log file.
    pub file: String,
}

/// POST /api/v1/sessions/{user_id}/export - Write the transcript to disk.
///
/// Saves the session's messages as a role-tagged JSON chat log. Rejected
/// when the session is missing or has no messages yet.
pub async fn export_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<ExportResponse>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = state
        .store
        .get(&user_id)
        .await?
        .ok_or(AppError::Session(SessionError::NotFound))?;

    if session.messages.is_empty() {
        return Err(AppError::Validation(
            "no chat history to save".to_string(),
        ));
    }

    let path = export_transcript(&state.export_dir, &user_id, &session.messages).await?;
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(ApiResponse::success(
        ExportResponse { user_id, file },
        request_id,
        start.elapsed().as_millis() as u64,
    ))
}
