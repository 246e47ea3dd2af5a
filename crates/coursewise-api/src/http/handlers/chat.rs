//! Chat turn HTTP handler.
//!
//! Endpoint:
//! - POST /api/v1/sessions/{user_id}/chat - Run one conversation turn

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use coursewise_core::session::SessionStore;
use coursewise_types::error::TurnError;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for POST /sessions/{user_id}/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Optional credit preference override (e.g. "dual credit", "any").
    #[serde(default)]
    pub credit_preference: Option<String>,
}

/// One completed conversation turn.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub conversation_stage: String,
    pub interests: Vec<String>,
}

/// POST /api/v1/sessions/{user_id}/chat - Process one user message.
///
/// A session must already exist with a grade set; otherwise the request
/// is rejected before the engine runs.
pub async fn chat(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<ChatRequest>,
) -> Result<ApiResponse<ChatResponse>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    if body.message.trim().is_empty() {
        return Err(AppError::Turn(TurnError::EmptyMessage));
    }

    // A missing session means no grade was ever set for this user.
    let mut session = state
        .store
        .get(&user_id)
        .await?
        .ok_or(AppError::Turn(TurnError::GradeMissing))?;

    let outcome = state
        .engine
        .handle_turn(&mut session, &body.message, body.credit_preference.as_deref())
        .await?;

    let response = ChatResponse {
        reply: outcome.reply,
        conversation_stage: outcome.stage.to_string(),
        interests: session.interests.clone(),
    };
    state.store.put(&user_id, session).await?;

    Ok(ApiResponse::success(
        response,
        request_id,
        start.elapsed().as_millis() as u64,
    ))
}
