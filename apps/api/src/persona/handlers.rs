//! Axum route handlers for the persona chat.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::chat::ChatTurn;
use crate::persona::{classify, AvailabilityStatus, Mode};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub reply: ChatTurn,
    pub mode: Mode,
    pub is_thinking: bool,
    pub needs_handoff: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handoff_link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub turns: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct PersonaStatusResponse {
    pub status: AvailabilityStatus,
    pub message: String,
    pub handoff_available: bool,
}

/// POST /api/v1/chat
///
/// Sends one visitor message and appends both turns to the session log.
/// Provider failures still produce a 200 with an apology reply.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);
    let user_turn = ChatTurn::user(message);
    let result = state
        .persona
        .get_persona_response(message, &state.config.persona)
        .await;
    let reply = ChatTurn::model(result.text.clone(), result.source_links());

    state
        .sessions
        .append(session_id, [user_turn, reply.clone()])
        .await;

    Ok(Json(ChatResponse {
        session_id,
        reply,
        mode: classify(message),
        is_thinking: result.is_thinking.unwrap_or(false),
        needs_handoff: result.needs_handoff(),
        handoff_link: result.handoff_link,
    }))
}

/// GET /api/v1/chat/:session_id
pub async fn handle_chat_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, AppError> {
    let turns = state
        .sessions
        .history(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Chat session {session_id} not found")))?;
    Ok(Json(HistoryResponse { session_id, turns }))
}

/// GET /api/v1/persona
pub async fn handle_persona_status(State(state): State<AppState>) -> Json<PersonaStatusResponse> {
    let persona = &state.config.persona;
    Json(PersonaStatusResponse {
        status: persona.availability_status,
        message: persona.away_message.clone(),
        handoff_available: persona.handoff_link("").is_some(),
    })
}
