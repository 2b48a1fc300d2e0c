use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatResponse {
    pub answer: String,
}

/// `POST /chatbot/ask`
///
/// Always answer-shaped on model trouble; only a store failure becomes a 5xx.
pub(super) async fn ask(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Some(chat) = &state.chat else {
        return Ok(Json(ChatResponse {
            answer: "The chatbot is not configured on this server.".to_string(),
        }));
    };

    let answer = chat.ask(&request.question).await.map_err(|e| {
        tracing::error!(error = %e, "chat retrieval failed");
        ApiError::new(req_id.0, "internal_error", "could not reach the article store")
    })?;

    Ok(Json(ChatResponse { answer }))
}
