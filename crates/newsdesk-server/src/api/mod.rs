mod chat;
mod highlights;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use newsdesk_chat::ChatService;
use newsdesk_core::AppConfig;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    /// Absent when the generative-model credentials are not configured; the
    /// highlight endpoints work regardless.
    pub chat: Option<Arc<ChatService>>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub request_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            request_id: request_id.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &newsdesk_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<HealthData>, ApiError> {
    newsdesk_db::health_check(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0, &e))?;

    Ok(Json(HealthData {
        status: "ok",
        database: "reachable",
    }))
}

/// Build the HTTP application: highlight retrieval, chatbot, health.
///
/// CORS is permissive; the dashboard is served from a different origin,
/// exactly like the backend this replaces.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/highlights", get(highlights::get_highlights))
        .route("/chatbot/ask", post(chat::ask))
        .route("/health", get(health))
        .layer(axum_middleware::from_fn(request_id))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
