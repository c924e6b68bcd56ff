//! REST API handlers for the operational server
//!
//! This module defines the API routes and handlers for inspecting and
//! driving the rotation from the back office.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rotation::{RotationError, RotationState, DEFAULT_RECENT_LIMIT};

use super::server::AppState;

/// Upper bound on the `limit` query parameter for stats listings
const MAX_RECENT_LIMIT: usize = 50;

// ============================================================================
// API Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Structured error response with a correlation id for log lookups
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub correlation_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            correlation_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Map a rotation error to a status code plus structured body
fn rotation_error_response(err: &RotationError) -> (StatusCode, Json<ErrorBody>) {
    let status = match err {
        RotationError::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = ErrorBody::new(err.to_string());
    tracing::error!(
        correlation_id = %body.correlation_id,
        error = %err,
        "rotation operation failed"
    );

    (status, Json(body))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Rotation state response
#[derive(Debug, Serialize)]
pub struct RotationStateResponse {
    pub current_index: usize,
    pub last_category: Option<String>,
    pub last_run: Option<DateTime<Utc>>,
    pub next_category: String,
    pub categories: Vec<String>,
}

impl RotationStateResponse {
    fn from_state(state: &RotationState, categories: Vec<String>) -> Self {
        Self {
            current_index: state.current_index,
            last_category: state.last_category.map(|c| c.as_str().to_string()),
            last_run: state.last_run_at,
            next_category: state.next_category.as_str().to_string(),
            categories,
        }
    }
}

/// Clear response
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub deleted: u64,
}

/// Query parameters for the stats endpoint
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub limit: Option<usize>,
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/rotation/state", get(get_rotation_state))
        .route("/api/rotation/run", post(run_rotation))
        .route("/api/rotation/stats", get(get_rotation_stats))
        .route("/api/rotation/clear", post(clear_rotation))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();

    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime,
    }))
}

/// Get the derived rotation state
async fn get_rotation_state(State(state): State<AppState>) -> axum::response::Response {
    let categories = state
        .scheduler
        .ring()
        .categories()
        .iter()
        .map(|c| c.as_str().to_string())
        .collect();

    match state.scheduler.current_state().await {
        Ok(rotation_state) => (
            StatusCode::OK,
            Json(ApiResponse::success(RotationStateResponse::from_state(
                &rotation_state,
                categories,
            ))),
        )
            .into_response(),
        Err(e) => rotation_error_response(&e).into_response(),
    }
}

/// Execute one rotation run now
async fn run_rotation(State(state): State<AppState>) -> axum::response::Response {
    match state.scheduler.run_once().await {
        Ok(result) => (StatusCode::OK, Json(ApiResponse::success(result))).into_response(),
        Err(e) => rotation_error_response(&e).into_response(),
    }
}

/// Get automation post statistics
async fn get_rotation_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> axum::response::Response {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(MAX_RECENT_LIMIT);

    match state.scheduler.stats(limit).await {
        Ok(stats) => (StatusCode::OK, Json(ApiResponse::success(stats))).into_response(),
        Err(e) => rotation_error_response(&e).into_response(),
    }
}

/// Delete all automation posts
async fn clear_rotation(State(state): State<AppState>) -> axum::response::Response {
    match state.scheduler.clear_all().await {
        Ok(deleted) => (
            StatusCode::OK,
            Json(ApiResponse::success(ClearResponse { deleted })),
        )
            .into_response(),
        Err(e) => rotation_error_response(&e).into_response(),
    }
}
