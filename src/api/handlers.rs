use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::dispatch::dispatch;
use crate::error::BfhlError;
use crate::AppState;

use super::models::{BfhlResponse, ErrorResponse, HealthResponse, IndexResponse, RouteInfo};

pub async fn bfhl(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<BfhlResponse>) {
    let result = match payload {
        Ok(Json(body)) => dispatch(&body, &state.ai).await,
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "unreadable request body");
            Err(BfhlError::bad_request("Request body must be a valid JSON object"))
        }
    };

    match result {
        Ok(data) => (
            StatusCode::OK,
            Json(BfhlResponse::success(&state.official_email, data)),
        ),
        Err(err) => {
            tracing::info!(error = %err, "bfhl request failed");
            (
                StatusCode::BAD_REQUEST,
                Json(BfhlResponse::failure(&state.official_email, err.to_string())),
            )
        }
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        is_success: true,
        official_email: state.official_email.to_string(),
    })
}

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "BFHL API",
        routes: vec![
            RouteInfo {
                method: "POST",
                path: "/bfhl",
                description: "Run one of: fibonacci, prime, lcm, hcf, AI",
            },
            RouteInfo {
                method: "GET",
                path: "/health",
                description: "Liveness check",
            },
        ],
    })
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            is_success: false,
            error: "Endpoint not found".to_string(),
        }),
    )
        .into_response()
}
