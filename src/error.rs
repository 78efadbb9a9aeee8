use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no parking available")]
    NoAvailability,

    #[error("unknown location: {0}")]
    UnknownLocation(String),

    #[error("invalid trip: {0}")]
    InvalidTrip(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NoAvailability => (
                StatusCode::SERVICE_UNAVAILABLE,
                "no parking available".to_string(),
            ),
            AppError::UnknownLocation(name) => {
                (StatusCode::NOT_FOUND, format!("unknown location: {name}"))
            }
            AppError::InvalidTrip(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
