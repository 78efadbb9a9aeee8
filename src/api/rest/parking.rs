use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::engine::recommend::build_recommendation;
use crate::error::AppError;
use crate::models::recommendation::RecommendationResponse;
use crate::models::trip::Trip;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/parking", post(request_parking))
}

#[derive(Deserialize)]
pub struct ParkingRequest {
    /// Reuse the id from an open push channel; generated when absent.
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(flatten)]
    pub trip: Trip,
}

async fn request_parking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ParkingRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    payload.trip.validate()?;

    let session_id = payload.session_id.unwrap_or_else(Uuid::new_v4);
    let start = Instant::now();
    let result = build_recommendation(&state, session_id, &payload.trip);

    let outcome = if result.is_ok() { "success" } else { "error" };
    state
        .metrics
        .recommendation_latency_seconds
        .with_label_values(&[outcome])
        .observe(start.elapsed().as_secs_f64());
    state
        .metrics
        .recommendations_total
        .with_label_values(&[outcome])
        .inc();

    let response = result?;

    info!(
        %session_id,
        best = %response.best_parking.name,
        score = response.score,
        "recommendation issued"
    );

    Ok(Json(response))
}
