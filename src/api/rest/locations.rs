use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::engine::dispatcher;
use crate::error::AppError;
use crate::models::location::Location;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/locations", get(list_locations))
        .route("/locations/:name/availability", patch(adjust_availability))
}

#[derive(Deserialize)]
pub struct AdjustAvailabilityRequest {
    pub delta: i32,
}

#[derive(Serialize)]
pub struct AdjustAvailabilityResponse {
    pub name: String,
    pub old_available: u32,
    pub new_available: u32,
}

async fn list_locations(State(state): State<Arc<AppState>>) -> Json<Vec<Location>> {
    Json(state.catalog.snapshot_all())
}

/// Explicit external availability update. Drives the same dispatch path as
/// the simulator, so bound sessions get rerouted or warned just the same.
async fn adjust_availability(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(payload): Json<AdjustAvailabilityRequest>,
) -> Result<Json<AdjustAvailabilityResponse>, AppError> {
    let (old, new) = state
        .catalog
        .adjust_availability(&name, payload.delta)
        .ok_or_else(|| AppError::UnknownLocation(name.clone()))?;

    state
        .metrics
        .location_availability
        .with_label_values(&[&name])
        .set(f64::from(new));

    if old != new {
        if let Some(changed) = state.catalog.get(&name) {
            dispatcher::on_availability_changed(&state, &changed, old, new);
        }
    }

    Ok(Json(AdjustAvailabilityResponse {
        name,
        old_available: old,
        new_available: new,
    }))
}
