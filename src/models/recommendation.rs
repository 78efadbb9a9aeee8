use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::{Category, GeoPoint};

/// Full detail of one recommended location as presented to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingDetail {
    pub name: String,
    pub address: String,
    pub category: Category,
    pub position: GeoPoint,
    pub price_per_hour: f64,
    pub estimated_cost: f64,
    pub available_spots: u32,
    pub total_spots: u32,
    pub payment_methods: Vec<String>,
    pub drive_distance: String,
    pub walk_distance: String,
}

/// A runner-up option with a human-readable reason comparing it to the best.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alternative {
    pub name: String,
    pub address: String,
    pub price_per_hour: f64,
    pub estimated_cost: f64,
    pub available_spots: u32,
    pub drive_distance: String,
    pub walk_distance: String,
    pub reason: String,
}

/// Turn-by-turn leg of the journey, either from a directions provider or the
/// straight-line fallback (duration "Unknown" in that case).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlan {
    pub steps: Vec<String>,
    pub duration: String,
    pub distance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub session_id: Uuid,
    pub best_parking: ParkingDetail,
    pub directions_to_parking: RoutePlan,
    pub walk_to_destination: RoutePlan,
    pub alternatives: Vec<Alternative>,
    pub score: f64,
    pub timestamp: DateTime<Utc>,
}
