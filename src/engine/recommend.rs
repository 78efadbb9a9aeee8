use chrono::Utc;
use uuid::Uuid;

use crate::catalog::CatalogStore;
use crate::engine::scoring::score_location;
use crate::error::AppError;
use crate::geo::{format_distance, format_duration};
use crate::models::location::Location;
use crate::models::recommendation::{
    Alternative, ParkingDetail, RecommendationResponse, RoutePlan,
};
use crate::models::trip::Trip;
use crate::routing::{route_or_fallback, Route, TravelMode};
use crate::state::AppState;

const MAX_ROUTE_STEPS: usize = 10;
const LONG_WALK_WARNING_M: f64 = 500.0;

/// One location ranked against one trip. Never persisted; recomputed per
/// request.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub location: Location,
    pub score: f64,
    pub drive_distance_m: f64,
    pub walk_distance_m: f64,
}

impl ScoredCandidate {
    pub fn estimated_cost(&self, duration_hours: f64) -> f64 {
        round_cents(self.location.price_per_hour * duration_hours)
    }
}

/// Scores every location with free capacity and returns the top `n`, best
/// first. The sort is stable, so equal scores keep catalog order.
pub fn recommend(
    catalog: &CatalogStore,
    trip: &Trip,
    n: usize,
) -> Result<Vec<ScoredCandidate>, AppError> {
    let available = catalog.snapshot_available();
    if available.is_empty() {
        return Err(AppError::NoAvailability);
    }

    let mut candidates: Vec<ScoredCandidate> = available
        .into_iter()
        .map(|location| {
            let score = score_location(&location, trip);
            ScoredCandidate {
                location,
                score: score.total,
                drive_distance_m: score.drive_distance_m,
                walk_distance_m: score.walk_distance_m,
            }
        })
        .collect();

    candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
    candidates.truncate(n);

    Ok(candidates)
}

pub fn find_best(catalog: &CatalogStore, trip: &Trip) -> Result<ScoredCandidate, AppError> {
    recommend(catalog, trip, 1)?
        .into_iter()
        .next()
        .ok_or(AppError::NoAvailability)
}

/// Answers a trip request: ranks the catalog, fetches directions for the best
/// option, explains up to two alternatives, and records the recommendation in
/// the ledger for later change detection.
pub fn build_recommendation(
    state: &AppState,
    session_id: Uuid,
    trip: &Trip,
) -> Result<RecommendationResponse, AppError> {
    let top = recommend(&state.catalog, trip, 3)?;
    let best = &top[0];

    let drive_route = route_or_fallback(
        state.directions.as_ref(),
        &trip.user,
        &best.location.position,
        TravelMode::Driving,
        &best.location.name,
    );
    let walk_route = route_or_fallback(
        state.directions.as_ref(),
        &best.location.position,
        &trip.destination,
        TravelMode::Walking,
        "destination",
    );

    let alternatives = top[1..]
        .iter()
        .map(|alt| {
            let reason = alternative_reason(state, best, alt, trip.duration_hours);
            Alternative {
                name: alt.location.name.clone(),
                address: alt.location.address.clone(),
                price_per_hour: alt.location.price_per_hour,
                estimated_cost: alt.estimated_cost(trip.duration_hours),
                available_spots: alt.location.available_spots,
                drive_distance: format_distance(alt.drive_distance_m),
                walk_distance: format_distance(alt.walk_distance_m),
                reason,
            }
        })
        .collect();

    state
        .ledger
        .record(session_id, trip, &best.location.name, best.walk_distance_m);

    Ok(RecommendationResponse {
        session_id,
        best_parking: parking_detail(best, trip.duration_hours),
        directions_to_parking: route_plan(&drive_route, TravelMode::Driving),
        walk_to_destination: route_plan(&walk_route, TravelMode::Walking),
        alternatives,
        score: best.score,
        timestamp: Utc::now(),
    })
}

pub fn parking_detail(candidate: &ScoredCandidate, duration_hours: f64) -> ParkingDetail {
    ParkingDetail {
        name: candidate.location.name.clone(),
        address: candidate.location.address.clone(),
        category: candidate.location.category,
        position: candidate.location.position,
        price_per_hour: candidate.location.price_per_hour,
        estimated_cost: candidate.estimated_cost(duration_hours),
        available_spots: candidate.location.available_spots,
        total_spots: candidate.location.total_spots,
        payment_methods: candidate.location.payment_methods.clone(),
        drive_distance: format_distance(candidate.drive_distance_m),
        walk_distance: format_distance(candidate.walk_distance_m),
    }
}

fn route_plan(route: &Route, mode: TravelMode) -> RoutePlan {
    let warning = match mode {
        TravelMode::Walking if route.distance_meters > LONG_WALK_WARNING_M => {
            Some("Long walk ahead".to_string())
        }
        _ => None,
    };

    RoutePlan {
        steps: route.steps.iter().take(MAX_ROUTE_STEPS).cloned().collect(),
        duration: route
            .duration_seconds
            .map(format_duration)
            .unwrap_or_else(|| "Unknown".to_string()),
        distance: format_distance(route.distance_meters),
        warning,
    }
}

fn alternative_reason(
    state: &AppState,
    best: &ScoredCandidate,
    alt: &ScoredCandidate,
    duration_hours: f64,
) -> String {
    let cost_diff = alt.estimated_cost(duration_hours) - best.estimated_cost(duration_hours);
    let walk_diff = alt.walk_distance_m - best.walk_distance_m;

    let mut parts = Vec::new();
    if cost_diff.abs() > state.config.cost_materiality {
        if cost_diff < 0.0 {
            parts.push(format!("saves ${:.2}", cost_diff.abs()));
        } else {
            parts.push(format!("costs ${cost_diff:.2} more"));
        }
    }
    if walk_diff.abs() > state.config.alternative_walk_materiality_m {
        let direction = if walk_diff < 0.0 { "shorter" } else { "longer" };
        parts.push(format!(
            "{} {direction} walk",
            format_distance(walk_diff.abs())
        ));
    }

    if parts.is_empty() {
        "similar option".to_string()
    } else {
        parts.join(", ")
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{build_recommendation, find_best, recommend};
    use crate::catalog::{default_locations, CatalogStore};
    use crate::config::{Config, SimulatorConfig};
    use crate::error::AppError;
    use crate::models::location::GeoPoint;
    use crate::models::trip::Trip;
    use crate::state::AppState;

    fn test_config() -> Config {
        Config {
            http_port: 0,
            log_level: "debug".to_string(),
            event_buffer_size: 16,
            simulator: SimulatorConfig::sweep(),
            staleness_secs: 300,
            cooldown_secs: 10,
            cost_materiality: 0.5,
            reroute_walk_materiality_m: 30.0,
            alternative_walk_materiality_m: 50.0,
            alternative_distance_m: 200.0,
            alternative_saving: 1.0,
        }
    }

    fn oakland_trip() -> Trip {
        Trip {
            user: GeoPoint {
                lat: 40.4400,
                lng: -79.9950,
            },
            destination: GeoPoint {
                lat: 40.4425,
                lng: -79.9945,
            },
            duration_hours: 2.0,
            username: None,
            price_weight: Some(0.3),
        }
    }

    #[test]
    fn default_catalog_ranks_all_four_locations() {
        let catalog = CatalogStore::with_defaults();
        let ranked = recommend(&catalog, &oakland_trip(), 10).unwrap();

        assert_eq!(ranked.len(), 4);
        for pair in ranked.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }

        let top3 = recommend(&catalog, &oakland_trip(), 3).unwrap();
        assert_eq!(top3.len(), 3);
        assert_eq!(top3[0].location.name, ranked[0].location.name);
    }

    #[test]
    fn locations_without_capacity_are_never_recommended() {
        let catalog = CatalogStore::with_defaults();
        catalog.adjust_availability("Garage B", -1000);

        let ranked = recommend(&catalog, &oakland_trip(), 10).unwrap();
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|c| c.location.name != "Garage B"));
        assert!(ranked.iter().all(|c| c.location.available_spots > 0));
    }

    #[test]
    fn empty_catalog_signals_no_availability() {
        let catalog = CatalogStore::with_defaults();
        for name in catalog.names() {
            catalog.adjust_availability(&name, -1000);
        }

        assert!(matches!(
            recommend(&catalog, &oakland_trip(), 3),
            Err(AppError::NoAvailability)
        ));
        assert!(matches!(
            find_best(&catalog, &oakland_trip()),
            Err(AppError::NoAvailability)
        ));
    }

    #[test]
    fn equal_scores_keep_catalog_order() {
        let mut locations = default_locations();
        let mut twin = locations[0].clone();
        twin.name = "Garage A Annex".to_string();
        locations.insert(1, twin);
        let catalog = CatalogStore::new(locations);

        let ranked = recommend(&catalog, &oakland_trip(), 10).unwrap();
        let first = ranked
            .iter()
            .position(|c| c.location.name == "Garage A")
            .unwrap();
        let second = ranked
            .iter()
            .position(|c| c.location.name == "Garage A Annex")
            .unwrap();
        assert!(first < second);
    }

    #[test]
    fn payload_carries_alternatives_and_records_the_ledger() {
        let state = AppState::new(test_config());
        let session = Uuid::new_v4();
        let trip = oakland_trip();

        let response = build_recommendation(&state, session, &trip).unwrap();

        assert_eq!(response.session_id, session);
        assert_eq!(response.alternatives.len(), 2);
        assert!(response.alternatives.iter().all(|a| !a.reason.is_empty()));
        assert!(response.directions_to_parking.steps.len() <= 10);
        assert_eq!(response.directions_to_parking.duration, "Unknown");
        assert_eq!(
            response.best_parking.estimated_cost,
            response.best_parking.price_per_hour * 2.0
        );

        let recorded = state.ledger.for_location(&response.best_parking.name);
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].session_id, session);
    }

    #[test]
    fn long_walks_are_flagged() {
        let mut locations = default_locations();
        // Keep only Garage A and push the destination far away from it.
        locations.truncate(1);
        let state = AppState::with_catalog(test_config(), CatalogStore::new(locations));

        let mut trip = oakland_trip();
        trip.destination = GeoPoint {
            lat: 40.4500,
            lng: -79.9850,
        };

        let response = build_recommendation(&state, Uuid::new_v4(), &trip).unwrap();
        assert_eq!(
            response.walk_to_destination.warning.as_deref(),
            Some("Long walk ahead")
        );
    }
}
