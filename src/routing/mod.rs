use thiserror::Error;
use tracing::debug;

use crate::geo::{distance_meters, format_distance};
use crate::models::location::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TravelMode {
    Driving,
    Walking,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub steps: Vec<String>,
    /// `None` when only a straight-line estimate is available.
    pub duration_seconds: Option<u64>,
    pub distance_meters: f64,
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("directions provider unavailable: {0}")]
    Unavailable(String),
}

/// Seam for the external directions lookup. Implementations may fail; callers
/// go through [`route_or_fallback`], which never does.
pub trait Directions: Send + Sync {
    fn route(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        mode: TravelMode,
    ) -> Result<Route, RouteError>;
}

/// The default when no external provider is wired up; every lookup takes the
/// straight-line fallback path.
pub struct NoDirectionsProvider;

impl Directions for NoDirectionsProvider {
    fn route(
        &self,
        _origin: &GeoPoint,
        _destination: &GeoPoint,
        _mode: TravelMode,
    ) -> Result<Route, RouteError> {
        Err(RouteError::Unavailable(
            "no directions provider configured".to_string(),
        ))
    }
}

/// Queries the provider and falls back to a straight-line estimate with a
/// single synthesized instruction and unknown duration. Provider errors never
/// propagate further than this function.
pub fn route_or_fallback(
    provider: &dyn Directions,
    origin: &GeoPoint,
    destination: &GeoPoint,
    mode: TravelMode,
    target: &str,
) -> Route {
    match provider.route(origin, destination, mode) {
        Ok(route) => route,
        Err(err) => {
            debug!(error = %err, target, "directions lookup failed; using straight-line estimate");

            let distance = distance_meters(origin, destination);
            let verb = match mode {
                TravelMode::Driving => "Drive",
                TravelMode::Walking => "Walk",
            };

            Route {
                steps: vec![format!(
                    "{verb} approximately {} to {target}",
                    format_distance(distance)
                )],
                duration_seconds: None,
                distance_meters: distance,
            }
        }
    }
}
