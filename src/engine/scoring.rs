use crate::geo::distance_meters;
use crate::models::location::Location;
use crate::models::trip::Trip;

pub const DEFAULT_PRICE_WEIGHT: f64 = 0.3;

/// Walking a meter costs the user roughly twice what driving one does.
const WALK_BURDEN_FACTOR: f64 = 2.0;
const LOW_AVAILABILITY_THRESHOLD: u32 = 20;
const LOW_AVAILABILITY_PENALTY: f64 = 1.5;

#[derive(Debug, Clone, Copy)]
pub struct ParkingScore {
    /// Lower is better.
    pub total: f64,
    pub drive_distance_m: f64,
    pub walk_distance_m: f64,
}

/// Ranks one location against one trip. Pure and deterministic; callers are
/// responsible for excluding locations with no free capacity.
pub fn score_location(location: &Location, trip: &Trip) -> ParkingScore {
    let drive_distance_m = distance_meters(&trip.user, &location.position);
    let walk_distance_m = distance_meters(&location.position, &trip.destination);

    let burden = drive_distance_m + WALK_BURDEN_FACTOR * walk_distance_m;
    let penalty = if location.available_spots <= LOW_AVAILABILITY_THRESHOLD {
        LOW_AVAILABILITY_PENALTY
    } else {
        1.0
    };
    let price_weight = trip.price_weight.unwrap_or(DEFAULT_PRICE_WEIGHT);

    let total =
        ((1.0 - price_weight) * burden + price_weight * location.price_per_hour * 100.0) * penalty;

    ParkingScore {
        total,
        drive_distance_m,
        walk_distance_m,
    }
}
