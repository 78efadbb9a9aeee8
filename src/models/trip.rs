use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::location::GeoPoint;

/// One parking request: where the user is, where they are going, and for how
/// long they need parking. Validated before any scoring happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub user: GeoPoint,
    pub destination: GeoPoint,
    pub duration_hours: f64,
    #[serde(default)]
    pub username: Option<String>,
    /// Price-versus-distance emphasis in [0, 1]; 0.3 when unset.
    #[serde(default)]
    pub price_weight: Option<f64>,
}

impl Trip {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_point(&self.user, "user")?;
        validate_point(&self.destination, "destination")?;

        if !self.duration_hours.is_finite() || self.duration_hours <= 0.0 {
            return Err(AppError::InvalidTrip(format!(
                "duration_hours must be > 0, got {}",
                self.duration_hours
            )));
        }

        if let Some(weight) = self.price_weight {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(AppError::InvalidTrip(format!(
                    "price_weight must be within [0, 1], got {weight}"
                )));
            }
        }

        Ok(())
    }
}

fn validate_point(point: &GeoPoint, field: &str) -> Result<(), AppError> {
    if !point.lat.is_finite() || !point.lng.is_finite() {
        return Err(AppError::InvalidTrip(format!(
            "{field} coordinates must be finite"
        )));
    }

    if !(-90.0..=90.0).contains(&point.lat) || !(-180.0..=180.0).contains(&point.lng) {
        return Err(AppError::InvalidTrip(format!(
            "{field} coordinates out of range: ({}, {})",
            point.lat, point.lng
        )));
    }

    Ok(())
}
