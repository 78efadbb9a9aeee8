use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Garage,
    Street,
}

/// A parking facility with live availability. Names are unique within the
/// catalog and serve as the identity everywhere else in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub address: String,
    pub position: GeoPoint,
    pub price_per_hour: f64,
    pub total_spots: u32,
    pub available_spots: u32,
    pub category: Category,
    pub payment_methods: Vec<String>,
    pub hours: String,
}
