use std::sync::Mutex;

use crate::models::location::{Category, GeoPoint, Location};

/// The mutable set of parking locations. Order is display-stable. All reads
/// hand out owned snapshots so callers never hold the lock while scoring.
pub struct CatalogStore {
    locations: Mutex<Vec<Location>>,
}

impl CatalogStore {
    pub fn new(locations: Vec<Location>) -> Self {
        Self {
            locations: Mutex::new(locations),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_locations())
    }

    /// Consistent point-in-time copy of every location with free capacity.
    pub fn snapshot_available(&self) -> Vec<Location> {
        self.locations
            .lock()
            .expect("catalog mutex poisoned")
            .iter()
            .filter(|location| location.available_spots > 0)
            .cloned()
            .collect()
    }

    pub fn snapshot_all(&self) -> Vec<Location> {
        self.locations
            .lock()
            .expect("catalog mutex poisoned")
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Location> {
        self.locations
            .lock()
            .expect("catalog mutex poisoned")
            .iter()
            .find(|location| location.name == name)
            .cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.locations
            .lock()
            .expect("catalog mutex poisoned")
            .iter()
            .map(|location| location.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.locations.lock().expect("catalog mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Atomically adds `delta` to one location's availability, clamped to
    /// `[0, total_spots]`. Returns `(old, new)`, or `None` for unknown names
    /// (the adjustment is then a no-op).
    pub fn adjust_availability(&self, name: &str, delta: i32) -> Option<(u32, u32)> {
        let mut locations = self.locations.lock().expect("catalog mutex poisoned");
        let location = locations.iter_mut().find(|location| location.name == name)?;

        let old = location.available_spots;
        let new = (i64::from(old) + i64::from(delta)).clamp(0, i64::from(location.total_spots));
        location.available_spots = new as u32;

        Some((old, location.available_spots))
    }
}

/// The fixed Oakland-area catalog the service ships with.
pub fn default_locations() -> Vec<Location> {
    vec![
        Location {
            name: "Garage A".to_string(),
            address: "123 Forbes Ave".to_string(),
            position: GeoPoint {
                lat: 40.4405,
                lng: -79.9959,
            },
            price_per_hour: 3.0,
            total_spots: 100,
            available_spots: 45,
            category: Category::Garage,
            payment_methods: vec!["credit_card".to_string(), "app".to_string()],
            hours: "24/7".to_string(),
        },
        Location {
            name: "Garage B".to_string(),
            address: "456 Fifth Ave".to_string(),
            position: GeoPoint {
                lat: 40.4415,
                lng: -79.9930,
            },
            price_per_hour: 2.0,
            total_spots: 150,
            available_spots: 80,
            category: Category::Garage,
            payment_methods: vec!["credit_card".to_string(), "cash".to_string()],
            hours: "6am-12am".to_string(),
        },
        Location {
            name: "Garage C".to_string(),
            address: "789 Penn Ave".to_string(),
            position: GeoPoint {
                lat: 40.4420,
                lng: -79.9965,
            },
            price_per_hour: 1.5,
            total_spots: 75,
            available_spots: 20,
            category: Category::Garage,
            payment_methods: vec![
                "credit_card".to_string(),
                "app".to_string(),
                "cash".to_string(),
            ],
            hours: "24/7".to_string(),
        },
        Location {
            name: "Street Parking Zone".to_string(),
            address: "Oakland District".to_string(),
            position: GeoPoint {
                lat: 40.4430,
                lng: -79.9940,
            },
            price_per_hour: 2.5,
            total_spots: 30,
            available_spots: 5,
            category: Category::Street,
            payment_methods: vec!["meter".to_string(), "app".to_string()],
            hours: "8am-8pm (free after)".to_string(),
        },
    ]
}
