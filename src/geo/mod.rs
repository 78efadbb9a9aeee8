use crate::models::location::GeoPoint;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters (haversine, spherical earth).
pub fn distance_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    EARTH_RADIUS_M * central_angle
}

pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters as i64)
    } else {
        format!("{:.1}km", meters / 1000.0)
    }
}

pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{seconds} sec")
    } else if seconds < 3600 {
        format!("{} min", seconds / 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::{distance_meters, format_distance, format_duration};
    use crate::models::location::GeoPoint;

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint {
            lat: 40.4405,
            lng: -79.9959,
        };
        assert!(distance_meters(&p, &p) < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint {
            lat: 40.4405,
            lng: -79.9959,
        };
        let b = GeoPoint {
            lat: 40.4430,
            lng: -79.9940,
        };
        let forward = distance_meters(&a, &b);
        let backward = distance_meters(&b, &a);
        assert!((forward - backward).abs() < 1e-9);
        assert!(forward > 0.0);
    }

    #[test]
    fn london_to_paris_is_around_343_km() {
        let london = GeoPoint {
            lat: 51.5074,
            lng: -0.1278,
        };
        let paris = GeoPoint {
            lat: 48.8566,
            lng: 2.3522,
        };
        let distance = distance_meters(&london, &paris);
        assert!((distance - 343_000.0).abs() < 5_000.0);
    }

    #[test]
    fn short_distances_format_in_meters() {
        assert_eq!(format_distance(842.7), "842m");
    }

    #[test]
    fn long_distances_format_in_kilometers() {
        assert_eq!(format_distance(1_340.0), "1.3km");
    }

    #[test]
    fn durations_format_by_magnitude() {
        assert_eq!(format_duration(45), "45 sec");
        assert_eq!(format_duration(720), "12 min");
        assert_eq!(format_duration(3_900), "1h 5m");
    }
}
