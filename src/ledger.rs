use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::trip::Trip;

/// What was last told to one session: the recommended location, the trip it
/// was computed for, and when. At most one entry per session.
#[derive(Debug, Clone)]
pub struct ActiveRecommendation {
    pub session_id: Uuid,
    pub username: Option<String>,
    pub location_name: String,
    pub trip: Trip,
    pub walk_distance_m: f64,
    pub issued_at: DateTime<Utc>,
    pub last_notified_at: DateTime<Utc>,
}

/// Tracks the latest active recommendation per client session. Stale entries
/// are filtered on read, never proactively deleted; only an explicit session
/// end removes them.
pub struct RecommendationLedger {
    entries: DashMap<Uuid, ActiveRecommendation>,
    staleness: Duration,
}

impl RecommendationLedger {
    pub fn new(staleness_secs: u64) -> Self {
        Self {
            entries: DashMap::new(),
            staleness: Duration::seconds(staleness_secs as i64),
        }
    }

    /// Upserts the entry for `session_id`. The initial recommendation counts
    /// as a notification for cooldown purposes.
    pub fn record(&self, session_id: Uuid, trip: &Trip, location_name: &str, walk_distance_m: f64) {
        let now = Utc::now();
        self.entries.insert(
            session_id,
            ActiveRecommendation {
                session_id,
                username: trip.username.clone(),
                location_name: location_name.to_string(),
                trip: trip.clone(),
                walk_distance_m,
                issued_at: now,
                last_notified_at: now,
            },
        );
    }

    /// Non-stale entries currently pointing at `name`.
    pub fn for_location(&self, name: &str) -> Vec<ActiveRecommendation> {
        let now = Utc::now();
        self.entries
            .iter()
            .filter(|entry| entry.location_name == name && self.is_live(entry.value(), now))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// All non-stale entries, for the better-alternative sweep.
    pub fn live_sessions(&self) -> Vec<ActiveRecommendation> {
        let now = Utc::now();
        self.entries
            .iter()
            .filter(|entry| self.is_live(entry.value(), now))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Points the session at a new location after a reroute, refreshing both
    /// timestamps. A no-op if the session disconnected in the meantime.
    pub fn rebind(&self, session_id: Uuid, location_name: &str, walk_distance_m: f64) {
        if let Some(mut entry) = self.entries.get_mut(&session_id) {
            let now = Utc::now();
            entry.location_name = location_name.to_string();
            entry.walk_distance_m = walk_distance_m;
            entry.issued_at = now;
            entry.last_notified_at = now;
        }
    }

    pub fn remove(&self, session_id: Uuid) {
        self.entries.remove(&session_id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_live(&self, entry: &ActiveRecommendation, now: DateTime<Utc>) -> bool {
        now - entry.issued_at <= self.staleness
    }

    /// Rewinds an entry's timestamps, so tests can cross the staleness and
    /// cooldown windows without sleeping.
    #[cfg(test)]
    pub fn backdate(&self, session_id: Uuid, secs: i64) {
        if let Some(mut entry) = self.entries.get_mut(&session_id) {
            entry.issued_at -= Duration::seconds(secs);
            entry.last_notified_at -= Duration::seconds(secs);
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::RecommendationLedger;
    use crate::models::location::GeoPoint;
    use crate::models::trip::Trip;

    fn trip() -> Trip {
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
            username: Some("driver".to_string()),
            price_weight: None,
        }
    }

    #[test]
    fn record_then_lookup_by_location() {
        let ledger = RecommendationLedger::new(300);
        let session = Uuid::new_v4();
        ledger.record(session, &trip(), "Garage A", 120.0);

        let hits = ledger.for_location("Garage A");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].session_id, session);
        assert_eq!(hits[0].username.as_deref(), Some("driver"));
        assert!(ledger.for_location("Garage B").is_empty());
    }

    #[test]
    fn record_is_an_upsert() {
        let ledger = RecommendationLedger::new(300);
        let session = Uuid::new_v4();
        ledger.record(session, &trip(), "Garage A", 120.0);
        ledger.record(session, &trip(), "Garage B", 80.0);

        assert_eq!(ledger.len(), 1);
        assert!(ledger.for_location("Garage A").is_empty());
        assert_eq!(ledger.for_location("Garage B").len(), 1);
    }

    #[test]
    fn stale_entries_are_filtered_not_deleted() {
        let ledger = RecommendationLedger::new(300);
        let session = Uuid::new_v4();
        ledger.record(session, &trip(), "Garage A", 120.0);
        ledger.backdate(session, 301);

        assert!(ledger.for_location("Garage A").is_empty());
        assert!(ledger.live_sessions().is_empty());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn rebind_updates_in_place() {
        let ledger = RecommendationLedger::new(300);
        let session = Uuid::new_v4();
        ledger.record(session, &trip(), "Garage A", 120.0);
        ledger.backdate(session, 200);
        ledger.rebind(session, "Garage C", 340.0);

        let hits = ledger.for_location("Garage C");
        assert_eq!(hits.len(), 1);
        assert!((hits[0].walk_distance_m - 340.0).abs() < f64::EPSILON);
        // Timestamps were refreshed, so the entry is fresh again.
        assert!(ledger.live_sessions().len() == 1);
    }

    #[test]
    fn remove_is_safe_with_a_copy_outstanding() {
        let ledger = RecommendationLedger::new(300);
        let session = Uuid::new_v4();
        ledger.record(session, &trip(), "Garage A", 120.0);

        let copy = ledger.for_location("Garage A").remove(0);
        ledger.remove(session);

        // The dispatch holding `copy` can still read it, and rebinding the
        // gone session is a no-op rather than a resurrection.
        assert_eq!(copy.location_name, "Garage A");
        ledger.rebind(session, "Garage B", 10.0);
        assert!(ledger.is_empty());
    }
}
