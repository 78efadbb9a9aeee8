use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::recommendation::ParkingDetail;

/// Push event fanned out to a single session over its notification channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// The previously recommended location no longer works; the client is
    /// redirected to a new one. Covers both the forced "now full" case and
    /// the throttled better-alternative case.
    Reroute {
        title: String,
        message: String,
        impact: String,
        new_parking: ParkingDetail,
    },
    /// The recommended location is filling up but still usable.
    Warning {
        title: String,
        message: String,
        location: String,
        spots_remaining: u32,
    },
    Error {
        message: String,
    },
}

impl NotificationEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::Reroute { .. } => "reroute",
            NotificationEvent::Warning { .. } => "warning",
            NotificationEvent::Error { .. } => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub event: NotificationEvent,
}
