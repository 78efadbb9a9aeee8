use chrono::{Duration, Utc};
use tracing::{error, info};

use crate::engine::recommend::{find_best, parking_detail};
use crate::error::AppError;
use crate::geo::format_distance;
use crate::ledger::ActiveRecommendation;
use crate::models::location::Location;
use crate::models::notification::{Notification, NotificationEvent};
use crate::state::AppState;

/// Below this many remaining spots the client gets a heads-up even though the
/// recommendation still stands.
const LOW_SPOTS_WARNING: u32 = 5;
/// Rough walking pace used to translate walk-distance deltas into time.
const WALKING_PACE_M_PER_MIN: f64 = 80.0;

/// Reacts to one availability change. Sessions whose active recommendation
/// points at the changed location either get rerouted (location full; bypasses
/// the cooldown) or warned (availability crossed below the warning line).
pub fn on_availability_changed(state: &AppState, location: &Location, old: u32, new: u32) {
    for rec in state.ledger.for_location(&location.name) {
        if new == 0 {
            reroute_full(state, &rec, location);
        } else if new < LOW_SPOTS_WARNING && old >= LOW_SPOTS_WARNING {
            info!(
                session_id = %rec.session_id,
                location = %location.name,
                spots_remaining = new,
                "low availability warning"
            );
            state.emit(Notification {
                session_id: rec.session_id,
                event: NotificationEvent::Warning {
                    title: "Filling Up Fast".to_string(),
                    message: format!(
                        "{} only has {new} spots left. You may want to hurry or consider alternatives.",
                        location.name
                    ),
                    location: location.name.clone(),
                    spots_remaining: new,
                },
            });
        }
    }
}

fn reroute_full(state: &AppState, rec: &ActiveRecommendation, full_location: &Location) {
    let best = match find_best(&state.catalog, &rec.trip) {
        Ok(best) => best,
        Err(AppError::NoAvailability) => {
            // Leave the ledger entry alone; the next successful recompute
            // overwrites it.
            state.emit(Notification {
                session_id: rec.session_id,
                event: NotificationEvent::Error {
                    message: "No parking available: all locations are currently full.".to_string(),
                },
            });
            return;
        }
        Err(err) => {
            error!(session_id = %rec.session_id, error = %err, "reroute recompute failed");
            return;
        }
    };

    let cost_diff =
        (best.location.price_per_hour - full_location.price_per_hour) * rec.trip.duration_hours;
    let walk_diff = best.walk_distance_m - rec.walk_distance_m;
    let impact = impact_summary(
        cost_diff,
        walk_diff,
        state.config.cost_materiality,
        state.config.reroute_walk_materiality_m,
    );

    info!(
        session_id = %rec.session_id,
        from = %full_location.name,
        to = %best.location.name,
        "forced reroute: location full"
    );

    state.emit(Notification {
        session_id: rec.session_id,
        event: NotificationEvent::Reroute {
            title: "Rerouting Required".to_string(),
            message: format!(
                "{} is now full. Redirecting to {}.",
                full_location.name, best.location.name
            ),
            impact,
            new_parking: parking_detail(&best, rec.trip.duration_hours),
        },
    });

    state
        .ledger
        .rebind(rec.session_id, &best.location.name, best.walk_distance_m);
}

/// The throttled reroute path: checks every live session for a meaningfully
/// better option than what it was last told. Unlike the full path, this one
/// honors the per-session cooldown and the distance/saving guards, so minor
/// fluctuations never turn into notification storms.
pub fn sweep_better_alternatives(state: &AppState) {
    let now = Utc::now();
    let cooldown = Duration::seconds(state.config.cooldown_secs as i64);

    for rec in state.ledger.live_sessions() {
        let best = match find_best(&state.catalog, &rec.trip) {
            Ok(best) => best,
            Err(_) => continue,
        };
        if best.location.name == rec.location_name {
            continue;
        }
        if now - rec.last_notified_at <= cooldown {
            continue;
        }
        if best.drive_distance_m <= state.config.alternative_distance_m {
            continue;
        }
        // Silent skip when the recorded location no longer resolves.
        let Some(current) = state.catalog.get(&rec.location_name) else {
            continue;
        };
        let saving =
            (current.price_per_hour - best.location.price_per_hour) * rec.trip.duration_hours;
        if saving <= state.config.alternative_saving {
            continue;
        }

        let walk_diff = best.walk_distance_m - rec.walk_distance_m;
        let impact = impact_summary(
            -saving,
            walk_diff,
            state.config.cost_materiality,
            state.config.alternative_walk_materiality_m,
        );

        info!(
            session_id = %rec.session_id,
            from = %rec.location_name,
            to = %best.location.name,
            saving,
            "rerouting to better alternative"
        );

        state.emit(Notification {
            session_id: rec.session_id,
            event: NotificationEvent::Reroute {
                title: "Better Option Found".to_string(),
                message: format!(
                    "A better deal is available: {} saves ${saving:.2}. Redirecting from {}.",
                    best.location.name, rec.location_name
                ),
                impact,
                new_parking: parking_detail(&best, rec.trip.duration_hours),
            },
        });

        state
            .ledger
            .rebind(rec.session_id, &best.location.name, best.walk_distance_m);
    }
}

/// Human-readable summary of how a reroute changes the journey. Differences
/// below the materiality thresholds are omitted entirely.
fn impact_summary(cost_diff: f64, walk_diff: f64, cost_materiality: f64, walk_materiality_m: f64) -> String {
    let mut parts = Vec::new();

    if cost_diff.abs() > cost_materiality {
        let direction = if cost_diff > 0.0 { "more" } else { "less" };
        parts.push(format!("${:.2} {direction}", cost_diff.abs()));
    }

    if walk_diff.abs() > walk_materiality_m {
        let direction = if walk_diff > 0.0 { "longer" } else { "shorter" };
        parts.push(format!(
            "{} {direction} walk",
            format_distance(walk_diff.abs())
        ));
    }

    let time_diff_min = walk_diff.abs() / WALKING_PACE_M_PER_MIN;
    if time_diff_min > 1.0 {
        let direction = if walk_diff > 0.0 { "more" } else { "less" };
        parts.push(format!("~{} min {direction} travel time", time_diff_min as i64));
    }

    if parts.is_empty() {
        "This will affect your journey by: minimal impact".to_string()
    } else {
        format!("This will affect your journey by: {}", parts.join(" and "))
    }
}
