use std::env;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerturbScope {
    /// Every location gets a fresh random delta each tick.
    AllLocations,
    /// A single randomly chosen location is perturbed each tick.
    SingleRandom,
}

/// Availability simulator tuning. Two presets exist because both were observed
/// in deployments; neither is more correct than the other.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub tick: Duration,
    pub delta_max: i32,
    pub scope: PerturbScope,
}

impl SimulatorConfig {
    pub fn sweep() -> Self {
        Self {
            tick: Duration::from_secs(8),
            delta_max: 5,
            scope: PerturbScope::AllLocations,
        }
    }

    pub fn single_random() -> Self {
        Self {
            tick: Duration::from_secs(15),
            delta_max: 10,
            scope: PerturbScope::SingleRandom,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub event_buffer_size: usize,
    pub simulator: SimulatorConfig,
    /// Ledger entries older than this are ignored for notification purposes.
    pub staleness_secs: u64,
    /// Minimum gap between non-mandatory notifications to one session.
    pub cooldown_secs: u64,
    /// Cost deltas below this are omitted from impact summaries.
    pub cost_materiality: f64,
    /// Walk-distance materiality for forced reroutes.
    pub reroute_walk_materiality_m: f64,
    /// Walk-distance materiality for alternative reasons.
    pub alternative_walk_materiality_m: f64,
    /// A better alternative must be further than this from the user's last
    /// known position before it is worth interrupting them.
    pub alternative_distance_m: f64,
    /// ...and must save more than this over the trip duration.
    pub alternative_saving: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let mut simulator = match env::var("SIM_PRESET").as_deref() {
            Ok("single") => SimulatorConfig::single_random(),
            _ => SimulatorConfig::sweep(),
        };
        if let Ok(raw) = env::var("SIM_TICK_SECONDS") {
            simulator.tick = Duration::from_secs(
                raw.parse()
                    .map_err(|err| AppError::Internal(format!("invalid SIM_TICK_SECONDS: {err}")))?,
            );
        }
        if let Ok(raw) = env::var("SIM_DELTA_MAX") {
            simulator.delta_max = raw
                .parse()
                .map_err(|err| AppError::Internal(format!("invalid SIM_DELTA_MAX: {err}")))?;
        }

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            simulator,
            staleness_secs: parse_or_default("RECOMMENDATION_STALENESS_SECS", 300)?,
            cooldown_secs: parse_or_default("NOTIFY_COOLDOWN_SECS", 10)?,
            cost_materiality: parse_or_default("COST_MATERIALITY", 0.5)?,
            reroute_walk_materiality_m: parse_or_default("REROUTE_WALK_MATERIALITY_M", 30.0)?,
            alternative_walk_materiality_m: parse_or_default("ALT_WALK_MATERIALITY_M", 50.0)?,
            alternative_distance_m: parse_or_default("ALT_DISTANCE_M", 200.0)?,
            alternative_saving: parse_or_default("ALT_SAVING", 1.0)?,
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
