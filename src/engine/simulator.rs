use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::config::{PerturbScope, SimulatorConfig};
use crate::engine::dispatcher;
use crate::state::AppState;

/// Background task perturbing availability counts forever. This is the sole
/// writer of availability state apart from the explicit REST adjustment.
pub async fn run_availability_simulator(state: Arc<AppState>) {
    let sim = state.config.simulator.clone();
    info!(
        tick_secs = sim.tick.as_secs(),
        delta_max = sim.delta_max,
        scope = ?sim.scope,
        "availability simulator started"
    );

    let mut interval = tokio::time::interval(sim.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        tick(&state, &sim);
        dispatcher::sweep_better_alternatives(&state);
    }
}

/// One simulation step: pick locations per the configured scope, apply random
/// deltas, and hand every real change to the dispatcher.
pub fn tick(state: &AppState, sim: &SimulatorConfig) {
    let mut rng = rand::thread_rng();

    let names = match sim.scope {
        PerturbScope::AllLocations => state.catalog.names(),
        PerturbScope::SingleRandom => state
            .catalog
            .names()
            .choose(&mut rng)
            .cloned()
            .into_iter()
            .collect(),
    };

    for name in names {
        let delta = rng.gen_range(-sim.delta_max..=sim.delta_max);
        let Some((old, new)) = state.catalog.adjust_availability(&name, delta) else {
            continue;
        };

        state
            .metrics
            .location_availability
            .with_label_values(&[&name])
            .set(f64::from(new));

        if old != new {
            debug!(location = %name, old, new, "availability changed");
            if let Some(changed) = state.catalog.get(&name) {
                dispatcher::on_availability_changed(state, &changed, old, new);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::tick;
    use crate::config::{Config, PerturbScope, SimulatorConfig};
    use crate::state::AppState;

    fn config(sim: SimulatorConfig) -> Config {
        Config {
            http_port: 0,
            log_level: "debug".to_string(),
            event_buffer_size: 16,
            simulator: sim,
            staleness_secs: 300,
            cooldown_secs: 10,
            cost_materiality: 0.5,
            reroute_walk_materiality_m: 30.0,
            alternative_walk_materiality_m: 50.0,
            alternative_distance_m: 200.0,
            alternative_saving: 1.0,
        }
    }

    #[test]
    fn ticks_keep_every_location_within_bounds() {
        let state = AppState::new(config(SimulatorConfig::sweep()));
        let sim = state.config.simulator.clone();

        for _ in 0..200 {
            tick(&state, &sim);
            for location in state.catalog.snapshot_all() {
                assert!(location.available_spots <= location.total_spots);
            }
        }
    }

    #[test]
    fn single_random_scope_touches_at_most_one_location() {
        let state = AppState::new(config(SimulatorConfig {
            tick: Duration::from_secs(15),
            delta_max: 10,
            scope: PerturbScope::SingleRandom,
        }));
        let sim = state.config.simulator.clone();

        let before = state.catalog.snapshot_all();
        tick(&state, &sim);
        let after = state.catalog.snapshot_all();

        let changed = before
            .iter()
            .zip(after.iter())
            .filter(|(b, a)| b.available_spots != a.available_spots)
            .count();
        assert!(changed <= 1);
    }
}
