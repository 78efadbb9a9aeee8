use tokio::sync::broadcast;

use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::ledger::RecommendationLedger;
use crate::models::notification::Notification;
use crate::observability::metrics::Metrics;
use crate::routing::{Directions, NoDirectionsProvider};

pub struct AppState {
    pub catalog: CatalogStore,
    pub ledger: RecommendationLedger,
    pub notifications_tx: broadcast::Sender<Notification>,
    pub metrics: Metrics,
    pub directions: Box<dyn Directions>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_catalog(config, CatalogStore::with_defaults())
    }

    pub fn with_catalog(config: Config, catalog: CatalogStore) -> Self {
        let (notifications_tx, _unused_rx) = broadcast::channel(config.event_buffer_size);

        Self {
            catalog,
            ledger: RecommendationLedger::new(config.staleness_secs),
            notifications_tx,
            metrics: Metrics::new(),
            directions: Box::new(NoDirectionsProvider),
            config,
        }
    }

    /// Fire-and-forget fan-out. A send error only means nobody is listening;
    /// it is never retried and never rolls back ledger changes.
    pub fn emit(&self, notification: Notification) {
        self.metrics
            .notifications_total
            .with_label_values(&[notification.event.kind()])
            .inc();

        if let Err(err) = self.notifications_tx.send(notification) {
            tracing::debug!(error = %err, "notification dropped: no connected subscribers");
        }
    }
}
