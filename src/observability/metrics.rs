use prometheus::{
    Encoder, GaugeVec, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub recommendations_total: IntCounterVec,
    pub notifications_total: IntCounterVec,
    pub recommendation_latency_seconds: HistogramVec,
    pub location_availability: GaugeVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let recommendations_total = IntCounterVec::new(
            Opts::new("recommendations_total", "Total trip requests by outcome"),
            &["outcome"],
        )
        .expect("valid recommendations_total metric");

        let notifications_total = IntCounterVec::new(
            Opts::new("notifications_total", "Notifications emitted by kind"),
            &["kind"],
        )
        .expect("valid notifications_total metric");

        let recommendation_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "recommendation_latency_seconds",
                "Latency of recommendation computation in seconds",
            ),
            &["outcome"],
        )
        .expect("valid recommendation_latency_seconds metric");

        let location_availability = GaugeVec::new(
            Opts::new("location_availability", "Available spots per location"),
            &["location"],
        )
        .expect("valid location_availability metric");

        registry
            .register(Box::new(recommendations_total.clone()))
            .expect("register recommendations_total");
        registry
            .register(Box::new(notifications_total.clone()))
            .expect("register notifications_total");
        registry
            .register(Box::new(recommendation_latency_seconds.clone()))
            .expect("register recommendation_latency_seconds");
        registry
            .register(Box::new(location_availability.clone()))
            .expect("register location_availability");

        Self {
            registry,
            recommendations_total,
            notifications_total,
            recommendation_latency_seconds,
            location_availability,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
