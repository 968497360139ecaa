use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub shipments_created_total: IntCounter,
    pub status_updates_total: IntCounterVec,
    pub tracking_lookups_total: IntCounterVec,
    pub partners_registered_total: IntCounter,
    pub open_support_tickets: IntGauge,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let shipments_created_total =
            IntCounter::new("shipments_created_total", "Total shipments booked")
                .expect("valid shipments_created_total metric");

        let status_updates_total = IntCounterVec::new(
            Opts::new(
                "status_updates_total",
                "Shipment status changes by resulting status",
            ),
            &["status"],
        )
        .expect("valid status_updates_total metric");

        let tracking_lookups_total = IntCounterVec::new(
            Opts::new(
                "tracking_lookups_total",
                "Public tracking-number lookups by outcome",
            ),
            &["outcome"],
        )
        .expect("valid tracking_lookups_total metric");

        let partners_registered_total = IntCounter::new(
            "partners_registered_total",
            "Delivery partner profiles registered",
        )
        .expect("valid partners_registered_total metric");

        let open_support_tickets =
            IntGauge::new("open_support_tickets", "Support tickets not yet resolved")
                .expect("valid open_support_tickets metric");

        registry
            .register(Box::new(shipments_created_total.clone()))
            .expect("register shipments_created_total");
        registry
            .register(Box::new(status_updates_total.clone()))
            .expect("register status_updates_total");
        registry
            .register(Box::new(tracking_lookups_total.clone()))
            .expect("register tracking_lookups_total");
        registry
            .register(Box::new(partners_registered_total.clone()))
            .expect("register partners_registered_total");
        registry
            .register(Box::new(open_support_tickets.clone()))
            .expect("register open_support_tickets");

        Self {
            registry,
            shipments_created_total,
            status_updates_total,
            tracking_lookups_total,
            partners_registered_total,
            open_support_tickets,
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
