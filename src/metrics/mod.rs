// Private module declaration
mod server;

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

use crate::domain::order::OrderStatus;

// Re-export for public API
pub use server::configure;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Order placement (throughput, latency, failures by stage)
// - Status transitions
// - Production notifications
// - Consumed broker events
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // Order Placement Metrics
    pub orders_created: IntCounter,
    pub order_creation_failures: IntCounterVec,
    pub order_creation_duration: Histogram,

    // Lifecycle Metrics
    pub order_status_updates: IntCounterVec,
    pub production_notifications: IntCounterVec,

    // Consumer Metrics
    pub order_events_consumed: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Order Placement Metrics
        let orders_created = IntCounter::new("orders_created_total", "Total orders placed")?;
        registry.register(Box::new(orders_created.clone()))?;

        let order_creation_failures = IntCounterVec::new(
            Opts::new("order_creation_failures_total", "Total order placements that failed"),
            &["stage"],
        )?;
        registry.register(Box::new(order_creation_failures.clone()))?;

        let order_creation_duration = Histogram::with_opts(
            HistogramOpts::new("order_creation_duration_seconds", "Order placement duration")
                .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        )?;
        registry.register(Box::new(order_creation_duration.clone()))?;

        // Lifecycle Metrics
        let order_status_updates = IntCounterVec::new(
            Opts::new("order_status_updates_total", "Total order status writes"),
            &["status"],
        )?;
        registry.register(Box::new(order_status_updates.clone()))?;

        let production_notifications = IntCounterVec::new(
            Opts::new("production_notifications_total", "Production notifications attempted"),
            &["outcome"],
        )?;
        registry.register(Box::new(production_notifications.clone()))?;

        // Consumer Metrics
        let order_events_consumed = IntCounterVec::new(
            Opts::new("order_events_consumed_total", "Order status events consumed from the broker"),
            &["topic", "outcome"],
        )?;
        registry.register(Box::new(order_events_consumed.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            order_creation_failures,
            order_creation_duration,
            order_status_updates,
            production_notifications,
            order_events_consumed,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_order_created(&self, duration_secs: f64) {
        self.orders_created.inc();
        self.order_creation_duration.observe(duration_secs);
    }

    pub fn record_order_creation_failure(&self, stage: &str) {
        self.order_creation_failures.with_label_values(&[stage]).inc();
    }

    pub fn record_status_update(&self, status: OrderStatus) {
        self.order_status_updates.with_label_values(&[status.as_str()]).inc();
    }

    pub fn record_production_notification(&self, success: bool) {
        self.production_notifications
            .with_label_values(&[outcome(success)])
            .inc();
    }

    pub fn record_order_event(&self, topic: &str, success: bool) {
        self.order_events_consumed
            .with_label_values(&[topic, outcome(success)])
            .inc();
    }
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert!(!metrics.registry.gather().is_empty());
    }

    #[test]
    fn test_record_order_created() {
        let metrics = Metrics::new().unwrap();
        metrics.record_order_created(0.05);

        let gathered = metrics.registry.gather();
        let created = gathered.iter().find(|m| m.name() == "orders_created_total").unwrap();
        assert_eq!(created.metric[0].counter.value, Some(1.0));

        let duration = gathered
            .iter()
            .find(|m| m.name() == "order_creation_duration_seconds")
            .unwrap();
        assert_eq!(duration.metric[0].histogram.sample_count, Some(1));
    }

    #[test]
    fn test_failures_are_labelled_by_stage() {
        let metrics = Metrics::new().unwrap();
        metrics.record_order_creation_failure("authorization");
        metrics.record_order_creation_failure("payment");
        metrics.record_order_creation_failure("payment");

        let gathered = metrics.registry.gather();
        let failures = gathered
            .iter()
            .find(|m| m.name() == "order_creation_failures_total")
            .unwrap();
        assert_eq!(failures.metric.len(), 2); // Two different stage labels
    }

    #[test]
    fn test_status_updates_use_wire_names() {
        let metrics = Metrics::new().unwrap();
        metrics.record_status_update(OrderStatus::InProgress);

        let gathered = metrics.registry.gather();
        let updates = gathered
            .iter()
            .find(|m| m.name() == "order_status_updates_total")
            .unwrap();
        assert_eq!(updates.metric[0].label[0].value(), "IN_PROGRESS");
    }

    #[test]
    fn test_event_outcomes() {
        let metrics = Metrics::new().unwrap();
        metrics.record_order_event("orders-paid", true);
        metrics.record_order_event("orders-paid", false);
        metrics.record_production_notification(false);

        let gathered = metrics.registry.gather();
        let events = gathered
            .iter()
            .find(|m| m.name() == "order_events_consumed_total")
            .unwrap();
        assert_eq!(events.metric.len(), 2);
    }
}
