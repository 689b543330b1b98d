// Private module declaration
mod server;

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

// Re-export for public API
pub use server::configure;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Orders priced and persisted by the workflow (count, final totals)
// - Workflow rejections by reason
// - Deliveries created, by source
// - Customer deletions and referential-integrity conflicts
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the service
pub struct Metrics {
    registry: Registry,

    // Order Workflow Metrics
    pub orders_created: IntCounterVec,
    pub order_failures: IntCounterVec,
    pub order_final_total: Histogram,

    // Delivery Metrics
    pub deliveries_created: IntCounterVec,

    // Customer Metrics
    pub customers_deleted: IntCounter,
    pub customer_delete_conflicts: IntCounter,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_created = IntCounterVec::new(
            Opts::new("orders_created_total", "Orders priced and persisted"),
            &["delivery_type"],
        )?;
        registry.register(Box::new(orders_created.clone()))?;

        let order_failures = IntCounterVec::new(
            Opts::new("order_creation_failures_total", "Order requests that were rejected or failed"),
            &["reason"],
        )?;
        registry.register(Box::new(order_failures.clone()))?;

        let order_final_total = Histogram::with_opts(
            HistogramOpts::new("order_final_total", "Final total charged per order")
                .buckets(vec![25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 10000.0]),
        )?;
        registry.register(Box::new(order_final_total.clone()))?;

        let deliveries_created = IntCounterVec::new(
            Opts::new("deliveries_created_total", "Deliveries written"),
            &["source"],
        )?;
        registry.register(Box::new(deliveries_created.clone()))?;

        let customers_deleted = IntCounter::new("customers_deleted_total", "Customers removed")?;
        registry.register(Box::new(customers_deleted.clone()))?;

        let customer_delete_conflicts = IntCounter::new(
            "customer_delete_conflicts_total",
            "Customer deletions refused because orders or deliveries reference them",
        )?;
        registry.register(Box::new(customer_delete_conflicts.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            order_failures,
            order_final_total,
            deliveries_created,
            customers_deleted,
            customer_delete_conflicts,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_order_created(&self, delivery_type: &str, final_total: Decimal) {
        self.orders_created.with_label_values(&[delivery_type]).inc();
        self.deliveries_created.with_label_values(&["workflow"]).inc();
        if let Some(total) = final_total.to_f64() {
            self.order_final_total.observe(total);
        }
    }

    pub fn record_order_failure(&self, reason: &str) {
        self.order_failures.with_label_values(&[reason]).inc();
    }
}
