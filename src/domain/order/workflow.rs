use std::sync::Arc;

use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;

use crate::db::{CustomerStore, OrderStore, Store, StoreError};
use crate::domain::delivery::DeliveryStatus;
use crate::metrics::Metrics;

use super::errors::OrderError;
use super::model::{CreateOrderRequest, NewOrder, Order, OrderReceipt};
use super::pricing::{price, PricingInput};
use super::value_objects::DeliveryType;

// ============================================================================
// Order Fulfillment Workflow
// ============================================================================
//
// Orchestrates: Request → Customer check → Pricing → Order + Delivery (one unit)
//
// Nothing is written until every check has passed. The two rows are handed
// to the store together so a failed delivery insert never leaves an order.
//
// ============================================================================

pub struct OrderWorkflow {
    store: Arc<dyn Store>,
    metrics: Arc<Metrics>,
}

impl OrderWorkflow {
    pub fn new(store: Arc<dyn Store>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    /// Price the request and persist the order with its pending delivery.
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<OrderReceipt, OrderError> {
        let correlation_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "create_order",
            %correlation_id,
            customer_id = request.customer_id
        );

        let result = self.run(request).instrument(span.clone()).await;
        if let Err(error) = &result {
            self.metrics.record_order_failure(failure_reason(error));
            span.in_scope(|| tracing::warn!(%error, "Order rejected"));
        }
        result
    }

    async fn run(&self, request: CreateOrderRequest) -> Result<OrderReceipt, OrderError> {
        if self.store.find_customer(request.customer_id).await?.is_none() {
            return Err(OrderError::CustomerNotFound(request.customer_id));
        }

        let delivery_type: DeliveryType = request.delivery_type.parse()?;
        let input = PricingInput {
            delivery_type,
            distance_km: request.distance_km,
            weight_kg: request.weight_kg,
            rate_per_km: request.rate_per_km,
            rate_per_kg: request.rate_per_kg,
        };
        input.ensure_non_negative()?;

        let breakdown = price(&input)?;
        tracing::debug!(
            base_charge = %breakdown.base_charge(),
            final_total = %breakdown.charges.final_total,
            "Order priced"
        );

        let order = NewOrder {
            customer_id: request.customer_id,
            order_date: request.order_date.unwrap_or_else(|| Utc::now().date_naive()),
            delivery_type,
            distance_km: input.distance_km,
            weight_kg: input.weight_kg,
            rate_per_km: input.rate_per_km,
            rate_per_kg: input.rate_per_kg,
        };

        let (order, delivery) = self
            .store
            .insert_order_with_delivery(&order, &breakdown.charges, DeliveryStatus::Pending)
            .await
            .map_err(|e| match e {
                // The customer was removed after the existence check.
                StoreError::ForeignKeyViolation { .. } => {
                    OrderError::CustomerNotFound(request.customer_id)
                }
                other => OrderError::Store(other),
            })?;

        self.metrics
            .record_order_created(delivery_type.as_str(), breakdown.charges.final_total);
        tracing::info!(
            order_id = order.id,
            delivery_id = delivery.id,
            "Order and delivery committed"
        );

        Ok(OrderReceipt {
            order_id: order.id,
            delivery_id: delivery.id,
            breakdown,
        })
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.store.list_orders().await?)
    }

    pub async fn find_order(&self, id: i64) -> Result<Order, OrderError> {
        self.store.find_order(id).await?.ok_or(OrderError::NotFound(id))
    }
}

fn failure_reason(error: &OrderError) -> &'static str {
    match error {
        OrderError::CustomerNotFound(_) => "customer_not_found",
        OrderError::InvalidDeliveryType(_) => "invalid_delivery_type",
        OrderError::NegativeValue { .. } => "negative_value",
        OrderError::AmountOverflow => "amount_overflow",
        OrderError::NotFound(_) | OrderError::Store(_) => "store",
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
