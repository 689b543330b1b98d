use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::pricing::PriceBreakdown;
use super::value_objects::DeliveryType;

// ============================================================================
// Order Records
// ============================================================================

/// A persisted order row. Orders are never updated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub order_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub delivery_type: DeliveryType,
    pub distance_km: Decimal,
    pub weight_kg: Decimal,
    pub rate_per_km: Decimal,
    pub rate_per_kg: Decimal,
}

/// A validated order ready to be inserted together with its delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_id: i64,
    pub order_date: NaiveDate,
    pub delivery_type: DeliveryType,
    pub distance_km: Decimal,
    pub weight_kg: Decimal,
    pub rate_per_km: Decimal,
    pub rate_per_kg: Decimal,
}

/// Body of `POST /orders`.
///
/// `delivery_type` stays a raw string so an unknown value is reported by the
/// workflow as an invalid argument rather than as a malformed body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: i64,
    #[serde(default)]
    pub order_date: Option<NaiveDate>,
    pub delivery_type: String,
    pub distance_km: Decimal,
    pub weight_kg: Decimal,
    pub rate_per_km: Decimal,
    pub rate_per_kg: Decimal,
}

/// What the workflow hands back after both rows are committed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderReceipt {
    pub order_id: i64,
    pub delivery_id: i64,
    pub breakdown: PriceBreakdown,
}
