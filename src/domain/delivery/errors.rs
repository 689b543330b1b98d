use rust_decimal::Decimal;

use crate::db::StoreError;

// ============================================================================
// Delivery Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{field} cannot be negative: {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("No fields supplied for update")]
    EmptyPatch,

    #[error("Invalid delivery status: {0:?}")]
    InvalidStatus(String),

    #[error("Delivery not found: {0}")]
    NotFound(i64),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Delivery store failure: {0}")]
    Store(#[from] StoreError),
}
