use rust_decimal::Decimal;

use crate::db::StoreError;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Invalid delivery type: {0:?} (expected \"normal\" or \"urgent\")")]
    InvalidDeliveryType(String),

    #[error("{field} cannot be negative: {value}")]
    NegativeValue { field: &'static str, value: Decimal },

    #[error("Order amounts are too large to price")]
    AmountOverflow,

    #[error("Customer not found: {0}")]
    CustomerNotFound(i64),

    #[error("Order not found: {0}")]
    NotFound(i64),

    #[error("Order store failure: {0}")]
    Store(#[from] StoreError),
}
