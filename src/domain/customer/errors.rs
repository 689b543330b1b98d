use crate::db::StoreError;

// ============================================================================
// Customer Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{0} cannot be blank")]
    BlankField(&'static str),

    #[error("Invalid tax id (CPF must have 11 digits): {0:?}")]
    InvalidTaxId(String),

    #[error("Invalid email format: {0:?}")]
    InvalidEmail(String),

    #[error("Invalid state code (expected two letters): {0:?}")]
    InvalidState(String),

    #[error("Invalid postal code (expected 8 digits): {0:?}")]
    InvalidPostalCode(String),

    #[error("No fields supplied for update")]
    EmptyPatch,

    #[error("Customer not found: {0}")]
    NotFound(i64),

    #[error("Tax id is already registered: {0}")]
    DuplicateTaxId(String),

    #[error("Customer {0} has orders and cannot be deleted")]
    HasOrders(i64),

    #[error("Customer {0} has deliveries and cannot be deleted")]
    HasDeliveries(i64),

    #[error("Customer store failure: {0}")]
    Store(#[from] StoreError),
}
