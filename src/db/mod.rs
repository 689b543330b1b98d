// ============================================================================
// Persistence Layer
// ============================================================================
//
// Store traits, one per table, plus the combined `Store` the services hold.
// Two backends implement them:
// - PgStore: Postgres through a sqlx connection pool
// - MemoryStore: in-process tables with the same constraints
//
// ============================================================================

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::delivery::{Charges, Delivery, DeliveryStatus, NewDelivery};
use crate::domain::order::{NewOrder, Order};
use crate::utils::IsTransient;

pub use memory::MemoryStore;
pub use postgres::{PgStore, PoolSettings};

pub const CUSTOMERS_TAX_ID_KEY: &str = "customers_tax_id_key";
pub const ORDERS_CUSTOMER_FK: &str = "orders_customer_id_fkey";
pub const DELIVERIES_ORDER_FK: &str = "deliveries_order_id_fkey";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("check constraint violated: {constraint}")]
    CheckViolation { constraint: String },

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            let constraint = db_error.constraint().unwrap_or_default().to_string();
            if db_error.is_unique_violation() {
                return StoreError::UniqueViolation { constraint };
            }
            if db_error.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation { constraint };
            }
            if db_error.is_check_violation() {
                return StoreError::CheckViolation { constraint };
            }
        }
        StoreError::Database(error)
    }
}

impl IsTransient for StoreError {
    fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Database(
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::Tls(_)
            )
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn list_customers(&self) -> StoreResult<Vec<Customer>>;

    async fn find_customer(&self, id: i64) -> StoreResult<Option<Customer>>;

    async fn find_customer_by_tax_id(&self, tax_id: &str) -> StoreResult<Option<Customer>>;

    async fn insert_customer(&self, customer: &NewCustomer) -> StoreResult<Customer>;

    /// Overwrite every column. `None` if the row does not exist.
    async fn update_customer(&self, id: i64, customer: &NewCustomer) -> StoreResult<Option<Customer>>;

    /// `false` if the row does not exist.
    async fn delete_customer(&self, id: i64) -> StoreResult<bool>;

    async fn count_orders_for_customer(&self, id: i64) -> StoreResult<i64>;

    /// Deliveries reached through the customer's orders.
    async fn count_deliveries_for_customer(&self, id: i64) -> StoreResult<i64>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn list_orders(&self) -> StoreResult<Vec<Order>>;

    async fn find_order(&self, id: i64) -> StoreResult<Option<Order>>;

    /// Insert an order and its delivery as one unit: either both rows are
    /// committed or neither is.
    async fn insert_order_with_delivery(
        &self,
        order: &NewOrder,
        charges: &Charges,
        status: DeliveryStatus,
    ) -> StoreResult<(Order, Delivery)>;
}

#[async_trait]
pub trait DeliveryStore: Send + Sync {
    async fn list_deliveries(&self) -> StoreResult<Vec<Delivery>>;

    async fn find_delivery(&self, id: i64) -> StoreResult<Option<Delivery>>;

    async fn insert_delivery(&self, delivery: &NewDelivery) -> StoreResult<Delivery>;

    /// Overwrite charges and status. `order_id` is never changed.
    async fn update_delivery(&self, delivery: &Delivery) -> StoreResult<Option<Delivery>>;

    async fn delete_delivery(&self, id: i64) -> StoreResult<bool>;
}

/// Everything the services need from a backend.
pub trait Store: CustomerStore + OrderStore + DeliveryStore {}

impl<T: CustomerStore + OrderStore + DeliveryStore> Store for T {}
