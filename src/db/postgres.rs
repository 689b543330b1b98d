use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::PgExecutor;

use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::delivery::{Charges, Delivery, DeliveryStatus, NewDelivery};
use crate::domain::order::{NewOrder, Order};
use crate::utils::{retry_on_transient, RetryConfig};

use super::{CustomerStore, DeliveryStore, OrderStore, StoreError, StoreResult};

// ============================================================================
// Postgres Store
// ============================================================================

const CUSTOMER_COLUMNS: &str =
    "id, tax_id, full_name, phone, email, street, house_number, neighborhood, city, state, postal_code";

const ORDER_COLUMNS: &str =
    "id, customer_id, order_date, delivery_type, distance_km, weight_kg, rate_per_km, rate_per_kg";

const DELIVERY_COLUMNS: &str =
    "id, order_id, distance_charge, weight_charge, surcharge, discount, extra_fee, final_total, status";

/// Connection pool sizing.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect, retrying while the database is unreachable.
    pub async fn connect(
        database_url: &str,
        settings: &PoolSettings,
        retry: RetryConfig,
    ) -> StoreResult<Self> {
        let pool = retry_on_transient(retry, |attempt| {
            let options = PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .acquire_timeout(settings.acquire_timeout)
                .idle_timeout(settings.idle_timeout);

            async move {
                tracing::debug!(attempt = attempt, "Connecting to Postgres");
                options.connect(database_url).await.map_err(StoreError::from)
            }
        })
        .await?;

        tracing::info!(
            max_connections = settings.max_connections,
            "Postgres connection pool ready"
        );
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

async fn insert_delivery_row<'e>(
    executor: impl PgExecutor<'e>,
    order_id: i64,
    charges: &Charges,
    status: DeliveryStatus,
) -> Result<Delivery, sqlx::Error> {
    let sql = format!(
        "INSERT INTO deliveries (order_id, distance_charge, weight_charge, surcharge, discount, extra_fee, final_total, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {DELIVERY_COLUMNS}"
    );

    sqlx::query_as::<_, Delivery>(&sql)
        .bind(order_id)
        .bind(charges.distance_charge)
        .bind(charges.weight_charge)
        .bind(charges.surcharge)
        .bind(charges.discount)
        .bind(charges.extra_fee)
        .bind(charges.final_total)
        .bind(status.as_str())
        .fetch_one(executor)
        .await
}

#[async_trait]
impl CustomerStore for PgStore {
    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY id");
        Ok(sqlx::query_as::<_, Customer>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_customer(&self, id: i64) -> StoreResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1");
        Ok(sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_customer_by_tax_id(&self, tax_id: &str) -> StoreResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE tax_id = $1");
        Ok(sqlx::query_as::<_, Customer>(&sql)
            .bind(tax_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_customer(&self, customer: &NewCustomer) -> StoreResult<Customer> {
        let sql = format!(
            "INSERT INTO customers (tax_id, full_name, phone, email, street, house_number, neighborhood, city, state, postal_code) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {CUSTOMER_COLUMNS}"
        );
        let address = &customer.address;

        Ok(sqlx::query_as::<_, Customer>(&sql)
            .bind(&customer.tax_id)
            .bind(&customer.full_name)
            .bind(&customer.phone)
            .bind(&customer.email)
            .bind(&address.street)
            .bind(&address.house_number)
            .bind(&address.neighborhood)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.postal_code)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_customer(&self, id: i64, customer: &NewCustomer) -> StoreResult<Option<Customer>> {
        let sql = format!(
            "UPDATE customers SET tax_id = $1, full_name = $2, phone = $3, email = $4, street = $5, \
             house_number = $6, neighborhood = $7, city = $8, state = $9, postal_code = $10 \
             WHERE id = $11 RETURNING {CUSTOMER_COLUMNS}"
        );
        let address = &customer.address;

        Ok(sqlx::query_as::<_, Customer>(&sql)
            .bind(&customer.tax_id)
            .bind(&customer.full_name)
            .bind(&customer.phone)
            .bind(&customer.email)
            .bind(&address.street)
            .bind(&address.house_number)
            .bind(&address.neighborhood)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.postal_code)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_customer(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_orders_for_customer(&self, id: i64) -> StoreResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE customer_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn count_deliveries_for_customer(&self, id: i64) -> StoreResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM deliveries d JOIN orders o ON o.id = d.order_id WHERE o.customer_id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?)
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY id");
        Ok(sqlx::query_as::<_, Order>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_order(&self, id: i64) -> StoreResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        Ok(sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_order_with_delivery(
        &self,
        order: &NewOrder,
        charges: &Charges,
        status: DeliveryStatus,
    ) -> StoreResult<(Order, Delivery)> {
        let sql = format!(
            "INSERT INTO orders (customer_id, order_date, delivery_type, distance_km, weight_kg, rate_per_km, rate_per_kg) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {ORDER_COLUMNS}"
        );

        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(order.customer_id)
            .bind(order.order_date)
            .bind(order.delivery_type.as_str())
            .bind(order.distance_km)
            .bind(order.weight_kg)
            .bind(order.rate_per_km)
            .bind(order.rate_per_kg)
            .fetch_one(&mut *tx)
            .await?;

        let delivery = match insert_delivery_row(&mut *tx, order.id, charges, status).await {
            Ok(delivery) => delivery,
            Err(error) => {
                tracing::warn!(
                    order_id = order.id,
                    error = %error,
                    "Delivery insert failed, rolling back order"
                );
                tx.rollback().await?;
                return Err(error.into());
            }
        };

        tx.commit().await?;
        Ok((order, delivery))
    }
}

#[async_trait]
impl DeliveryStore for PgStore {
    async fn list_deliveries(&self) -> StoreResult<Vec<Delivery>> {
        let sql = format!("SELECT {DELIVERY_COLUMNS} FROM deliveries ORDER BY id");
        Ok(sqlx::query_as::<_, Delivery>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_delivery(&self, id: i64) -> StoreResult<Option<Delivery>> {
        let sql = format!("SELECT {DELIVERY_COLUMNS} FROM deliveries WHERE id = $1");
        Ok(sqlx::query_as::<_, Delivery>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_delivery(&self, delivery: &NewDelivery) -> StoreResult<Delivery> {
        Ok(insert_delivery_row(&self.pool, delivery.order_id, &delivery.charges, delivery.status).await?)
    }

    async fn update_delivery(&self, delivery: &Delivery) -> StoreResult<Option<Delivery>> {
        let sql = format!(
            "UPDATE deliveries SET distance_charge = $1, weight_charge = $2, surcharge = $3, discount = $4, \
             extra_fee = $5, final_total = $6, status = $7 WHERE id = $8 RETURNING {DELIVERY_COLUMNS}"
        );
        let charges = &delivery.charges;

        Ok(sqlx::query_as::<_, Delivery>(&sql)
            .bind(charges.distance_charge)
            .bind(charges.weight_charge)
            .bind(charges.surcharge)
            .bind(charges.discount)
            .bind(charges.extra_fee)
            .bind(charges.final_total)
            .bind(delivery.status.as_str())
            .bind(delivery.id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_delivery(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM deliveries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Integration Tests (need a live Postgres: DATABASE_URL)
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::Address;
    use crate::domain::order::DeliveryType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    async fn store() -> PgStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let store = PgStore::connect(&url, &PoolSettings::default(), RetryConfig::default())
            .await
            .unwrap();
        store.migrate().await.unwrap();
        store
    }

    async fn customer(store: &PgStore) -> Customer {
        let unique = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let tax_id = format!("{:011}", unique.rem_euclid(100_000_000_000));
        store
            .insert_customer(&NewCustomer {
                tax_id,
                full_name: "Ana Maria".to_string(),
                phone: "15 99999-9999".to_string(),
                email: "ana@mail.com".to_string(),
                address: Address {
                    street: "Rua A".to_string(),
                    house_number: "100".to_string(),
                    neighborhood: "Centro".to_string(),
                    city: "Sorocaba".to_string(),
                    state: "SP".to_string(),
                    postal_code: "18000000".to_string(),
                },
            })
            .await
            .unwrap()
    }

    fn new_order(customer_id: i64) -> NewOrder {
        NewOrder {
            customer_id,
            order_date: NaiveDate::from_ymd_opt(2025, 11, 25).unwrap(),
            delivery_type: DeliveryType::Urgent,
            distance_km: dec!(30),
            weight_kg: dec!(12),
            rate_per_km: dec!(2.5),
            rate_per_kg: dec!(4.0),
        }
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_order_and_delivery_commit_together() {
        let store = store().await;
        let customer = customer(&store).await;
        let charges = Charges {
            distance_charge: dec!(75),
            weight_charge: dec!(48),
            surcharge: dec!(24.6),
            final_total: dec!(147.6),
            ..Charges::default()
        };

        let (order, delivery) = store
            .insert_order_with_delivery(&new_order(customer.id), &charges, DeliveryStatus::Pending)
            .await
            .unwrap();

        assert_eq!(delivery.order_id, order.id);
        assert_eq!(delivery.charges, charges);
        assert_eq!(store.count_deliveries_for_customer(customer.id).await.unwrap(), 1);
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_failed_delivery_insert_rolls_back_order() {
        let store = store().await;
        let customer = customer(&store).await;
        let charges = Charges {
            final_total: dec!(-1),
            ..Charges::default()
        };

        let result = store
            .insert_order_with_delivery(&new_order(customer.id), &charges, DeliveryStatus::Pending)
            .await;

        assert!(matches!(result, Err(StoreError::CheckViolation { .. })));
        assert_eq!(store.count_orders_for_customer(customer.id).await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_referenced_customer_cannot_be_deleted() {
        let store = store().await;
        let customer = customer(&store).await;
        store
            .insert_order_with_delivery(&new_order(customer.id), &Charges::default(), DeliveryStatus::Pending)
            .await
            .unwrap();

        let result = store.delete_customer(customer.id).await;
        assert!(matches!(result, Err(StoreError::ForeignKeyViolation { .. })));
    }
}
