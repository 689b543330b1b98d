use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::delivery::{Charges, Delivery, DeliveryStatus, NewDelivery};
use crate::domain::order::{NewOrder, Order};

use super::{
    CustomerStore, DeliveryStore, OrderStore, StoreError, StoreResult, CUSTOMERS_TAX_ID_KEY,
    DELIVERIES_ORDER_FK, ORDERS_CUSTOMER_FK,
};

// ============================================================================
// In-Memory Store
// ============================================================================
//
// Same constraints as the Postgres schema: unique tax id, restricting
// foreign keys and non-negative delivery amounts. Every write takes the one
// table lock, so a multi-row write is atomic.
//
// ============================================================================

#[derive(Default)]
struct Tables {
    customers: BTreeMap<i64, Customer>,
    orders: BTreeMap<i64, Order>,
    deliveries: BTreeMap<i64, Delivery>,
    customer_seq: i64,
    order_seq: i64,
    delivery_seq: i64,
}

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

fn check_charges(charges: &Charges) -> StoreResult<()> {
    charges
        .ensure_non_negative()
        .map_err(|_| StoreError::CheckViolation {
            constraint: "deliveries_amounts_check".to_string(),
        })
}

impl Tables {
    fn ensure_tax_id_free(&self, tax_id: &str, except: Option<i64>) -> StoreResult<()> {
        let taken = self
            .customers
            .values()
            .any(|c| c.tax_id == tax_id && Some(c.id) != except);
        if taken {
            return Err(StoreError::UniqueViolation {
                constraint: CUSTOMERS_TAX_ID_KEY.to_string(),
            });
        }
        Ok(())
    }

    fn insert_delivery(&mut self, order_id: i64, charges: &Charges, status: DeliveryStatus) -> StoreResult<Delivery> {
        if !self.orders.contains_key(&order_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: DELIVERIES_ORDER_FK.to_string(),
            });
        }
        check_charges(charges)?;

        let delivery = Delivery {
            id: next_id(&mut self.delivery_seq),
            order_id,
            charges: *charges,
            status,
        };
        self.deliveries.insert(delivery.id, delivery.clone());
        Ok(delivery)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        Ok(self.tables.read().await.customers.values().cloned().collect())
    }

    async fn find_customer(&self, id: i64) -> StoreResult<Option<Customer>> {
        Ok(self.tables.read().await.customers.get(&id).cloned())
    }

    async fn find_customer_by_tax_id(&self, tax_id: &str) -> StoreResult<Option<Customer>> {
        let tables = self.tables.read().await;
        Ok(tables.customers.values().find(|c| c.tax_id == tax_id).cloned())
    }

    async fn insert_customer(&self, customer: &NewCustomer) -> StoreResult<Customer> {
        let mut tables = self.tables.write().await;
        tables.ensure_tax_id_free(&customer.tax_id, None)?;

        let stored = Customer {
            id: next_id(&mut tables.customer_seq),
            tax_id: customer.tax_id.clone(),
            full_name: customer.full_name.clone(),
            phone: customer.phone.clone(),
            email: customer.email.clone(),
            address: customer.address.clone(),
        };
        tables.customers.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_customer(&self, id: i64, customer: &NewCustomer) -> StoreResult<Option<Customer>> {
        let mut tables = self.tables.write().await;
        if !tables.customers.contains_key(&id) {
            return Ok(None);
        }
        tables.ensure_tax_id_free(&customer.tax_id, Some(id))?;

        let updated = Customer {
            id,
            tax_id: customer.tax_id.clone(),
            full_name: customer.full_name.clone(),
            phone: customer.phone.clone(),
            email: customer.email.clone(),
            address: customer.address.clone(),
        };
        tables.customers.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_customer(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.orders.values().any(|o| o.customer_id == id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: ORDERS_CUSTOMER_FK.to_string(),
            });
        }
        Ok(tables.customers.remove(&id).is_some())
    }

    async fn count_orders_for_customer(&self, id: i64) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        let count = tables.orders.values().filter(|o| o.customer_id == id).count();
        Ok(count as i64)
    }

    async fn count_deliveries_for_customer(&self, id: i64) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .deliveries
            .values()
            .filter(|d| {
                tables
                    .orders
                    .get(&d.order_id)
                    .is_some_and(|o| o.customer_id == id)
            })
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        Ok(self.tables.read().await.orders.values().cloned().collect())
    }

    async fn find_order(&self, id: i64) -> StoreResult<Option<Order>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn insert_order_with_delivery(
        &self,
        order: &NewOrder,
        charges: &Charges,
        status: DeliveryStatus,
    ) -> StoreResult<(Order, Delivery)> {
        let mut tables = self.tables.write().await;
        if !tables.customers.contains_key(&order.customer_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: ORDERS_CUSTOMER_FK.to_string(),
            });
        }

        let order_seq = tables.order_seq;
        let stored = Order {
            id: next_id(&mut tables.order_seq),
            customer_id: order.customer_id,
            order_date: order.order_date,
            delivery_type: order.delivery_type,
            distance_km: order.distance_km,
            weight_kg: order.weight_kg,
            rate_per_km: order.rate_per_km,
            rate_per_kg: order.rate_per_kg,
        };
        tables.orders.insert(stored.id, stored.clone());

        match tables.insert_delivery(stored.id, charges, status) {
            Ok(delivery) => Ok((stored, delivery)),
            Err(error) => {
                tables.orders.remove(&stored.id);
                tables.order_seq = order_seq;
                Err(error)
            }
        }
    }
}

#[async_trait]
impl DeliveryStore for MemoryStore {
    async fn list_deliveries(&self) -> StoreResult<Vec<Delivery>> {
        Ok(self.tables.read().await.deliveries.values().cloned().collect())
    }

    async fn find_delivery(&self, id: i64) -> StoreResult<Option<Delivery>> {
        Ok(self.tables.read().await.deliveries.get(&id).cloned())
    }

    async fn insert_delivery(&self, delivery: &NewDelivery) -> StoreResult<Delivery> {
        let mut tables = self.tables.write().await;
        tables.insert_delivery(delivery.order_id, &delivery.charges, delivery.status)
    }

    async fn update_delivery(&self, delivery: &Delivery) -> StoreResult<Option<Delivery>> {
        check_charges(&delivery.charges)?;

        let mut tables = self.tables.write().await;
        match tables.deliveries.get_mut(&delivery.id) {
            Some(stored) => {
                stored.charges = delivery.charges;
                stored.status = delivery.status;
                Ok(Some(stored.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_delivery(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.deliveries.remove(&id).is_some())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
