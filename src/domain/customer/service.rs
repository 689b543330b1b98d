use std::sync::Arc;

use crate::db::{CustomerStore, Store, StoreError, CUSTOMERS_TAX_ID_KEY};
use crate::metrics::Metrics;

use super::errors::CustomerError;
use super::model::{Customer, CustomerPatch, CustomerRegistration};

// ============================================================================
// Customer Service
// ============================================================================
//
// Registration, partial update and guarded deletion. Deletion refuses while
// any order, or any delivery reached through an order, references the
// customer.
//
// ============================================================================

pub struct CustomerService {
    store: Arc<dyn Store>,
    metrics: Arc<Metrics>,
}

/// Translate a tax id uniqueness violation that raced past the pre-check.
fn duplicate_tax_id(error: StoreError, tax_id: &str) -> CustomerError {
    match error {
        StoreError::UniqueViolation { ref constraint } if constraint == CUSTOMERS_TAX_ID_KEY => {
            CustomerError::DuplicateTaxId(tax_id.to_string())
        }
        other => CustomerError::Store(other),
    }
}

impl CustomerService {
    pub fn new(store: Arc<dyn Store>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    pub async fn list(&self) -> Result<Vec<Customer>, CustomerError> {
        Ok(self.store.list_customers().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Customer, CustomerError> {
        self.store
            .find_customer(id)
            .await?
            .ok_or(CustomerError::NotFound(id))
    }

    pub async fn register(&self, registration: CustomerRegistration) -> Result<Customer, CustomerError> {
        let fields = registration.validate()?;

        if self.store.find_customer_by_tax_id(&fields.tax_id).await?.is_some() {
            return Err(CustomerError::DuplicateTaxId(fields.tax_id));
        }

        let customer = self
            .store
            .insert_customer(&fields)
            .await
            .map_err(|e| duplicate_tax_id(e, &fields.tax_id))?;

        tracing::info!(customer_id = customer.id, "Customer registered");
        Ok(customer)
    }

    pub async fn update(&self, id: i64, patch: CustomerPatch) -> Result<Customer, CustomerError> {
        if patch.is_empty() {
            return Err(CustomerError::EmptyPatch);
        }

        let current = self.get(id).await?;
        let fields = patch.apply(&current)?;

        if fields.tax_id != current.tax_id {
            if let Some(holder) = self.store.find_customer_by_tax_id(&fields.tax_id).await? {
                if holder.id != id {
                    return Err(CustomerError::DuplicateTaxId(fields.tax_id));
                }
            }
        }

        let customer = self
            .store
            .update_customer(id, &fields)
            .await
            .map_err(|e| duplicate_tax_id(e, &fields.tax_id))?
            .ok_or(CustomerError::NotFound(id))?;

        tracing::info!(customer_id = id, "Customer updated");
        Ok(customer)
    }

    pub async fn delete(&self, id: i64) -> Result<(), CustomerError> {
        self.get(id).await?;

        if self.store.count_orders_for_customer(id).await? > 0 {
            self.metrics.customer_delete_conflicts.inc();
            return Err(CustomerError::HasOrders(id));
        }
        if self.store.count_deliveries_for_customer(id).await? > 0 {
            self.metrics.customer_delete_conflicts.inc();
            return Err(CustomerError::HasDeliveries(id));
        }

        let removed = match self.store.delete_customer(id).await {
            Ok(removed) => removed,
            // An order was created between the check and the delete.
            Err(StoreError::ForeignKeyViolation { .. }) => {
                self.metrics.customer_delete_conflicts.inc();
                return Err(CustomerError::HasOrders(id));
            }
            Err(other) => return Err(other.into()),
        };
        if !removed {
            return Err(CustomerError::NotFound(id));
        }

        self.metrics.customers_deleted.inc();
        tracing::info!(customer_id = id, "Customer deleted");
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
