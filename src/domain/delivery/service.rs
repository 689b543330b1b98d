use std::sync::Arc;

use crate::db::{DeliveryStore, OrderStore, Store, StoreError};
use crate::metrics::Metrics;

use super::errors::DeliveryError;
use super::model::{CreateDeliveryRequest, Delivery, DeliveryPatch};

/// Direct delivery maintenance. Amounts written here are taken as given and
/// are not re-priced.
pub struct DeliveryService {
    store: Arc<dyn Store>,
    metrics: Arc<Metrics>,
}

impl DeliveryService {
    pub fn new(store: Arc<dyn Store>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    pub async fn list(&self) -> Result<Vec<Delivery>, DeliveryError> {
        Ok(self.store.list_deliveries().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Delivery, DeliveryError> {
        self.store
            .find_delivery(id)
            .await?
            .ok_or(DeliveryError::NotFound(id))
    }

    pub async fn create(&self, request: CreateDeliveryRequest) -> Result<Delivery, DeliveryError> {
        let delivery = request.validate()?;
        let order_id = delivery.order_id;

        if self.store.find_order(order_id).await?.is_none() {
            return Err(DeliveryError::OrderNotFound(order_id));
        }

        let delivery = self
            .store
            .insert_delivery(&delivery)
            .await
            .map_err(|e| match e {
                StoreError::ForeignKeyViolation { .. } => DeliveryError::OrderNotFound(order_id),
                other => DeliveryError::Store(other),
            })?;

        self.metrics.deliveries_created.with_label_values(&["direct"]).inc();
        tracing::info!(delivery_id = delivery.id, order_id, "Delivery created");
        Ok(delivery)
    }

    pub async fn update(&self, id: i64, patch: DeliveryPatch) -> Result<Delivery, DeliveryError> {
        if patch.is_empty() {
            return Err(DeliveryError::EmptyPatch);
        }

        let current = self.get(id).await?;
        let updated = patch.apply(&current)?;

        let delivery = self
            .store
            .update_delivery(&updated)
            .await?
            .ok_or(DeliveryError::NotFound(id))?;

        tracing::info!(delivery_id = id, status = %delivery.status, "Delivery updated");
        Ok(delivery)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DeliveryError> {
        if !self.store.delete_delivery(id).await? {
            return Err(DeliveryError::NotFound(id));
        }
        tracing::info!(delivery_id = id, "Delivery deleted");
        Ok(())
    }
}
