use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::DeliveryError;
use super::value_objects::{Charges, DeliveryStatus};

// ============================================================================
// Delivery Records
// ============================================================================

/// A persisted delivery row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Delivery {
    pub id: i64,
    pub order_id: i64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub charges: Charges,
    #[sqlx(try_from = "String")]
    pub status: DeliveryStatus,
}

/// A validated delivery ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDelivery {
    pub order_id: i64,
    pub charges: Charges,
    pub status: DeliveryStatus,
}

/// Body of `POST /deliveries`.
///
/// `surcharge`, `discount` and `extra_fee` default to zero; the remaining
/// fields are required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateDeliveryRequest {
    pub order_id: Option<i64>,
    pub distance_charge: Option<Decimal>,
    pub weight_charge: Option<Decimal>,
    pub surcharge: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub extra_fee: Option<Decimal>,
    pub final_total: Option<Decimal>,
    pub status: Option<DeliveryStatus>,
}

impl CreateDeliveryRequest {
    pub fn validate(self) -> Result<NewDelivery, DeliveryError> {
        let order_id = self.order_id.ok_or(DeliveryError::MissingField("order_id"))?;
        let charges = Charges {
            distance_charge: self
                .distance_charge
                .ok_or(DeliveryError::MissingField("distance_charge"))?,
            weight_charge: self
                .weight_charge
                .ok_or(DeliveryError::MissingField("weight_charge"))?,
            surcharge: self.surcharge.unwrap_or_default(),
            discount: self.discount.unwrap_or_default(),
            extra_fee: self.extra_fee.unwrap_or_default(),
            final_total: self
                .final_total
                .ok_or(DeliveryError::MissingField("final_total"))?,
        };
        let status = self.status.ok_or(DeliveryError::MissingField("status"))?;

        charges.ensure_non_negative()?;

        Ok(NewDelivery {
            order_id,
            charges,
            status,
        })
    }
}

/// Body of `PUT /deliveries/:id`. The owning order cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeliveryPatch {
    pub distance_charge: Option<Decimal>,
    pub weight_charge: Option<Decimal>,
    pub surcharge: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub extra_fee: Option<Decimal>,
    pub final_total: Option<Decimal>,
    pub status: Option<DeliveryStatus>,
}

impl DeliveryPatch {
    pub fn is_empty(&self) -> bool {
        self.distance_charge.is_none()
            && self.weight_charge.is_none()
            && self.surcharge.is_none()
            && self.discount.is_none()
            && self.extra_fee.is_none()
            && self.final_total.is_none()
            && self.status.is_none()
    }

    /// Overlay the supplied fields on `current`.
    pub fn apply(&self, current: &Delivery) -> Result<Delivery, DeliveryError> {
        let existing = current.charges;
        let charges = Charges {
            distance_charge: self.distance_charge.unwrap_or(existing.distance_charge),
            weight_charge: self.weight_charge.unwrap_or(existing.weight_charge),
            surcharge: self.surcharge.unwrap_or(existing.surcharge),
            discount: self.discount.unwrap_or(existing.discount),
            extra_fee: self.extra_fee.unwrap_or(existing.extra_fee),
            final_total: self.final_total.unwrap_or(existing.final_total),
        };

        // Only the fields being written are checked.
        let supplied = Charges {
            distance_charge: self.distance_charge.unwrap_or_default(),
            weight_charge: self.weight_charge.unwrap_or_default(),
            surcharge: self.surcharge.unwrap_or_default(),
            discount: self.discount.unwrap_or_default(),
            extra_fee: self.extra_fee.unwrap_or_default(),
            final_total: self.final_total.unwrap_or_default(),
        };
        supplied.ensure_non_negative()?;

        Ok(Delivery {
            id: current.id,
            order_id: current.order_id,
            charges,
            status: self.status.unwrap_or(current.status),
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
