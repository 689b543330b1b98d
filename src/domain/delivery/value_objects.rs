use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::DeliveryError;

// ============================================================================
// Delivery Value Objects
// ============================================================================

/// The six monetary fields of a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct Charges {
    pub distance_charge: Decimal,
    pub weight_charge: Decimal,
    pub surcharge: Decimal,
    pub discount: Decimal,
    pub extra_fee: Decimal,
    pub final_total: Decimal,
}

impl Charges {
    fn fields(&self) -> [(&'static str, Decimal); 6] {
        [
            ("distance_charge", self.distance_charge),
            ("weight_charge", self.weight_charge),
            ("surcharge", self.surcharge),
            ("discount", self.discount),
            ("extra_fee", self.extra_fee),
            ("final_total", self.final_total),
        ]
    }

    /// Every monetary field of a delivery must be >= 0.
    pub fn ensure_non_negative(&self) -> Result<(), DeliveryError> {
        match self.fields().into_iter().find(|(_, value)| value.is_sign_negative() && !value.is_zero()) {
            Some((field, value)) => Err(DeliveryError::NegativeAmount { field, value }),
            None => Ok(()),
        }
    }
}

/// Fulfillment state of a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    Pending,
    InTransit,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::InTransit => "in_transit",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = DeliveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DeliveryStatus::Pending),
            "in_transit" => Ok(DeliveryStatus::InTransit),
            "delivered" => Ok(DeliveryStatus::Delivered),
            "cancelled" => Ok(DeliveryStatus::Cancelled),
            other => Err(DeliveryError::InvalidStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for DeliveryStatus {
    type Error = DeliveryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
