use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::OrderError;

// ============================================================================
// Order Value Objects
// ============================================================================

/// How fast the shipment must go. Urgent deliveries carry a surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    Normal,
    Urgent,
}

impl DeliveryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryType::Normal => "normal",
            DeliveryType::Urgent => "urgent",
        }
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryType {
    type Err = OrderError;

    /// Exact match only: no trimming, no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(DeliveryType::Normal),
            "urgent" => Ok(DeliveryType::Urgent),
            other => Err(OrderError::InvalidDeliveryType(other.to_string())),
        }
    }
}

impl TryFrom<String> for DeliveryType {
    type Error = OrderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_delivery_types() {
        assert_eq!("normal".parse::<DeliveryType>().unwrap(), DeliveryType::Normal);
        assert_eq!("urgent".parse::<DeliveryType>().unwrap(), DeliveryType::Urgent);
    }

    #[test]
    fn test_parse_rejects_unknown_and_mis_cased_types() {
        for raw in ["express", "Urgent", " normal", ""] {
            let result = raw.parse::<DeliveryType>();
            assert!(
                matches!(result, Err(OrderError::InvalidDeliveryType(ref v)) if v == raw),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_delivery_type_wire_format() {
        assert_eq!(serde_json::to_string(&DeliveryType::Urgent).unwrap(), "\"urgent\"");
        let parsed: DeliveryType = serde_json::from_str("\"normal\"").unwrap();
        assert_eq!(parsed, DeliveryType::Normal);
        assert_eq!(DeliveryType::Normal.to_string(), "normal");
    }
}
