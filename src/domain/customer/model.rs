use serde::{Deserialize, Serialize};

use super::errors::CustomerError;
use super::value_objects::{parse_postal_code, parse_state, parse_text, Address, Email, TaxId};

// ============================================================================
// Customer Records
// ============================================================================

/// A persisted customer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: i64,
    pub tax_id: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub address: Address,
}

/// Validated, normalized customer fields ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub tax_id: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
}

/// Body of `POST /customers`. Every field is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerRegistration {
    pub tax_id: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, CustomerError> {
    value.as_deref().ok_or(CustomerError::MissingField(field))
}

impl CustomerRegistration {
    pub fn validate(&self) -> Result<NewCustomer, CustomerError> {
        Ok(NewCustomer {
            tax_id: TaxId::parse(required("tax_id", &self.tax_id)?)?.into_inner(),
            full_name: parse_text("full_name", required("full_name", &self.full_name)?)?,
            phone: parse_text("phone", required("phone", &self.phone)?)?,
            email: Email::parse(required("email", &self.email)?)?.into_inner(),
            address: Address {
                street: parse_text("street", required("street", &self.street)?)?,
                house_number: parse_text("house_number", required("house_number", &self.house_number)?)?,
                neighborhood: parse_text("neighborhood", required("neighborhood", &self.neighborhood)?)?,
                city: parse_text("city", required("city", &self.city)?)?,
                state: parse_state(required("state", &self.state)?)?,
                postal_code: parse_postal_code(required("postal_code", &self.postal_code)?)?,
            },
        })
    }
}

/// Body of `PUT /customers/:id`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerPatch {
    pub tax_id: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

fn patched(
    supplied: &Option<String>,
    current: &str,
    parse: impl FnOnce(&str) -> Result<String, CustomerError>,
) -> Result<String, CustomerError> {
    match supplied {
        Some(value) => parse(value),
        None => Ok(current.to_string()),
    }
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        [
            &self.tax_id,
            &self.full_name,
            &self.phone,
            &self.email,
            &self.street,
            &self.house_number,
            &self.neighborhood,
            &self.city,
            &self.state,
            &self.postal_code,
        ]
        .iter()
        .all(|field| field.is_none())
    }

    /// Overlay the supplied fields on `current`, validating only those.
    pub fn apply(&self, current: &Customer) -> Result<NewCustomer, CustomerError> {
        let address = &current.address;
        Ok(NewCustomer {
            tax_id: patched(&self.tax_id, &current.tax_id, |v| {
                TaxId::parse(v).map(TaxId::into_inner)
            })?,
            full_name: patched(&self.full_name, &current.full_name, |v| parse_text("full_name", v))?,
            phone: patched(&self.phone, &current.phone, |v| parse_text("phone", v))?,
            email: patched(&self.email, &current.email, |v| Email::parse(v).map(Email::into_inner))?,
            address: Address {
                street: patched(&self.street, &address.street, |v| parse_text("street", v))?,
                house_number: patched(&self.house_number, &address.house_number, |v| {
                    parse_text("house_number", v)
                })?,
                neighborhood: patched(&self.neighborhood, &address.neighborhood, |v| {
                    parse_text("neighborhood", v)
                })?,
                city: patched(&self.city, &address.city, |v| parse_text("city", v))?,
                state: patched(&self.state, &address.state, parse_state)?,
                postal_code: patched(&self.postal_code, &address.postal_code, parse_postal_code)?,
            },
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
