use serde::{Deserialize, Serialize};

use super::errors::CustomerError;

// ============================================================================
// Customer Value Objects
// ============================================================================

/// Brazilian national tax ID (CPF), kept as its 11 digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxId(String);

impl TaxId {
    /// Accepts `12345678900` or `123.456.789-00`.
    pub fn parse(raw: &str) -> Result<Self, CustomerError> {
        let trimmed = raw.trim();
        let well_formed = trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == '-');
        let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();

        if !well_formed || digits.len() != 11 {
            return Err(CustomerError::InvalidTaxId(raw.to_string()));
        }
        Ok(Self(digits))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Customer email address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, CustomerError> {
        let email = raw.trim();
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !email.contains(char::is_whitespace)
            }
            None => false,
        };

        if !valid {
            return Err(CustomerError::InvalidEmail(raw.to_string()));
        }
        Ok(Self(email.to_string()))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Customer address, stored as discrete columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Address {
    pub street: String,
    pub house_number: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// Two-letter state code, upper-cased.
pub fn parse_state(raw: &str) -> Result<String, CustomerError> {
    let state = raw.trim();
    if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CustomerError::InvalidState(raw.to_string()));
    }
    Ok(state.to_ascii_uppercase())
}

/// Eight-digit postal code (CEP); `18000-000` is accepted.
pub fn parse_postal_code(raw: &str) -> Result<String, CustomerError> {
    let trimmed = raw.trim();
    let well_formed = trimmed.chars().all(|c| c.is_ascii_digit() || c == '-');
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();

    if !well_formed || digits.len() != 8 {
        return Err(CustomerError::InvalidPostalCode(raw.to_string()));
    }
    Ok(digits)
}

/// Trimmed, non-blank text.
pub fn parse_text(field: &'static str, raw: &str) -> Result<String, CustomerError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(CustomerError::BlankField(field));
    }
    Ok(text.to_string())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_id_accepts_plain_and_punctuated_forms() {
        assert_eq!(TaxId::parse("12345678900").unwrap().into_inner(), "12345678900");
        assert_eq!(TaxId::parse(" 123.456.789-00 ").unwrap().into_inner(), "12345678900");
    }

    #[test]
    fn test_tax_id_rejects_wrong_length_and_letters() {
        for raw in ["1234567890", "123456789001", "1234567890a", "123 456 789 00", ""] {
            assert!(
                matches!(TaxId::parse(raw), Err(CustomerError::InvalidTaxId(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(Email::parse("ana@mail.com").is_ok());
        assert_eq!(Email::parse("  ana@mail.com ").unwrap().into_inner(), "ana@mail.com");

        for raw in ["ana", "@mail.com", "ana@mail", "ana@@mail.com", "ana@.com", "an a@mail.com"] {
            assert!(
                matches!(Email::parse(raw), Err(CustomerError::InvalidEmail(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_state_is_two_letters_upper_cased() {
        assert_eq!(parse_state("sp").unwrap(), "SP");
        assert!(parse_state("SPX").is_err());
        assert!(parse_state("S1").is_err());
    }

    #[test]
    fn test_postal_code_normalization() {
        assert_eq!(parse_postal_code("18000-000").unwrap(), "18000000");
        assert!(parse_postal_code("1800000").is_err());
        assert!(parse_postal_code("18000.000").is_err());
    }

    #[test]
    fn test_blank_text_is_rejected() {
        assert!(matches!(
            parse_text("full_name", "   "),
            Err(CustomerError::BlankField("full_name"))
        ));
        assert_eq!(parse_text("city", " Sorocaba ").unwrap(), "Sorocaba");
    }
}
