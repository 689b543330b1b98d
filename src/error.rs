use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::db::StoreError;
use crate::domain::customer::CustomerError;
use crate::domain::delivery::DeliveryError;
use crate::domain::order::OrderError;

// ============================================================================
// API Errors
// ============================================================================
//
// Every failure surfaced over HTTP is one of four kinds. Domain errors are
// folded into a kind here; the message is the domain error's Display text.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn internal(message: impl Into<String>, error: impl std::fmt::Display) -> Self {
        AppError::Internal {
            message: message.into(),
            detail: error.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Internal { message, detail } => {
                tracing::error!(error = %detail, "{message}");
                serde_json::json!({ "message": message, "error": detail })
            }
            other => serde_json::json!({ "message": other.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        AppError::internal("Internal server error", error)
    }
}

impl From<CustomerError> for AppError {
    fn from(error: CustomerError) -> Self {
        match error {
            CustomerError::MissingField(_)
            | CustomerError::BlankField(_)
            | CustomerError::InvalidTaxId(_)
            | CustomerError::InvalidEmail(_)
            | CustomerError::InvalidState(_)
            | CustomerError::InvalidPostalCode(_)
            | CustomerError::EmptyPatch => AppError::InvalidArgument(error.to_string()),
            CustomerError::NotFound(_) => AppError::NotFound(error.to_string()),
            CustomerError::DuplicateTaxId(_)
            | CustomerError::HasOrders(_)
            | CustomerError::HasDeliveries(_) => AppError::Conflict(error.to_string()),
            CustomerError::Store(store) => store.into(),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(error: OrderError) -> Self {
        match error {
            OrderError::InvalidDeliveryType(_)
            | OrderError::NegativeValue { .. }
            | OrderError::AmountOverflow => AppError::InvalidArgument(error.to_string()),
            OrderError::CustomerNotFound(_) | OrderError::NotFound(_) => {
                AppError::NotFound(error.to_string())
            }
            OrderError::Store(store) => store.into(),
        }
    }
}

impl From<DeliveryError> for AppError {
    fn from(error: DeliveryError) -> Self {
        match error {
            DeliveryError::MissingField(_)
            | DeliveryError::NegativeAmount { .. }
            | DeliveryError::EmptyPatch
            | DeliveryError::InvalidStatus(_) => AppError::InvalidArgument(error.to_string()),
            DeliveryError::NotFound(_) | DeliveryError::OrderNotFound(_) => {
                AppError::NotFound(error.to_string())
            }
            DeliveryError::Store(store) => store.into(),
        }
    }
}
