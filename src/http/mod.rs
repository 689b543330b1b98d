// ============================================================================
// HTTP Layer - JSON routes over the domain services
// ============================================================================
//
// Success bodies are `{"message": ..., "data": ...}`. Every failure,
// including malformed JSON and unparsable path ids, goes through `AppError`
// so clients see one error shape.
//
// ============================================================================

mod customers;
mod deliveries;
mod orders;

use std::sync::Arc;

use actix_web::{error::JsonPayloadError, error::PathError, web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::db::Store;
use crate::domain::customer::CustomerService;
use crate::domain::delivery::DeliveryService;
use crate::domain::order::OrderWorkflow;
use crate::error::{AppError, AppResult};
use crate::metrics::{self, Metrics};

/// Shared application state, one instance behind `web::Data`.
pub struct AppState {
    pub customers: CustomerService,
    pub deliveries: DeliveryService,
    pub orders: OrderWorkflow,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, metrics: Arc<Metrics>) -> Self {
        Self {
            customers: CustomerService::new(store.clone(), metrics.clone()),
            deliveries: DeliveryService::new(store.clone(), metrics.clone()),
            orders: OrderWorkflow::new(store, metrics.clone()),
            metrics,
        }
    }
}

/// Register every route plus the extractor error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .configure(customers::configure)
        .configure(deliveries::configure)
        .configure(orders::configure)
        .configure(metrics::configure);
}

fn json_error(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidArgument(format!("Invalid request body: {error}")).into()
}

fn path_error(error: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidArgument(format!("Invalid id: {error}")).into()
}

/// Ids in paths must be positive.
pub(crate) fn record_id(raw: i64) -> AppResult<i64> {
    if raw <= 0 {
        return Err(AppError::InvalidArgument(format!(
            "Invalid id: {raw} (must be a positive integer)"
        )));
    }
    Ok(raw)
}

#[derive(Serialize)]
struct Envelope<T: Serialize> {
    message: String,
    data: T,
}

pub(crate) fn ok<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope {
        message: message.into(),
        data,
    })
}

pub(crate) fn created<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    HttpResponse::Created().json(Envelope {
        message: message.into(),
        data,
    })
}

pub(crate) fn message(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": message.into() }))
}
