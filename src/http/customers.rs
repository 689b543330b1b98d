use actix_web::{web, HttpResponse};

use crate::domain::customer::{CustomerPatch, CustomerRegistration};
use crate::error::AppResult;

use super::{created, message, ok, record_id, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/customers")
            .route(web::get().to(list_customers))
            .route(web::post().to(register_customer)),
    )
    .service(
        web::resource("/customers/{id}")
            .route(web::get().to(get_customer))
            .route(web::put().to(update_customer))
            .route(web::delete().to(delete_customer)),
    );
}

async fn list_customers(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let customers = state.customers.list().await?;
    if customers.is_empty() {
        return Ok(message("No customers registered"));
    }
    Ok(ok("Customers found", customers))
}

async fn get_customer(state: web::Data<AppState>, id: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = record_id(id.into_inner())?;
    let customer = state.customers.get(id).await?;
    Ok(ok("Customer found", customer))
}

async fn register_customer(
    state: web::Data<AppState>,
    body: web::Json<CustomerRegistration>,
) -> AppResult<HttpResponse> {
    let customer = state.customers.register(body.into_inner()).await?;
    Ok(created("Customer registered", customer))
}

async fn update_customer(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    body: web::Json<CustomerPatch>,
) -> AppResult<HttpResponse> {
    let id = record_id(id.into_inner())?;
    let customer = state.customers.update(id, body.into_inner()).await?;
    Ok(ok("Customer updated", customer))
}

async fn delete_customer(state: web::Data<AppState>, id: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = record_id(id.into_inner())?;
    state.customers.delete(id).await?;
    Ok(message("Customer deleted"))
}
