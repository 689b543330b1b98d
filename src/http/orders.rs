use actix_web::{web, HttpResponse};

use crate::domain::order::CreateOrderRequest;
use crate::error::AppResult;

use super::{created, ok, record_id, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/orders")
            .route(web::get().to(list_orders))
            .route(web::post().to(create_order)),
    )
    .route("/orders/{id}", web::get().to(get_order));
}

async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> AppResult<HttpResponse> {
    let receipt = state.orders.create_order(body.into_inner()).await?;
    Ok(created("Order created and delivery priced", receipt))
}

async fn list_orders(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let orders = state.orders.list_orders().await?;
    Ok(ok("Orders found", orders))
}

async fn get_order(state: web::Data<AppState>, id: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = record_id(id.into_inner())?;
    let order = state.orders.find_order(id).await?;
    Ok(ok("Order found", order))
}
