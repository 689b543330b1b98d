use actix_web::{web, HttpResponse};

use crate::domain::delivery::{CreateDeliveryRequest, DeliveryPatch};
use crate::error::AppResult;

use super::{created, message, ok, record_id, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/deliveries")
            .route(web::get().to(list_deliveries))
            .route(web::post().to(create_delivery)),
    )
    .service(
        web::resource("/deliveries/{id}")
            .route(web::get().to(get_delivery))
            .route(web::put().to(update_delivery))
            .route(web::delete().to(delete_delivery)),
    );
}

async fn list_deliveries(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let deliveries = state.deliveries.list().await?;
    if deliveries.is_empty() {
        return Ok(message("No deliveries registered"));
    }
    Ok(ok("Deliveries found", deliveries))
}

async fn get_delivery(state: web::Data<AppState>, id: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = record_id(id.into_inner())?;
    let delivery = state.deliveries.get(id).await?;
    Ok(ok("Delivery found", delivery))
}

async fn create_delivery(
    state: web::Data<AppState>,
    body: web::Json<CreateDeliveryRequest>,
) -> AppResult<HttpResponse> {
    let delivery = state.deliveries.create(body.into_inner()).await?;
    Ok(created("Delivery registered", delivery))
}

async fn update_delivery(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    body: web::Json<DeliveryPatch>,
) -> AppResult<HttpResponse> {
    let id = record_id(id.into_inner())?;
    let delivery = state.deliveries.update(id, body.into_inner()).await?;
    Ok(ok("Delivery updated", delivery))
}

async fn delete_delivery(state: web::Data<AppState>, id: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = record_id(id.into_inner())?;
    state.deliveries.delete(id).await?;
    Ok(message("Delivery deleted"))
}

#[cfg(test)]
mod tests {
    use super::super::configure;
    use super::super::tests::{customer_body, state};
    use actix_web::http::StatusCode;
    use actix_web::test::{call_service, init_service, read_body_json, TestRequest};
    use actix_web::App;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_direct_delivery_crud() {
        let app = init_service(App::new().app_data(state()).configure(configure)).await;

        let resp = call_service(&app, TestRequest::get().uri("/deliveries").to_request()).await;
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["message"], "No deliveries registered");

        let req = TestRequest::post()
            .uri("/customers")
            .set_json(customer_body("12345678900"))
            .to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        let customer_id = body["data"]["id"].as_i64().unwrap();

        let req = TestRequest::post()
            .uri("/orders")
            .set_json(json!({
                "customer_id": customer_id,
                "delivery_type": "normal",
                "distance_km": 10,
                "weight_kg": 5,
                "rate_per_km": 3,
                "rate_per_kg": 2
            }))
            .to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        let order_id = body["data"]["order_id"].as_i64().unwrap();

        let req = TestRequest::post()
            .uri("/deliveries")
            .set_json(json!({
                "order_id": order_id,
                "distance_charge": 30,
                "weight_charge": 10,
                "final_total": 40,
                "status": "in_transit"
            }))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = read_body_json(resp).await;
        let id = body["data"]["id"].as_i64().unwrap();
        assert_eq!(body["data"]["discount"], json!(0.0));

        let req = TestRequest::put()
            .uri(&format!("/deliveries/{id}"))
            .set_json(json!({ "status": "delivered" }))
            .to_request();
        let body: Value = read_body_json(call_service(&app, req).await).await;
        assert_eq!(body["data"]["status"], "delivered");
        assert_eq!(body["data"]["final_total"], json!(40.0));

        let req = TestRequest::delete().uri(&format!("/deliveries/{id}")).to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::OK);

        let req = TestRequest::delete().uri(&format!("/deliveries/{id}")).to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_delivery_validation() {
        let app = init_service(App::new().app_data(state()).configure(configure)).await;

        let req = TestRequest::post()
            .uri("/deliveries")
            .set_json(json!({
                "order_id": 5,
                "distance_charge": 1,
                "weight_charge": 1,
                "final_total": 2,
                "status": "pending"
            }))
            .to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = TestRequest::post()
            .uri("/deliveries")
            .set_json(json!({ "order_id": 5, "final_total": -2, "status": "pending" }))
            .to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = TestRequest::put()
            .uri("/deliveries/1")
            .set_json(json!({ "order_id": 9 }))
            .to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = TestRequest::put()
            .uri("/deliveries/1")
            .set_json(json!({ "status": "lost" }))
            .to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
