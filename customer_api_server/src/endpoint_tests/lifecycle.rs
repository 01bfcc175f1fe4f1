use actix_web::{test::TestRequest, web, web::ServiceConfig};
use chrono::{Duration, Utc};
use customer_api_engine::{
    db_types::{LifecycleEvent, Scope},
    LifecycleApi,
    MemoryDatabase,
};
use serde_json::{json, Value};

use super::{
    helpers::{bearer, issue_token, send_request},
    mocks::MockLifecycleManager,
};
use crate::routes::LifecycleRoute;

fn write_token() -> String {
    issue_token("demo-client-id", &[Scope::CustomerWrite], Utc::now() + Duration::hours(1))
}

fn routes_for(db: MemoryDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = LifecycleApi::new(db);
        cfg.service(LifecycleRoute::<MemoryDatabase>::new()).app_data(web::Data::new(api));
    }
}

#[actix_web::test]
async fn a_lifecycle_event_echoes_the_submitted_party_details() {
    let _ = env_logger::try_init();
    let party_details = json!({"individual": {"firstName": "Ann", "lastName": "Smith"}});
    let payload = json!({"data": {"operation": "deactivate", "attributes": {"partyDetails": party_details}}});
    let req = TestRequest::post()
        .uri("/v3/brands/Bingle/customers/lifecycle")
        .insert_header(bearer(&write_token()))
        .set_json(&payload);
    let (status, body) = send_request(req, routes_for(MemoryDatabase::new())).await;
    assert_eq!(status, 200);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["data"]["attributes"]["partyDetails"], party_details);
}

#[actix_web::test]
async fn an_event_without_party_details_echoes_an_empty_object() {
    let payload = json!({"data": {"operation": "archive", "attributes": {}}});
    let req = TestRequest::post()
        .uri("/v3/brands/AAMI/customers/lifecycle")
        .insert_header(bearer(&write_token()))
        .set_json(&payload);
    let (status, body) = send_request(req, routes_for(MemoryDatabase::new())).await;
    assert_eq!(status, 200);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["data"]["attributes"]["partyDetails"], json!({}));
}

#[actix_web::test]
async fn an_event_without_an_operation_is_a_400() {
    let payload = json!({"data": {"attributes": {"partyDetails": {}}}});
    let req = TestRequest::post()
        .uri("/v3/brands/AAMI/customers/lifecycle")
        .insert_header(bearer(&write_token()))
        .set_json(&payload);
    let (status, body) = send_request(req, routes_for(MemoryDatabase::new())).await;
    assert_eq!(status, 400);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["errors"][0]["code"], "API-400");
}

#[actix_web::test]
async fn the_recorded_event_carries_brand_operation_and_caller() {
    let mut manager = MockLifecycleManager::new();
    manager
        .expect_record_event()
        .withf(|event| event.brand == "GIO" && event.operation == "activate" && event.client_id == "demo-client-id")
        .returning(|event| {
            Ok(LifecycleEvent {
                id: "evt-1".to_string(),
                timestamp: Utc::now(),
                brand: event.brand,
                operation: event.operation,
                client_id: event.client_id,
                payload: event.payload,
            })
        });
    let configure = move |cfg: &mut ServiceConfig| {
        let api = LifecycleApi::new(manager);
        cfg.service(LifecycleRoute::<MockLifecycleManager>::new()).app_data(web::Data::new(api));
    };
    let payload = json!({"data": {"operation": "activate", "attributes": {"partyDetails": {}}}});
    let req = TestRequest::post()
        .uri("/v3/brands/GIO/customers/lifecycle")
        .insert_header(bearer(&write_token()))
        .set_json(&payload);
    let (status, _) = send_request(req, configure).await;
    assert_eq!(status, 200);
}
