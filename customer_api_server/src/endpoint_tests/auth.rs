use actix_web::{test::TestRequest, web, web::ServiceConfig};
use chrono::{Duration, Utc};
use customer_api_engine::{db_types::Scope, CustomerApi, MemoryDatabase};
use serde_json::{json, Value};

use super::helpers::{bearer, issue_token, send_request, send_token_request};
use crate::routes::{CustomerSearchRoute, CreateCustomerRoute};

fn configure(cfg: &mut ServiceConfig) {
    let api = CustomerApi::new(MemoryDatabase::new());
    cfg.service(CustomerSearchRoute::<MemoryDatabase>::new())
        .service(CreateCustomerRoute::<MemoryDatabase>::new())
        .app_data(web::Data::new(api));
}

#[actix_web::test]
async fn a_valid_client_gets_a_full_scope_token() {
    let _ = env_logger::try_init();
    let req = TestRequest::post().uri("/oauth/token").set_form([
        ("client_id", "demo-client-id"),
        ("client_secret", "demo-client-secret"),
        ("grant_type", "client_credentials"),
    ]);
    let (status, body) = send_token_request(req).await;
    assert_eq!(status, 200);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["token_type"], "Bearer");
    assert_eq!(response["expires_in"], 3600);
    let scope = response["scope"].as_str().unwrap();
    for s in Scope::all() {
        assert!(scope.contains(&s.to_string()), "missing scope {s} in {scope}");
    }
    // Three base64url segments
    assert_eq!(response["access_token"].as_str().unwrap().split('.').count(), 3);
}

#[actix_web::test]
async fn a_json_body_with_a_scope_subset_is_honoured() {
    let req = TestRequest::post().uri("/oauth/token").set_json(json!({
        "client_id": "performance-test-client",
        "client_secret": "test-secret-123",
        "grant_type": "client_credentials",
        "scope": "read-customer write-customer",
    }));
    let (status, body) = send_token_request(req).await;
    assert_eq!(status, 200);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["scope"], "read-customer write-customer");
}

#[actix_web::test]
async fn unknown_client_and_wrong_secret_are_indistinguishable() {
    let unknown = TestRequest::post().uri("/oauth/token").set_form([
        ("client_id", "no-such-client"),
        ("client_secret", "demo-client-secret"),
        ("grant_type", "client_credentials"),
    ]);
    let wrong_secret = TestRequest::post().uri("/oauth/token").set_form([
        ("client_id", "demo-client-id"),
        ("client_secret", "not-the-secret"),
        ("grant_type", "client_credentials"),
    ]);
    let (status_a, body_a) = send_token_request(unknown).await;
    let (status_b, body_b) = send_token_request(wrong_secret).await;
    assert_eq!(status_a, 401);
    assert_eq!(status_b, 401);
    assert_eq!(body_a, body_b);
    let response: Value = serde_json::from_str(&body_a).unwrap();
    assert_eq!(response["error"], "invalid_client");
}

#[actix_web::test]
async fn only_the_client_credentials_grant_is_supported() {
    let req = TestRequest::post().uri("/oauth/token").set_form([
        ("client_id", "demo-client-id"),
        ("client_secret", "demo-client-secret"),
        ("grant_type", "authorization_code"),
    ]);
    let (status, body) = send_token_request(req).await;
    assert_eq!(status, 400);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["error"], "unsupported_grant_type");
}

#[actix_web::test]
async fn unrecognised_scopes_fall_back_to_the_default() {
    let req = TestRequest::post().uri("/oauth/token").set_form([
        ("client_id", "demo-client-id"),
        ("client_secret", "demo-client-secret"),
        ("grant_type", "client_credentials"),
        ("scope", "make-coffee rule-the-world"),
    ]);
    let (status, body) = send_token_request(req).await;
    assert_eq!(status, 200);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["scope"], "read-customer");
}

#[actix_web::test]
async fn a_request_without_a_token_is_unauthorized() {
    let req = TestRequest::get().uri("/v3/brands/AAMI/customers?firstName=Ann");
    let (status, body) = send_request(req, configure).await;
    assert_eq!(status, 401);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["errors"][0]["code"], "API-401");
}

#[actix_web::test]
async fn an_expired_token_is_rejected() {
    let token = issue_token("demo-client-id", &Scope::all(), Utc::now() - Duration::hours(1));
    let req = TestRequest::get().uri("/v3/brands/AAMI/customers?firstName=Ann").insert_header(bearer(&token));
    let (status, body) = send_request(req, configure).await;
    assert_eq!(status, 401);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["errors"][0]["title"], "Token Expired");
}

#[actix_web::test]
async fn a_tampered_token_is_rejected() {
    let token = issue_token("demo-client-id", &Scope::all(), Utc::now() + Duration::hours(1));
    let tampered = format!("{}A", &token[..token.len() - 1]);
    let req = TestRequest::get().uri("/v3/brands/AAMI/customers?firstName=Ann").insert_header(bearer(&tampered));
    let (status, body) = send_request(req, configure).await;
    assert_eq!(status, 401);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["errors"][0]["code"], "API-401");
}

#[actix_web::test]
async fn a_read_only_token_cannot_create_customers() {
    let token = issue_token("demo-client-id", &[Scope::CustomerRead], Utc::now() + Duration::hours(1));
    let payload = json!({"data": {"type": "Individual", "attributes": {
        "partyDetails": {"individual": {"firstName": "Ann", "lastName": "Smith"}}
    }}});
    let req =
        TestRequest::post().uri("/v3/brands/AAMI/customers").insert_header(bearer(&token)).set_json(&payload);
    let (status, body) = send_request(req, configure).await;
    assert_eq!(status, 403);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["errors"][0]["code"], "API-403");
}
