use actix_web::{test::TestRequest, web, web::ServiceConfig};
use chrono::{Duration, Utc};
use customer_api_engine::{
    db_types::{CustomerAttributes, CustomerKind, CustomerRecord, IndividualDetails, PartyDetails, Scope},
    traits::{CustomerApiError, CustomerManagement},
    CustomerApi,
    MemoryDatabase,
};
use serde_json::{json, Value};

use super::{
    helpers::{bearer, issue_token, send_request},
    mocks::MockCustomerManager,
};
use crate::routes::{
    CreateCustomerRoute,
    CustomerByIdRoute,
    CustomerSearchRoute,
    UpdateCustomerRoute,
    UpdateVulnerabilityRoute,
    VulnerabilitiesRoute,
};

fn read_token() -> String {
    issue_token("demo-client-id", &[Scope::CustomerRead, Scope::VulnerabilityRead], Utc::now() + Duration::hours(1))
}

fn write_token() -> String {
    issue_token("demo-client-id", &Scope::all(), Utc::now() + Duration::hours(1))
}

fn ann_attributes() -> CustomerAttributes {
    CustomerAttributes {
        party_details: PartyDetails {
            individual: Some(IndividualDetails {
                first_name: "Ann".to_string(),
                last_name: "Smith".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        },
    }
}

async fn seeded_db() -> (MemoryDatabase, CustomerRecord) {
    let db = MemoryDatabase::new();
    let api = CustomerApi::new(db.clone());
    let record = api.create_customer(CustomerKind::Individual, ann_attributes(), "seeder", "AAMI").await.unwrap();
    (db, record)
}

fn routes_for(db: MemoryDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = CustomerApi::new(db);
        cfg.service(CustomerSearchRoute::<MemoryDatabase>::new())
            .service(CreateCustomerRoute::<MemoryDatabase>::new())
            .service(CustomerByIdRoute::<MemoryDatabase>::new())
            .service(UpdateCustomerRoute::<MemoryDatabase>::new())
            .service(VulnerabilitiesRoute::<MemoryDatabase>::new())
            .service(UpdateVulnerabilityRoute::<MemoryDatabase>::new())
            .app_data(web::Data::new(api));
    }
}

#[actix_web::test]
async fn search_returns_matching_customers() {
    let _ = env_logger::try_init();
    let (db, record) = seeded_db().await;
    let req = TestRequest::get()
        .uri("/v3/brands/AAMI/customers?firstName=Ann&strictMatch=true")
        .insert_header(bearer(&read_token()));
    let (status, body) = send_request(req, routes_for(db)).await;
    assert_eq!(status, 200);
    let results: Vec<CustomerRecord> = serde_json::from_str(&body).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, record.id);
}

#[actix_web::test]
async fn search_with_no_matches_is_a_404() {
    let (db, _) = seeded_db().await;
    let req = TestRequest::get().uri("/v3/brands/AAMI/customers?firstName=Zelda").insert_header(bearer(&read_token()));
    let (status, body) = send_request(req, routes_for(db)).await;
    assert_eq!(status, 404);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["errors"][0]["title"], "No Matching Customers");
}

#[actix_web::test]
async fn creating_a_customer_attributes_the_caller_and_brand() {
    let db = MemoryDatabase::new();
    let payload = json!({"data": {"type": "Individual", "attributes": {
        "partyDetails": {"individual": {"firstName": "Mary", "lastName": "Jones"}}
    }}});
    let req = TestRequest::post()
        .uri("/v3/brands/GIO/customers")
        .insert_header(bearer(&write_token()))
        .set_json(&payload);
    let (status, body) = send_request(req, routes_for(db.clone())).await;
    assert_eq!(status, 201);
    let response: Value = serde_json::from_str(&body).unwrap();
    let record: CustomerRecord = serde_json::from_value(response["data"].clone()).unwrap();
    assert_eq!(record.id.as_str().len(), 9);
    let audit = record.audit_groups().next().expect("creation audit missing");
    assert_eq!(audit.value_of("createdBy"), Some("demo-client-id"));
    assert_eq!(audit.value_of("brand"), Some("GIO"));
    assert_eq!(db.customer_count().await, 1);
}

#[actix_web::test]
async fn an_individual_without_an_individual_block_is_rejected() {
    let db = MemoryDatabase::new();
    let payload = json!({"data": {"type": "Individual", "attributes": {"partyDetails": {}}}});
    let req = TestRequest::post()
        .uri("/v3/brands/AAMI/customers")
        .insert_header(bearer(&write_token()))
        .set_json(&payload);
    let (status, body) = send_request(req, routes_for(db)).await;
    assert_eq!(status, 400);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["errors"][0]["code"], "API-400");
}

#[actix_web::test]
async fn a_customer_can_be_fetched_by_id() {
    let (db, record) = seeded_db().await;
    let uri = format!("/v3/brands/AAMI/customers/{}", record.id);
    let req = TestRequest::get().uri(&uri).insert_header(bearer(&read_token()));
    let (status, body) = send_request(req, routes_for(db)).await;
    assert_eq!(status, 200);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["data"]["id"], record.id.as_str());
    assert_eq!(response["data"]["attributes"]["partyDetails"]["individual"]["firstName"], "Ann");
}

#[actix_web::test]
async fn an_unknown_customer_id_is_a_404() {
    let (db, _) = seeded_db().await;
    let req = TestRequest::get().uri("/v3/brands/AAMI/customers/000000000").insert_header(bearer(&read_token()));
    let (status, body) = send_request(req, routes_for(db)).await;
    assert_eq!(status, 404);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["errors"][0]["code"], "API-404");
}

#[actix_web::test]
async fn updating_a_customer_merges_groups_and_appends_an_audit() {
    let (db, record) = seeded_db().await;
    let payload = json!({"data": {"attributes": {"partyDetails": {
        "individual": {"firstName": "Anna", "lastName": "Smith"}
    }}}});
    let uri = format!("/v3/brands/AAMI/customers/{}", record.id);
    let req = TestRequest::patch().uri(&uri).insert_header(bearer(&write_token())).set_json(&payload);
    let (status, body) = send_request(req, routes_for(db)).await;
    assert_eq!(status, 200);
    let response: Value = serde_json::from_str(&body).unwrap();
    let updated: CustomerRecord = serde_json::from_value(response["data"].clone()).unwrap();
    assert_eq!(updated.attributes.party_details.individual.as_ref().unwrap().first_name, "Anna");
    let audits: Vec<_> = updated.audit_groups().collect();
    assert_eq!(audits.len(), 2);
    assert_eq!(audits[1].value_of("lastModifiedBy"), Some("demo-client-id"));
}

#[actix_web::test]
async fn a_customer_without_vulnerabilities_yields_an_empty_array() {
    let (db, record) = seeded_db().await;
    let uri = format!("/v3/brands/AAMI/customers/{}/vulnerabilities", record.id);
    let req = TestRequest::get().uri(&uri).insert_header(bearer(&read_token()));
    let (status, body) = send_request(req, routes_for(db)).await;
    assert_eq!(status, 200);
    assert_eq!(body.trim(), "[]");
}

#[actix_web::test]
async fn vulnerabilities_for_an_unknown_customer_are_a_404() {
    let (db, _) = seeded_db().await;
    let req = TestRequest::get()
        .uri("/v3/brands/AAMI/customers/000000000/vulnerabilities")
        .insert_header(bearer(&read_token()));
    let (status, _) = send_request(req, routes_for(db)).await;
    assert_eq!(status, 404);
}

#[actix_web::test]
async fn updating_a_vulnerability_shallow_merges_its_attributes() {
    use customer_api_engine::db_types::VulnerabilityRecord;
    let (db, record) = seeded_db().await;
    let vulnerability =
        VulnerabilityRecord::new(record.id.clone(), "abc123".to_string(), json!({"severity": "low", "notes": "n/a"}));
    db.insert_vulnerability(vulnerability).await.unwrap();
    let payload = json!({"data": {"attributes": {"severity": "high"}}});
    let uri = format!("/v3/brands/AAMI/customers/{}/vulnerabilities/abc123", record.id);
    let req = TestRequest::patch().uri(&uri).insert_header(bearer(&write_token())).set_json(&payload);
    let (status, body) = send_request(req, routes_for(db)).await;
    assert_eq!(status, 200);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["data"]["attributes"]["severity"], "high");
    assert_eq!(response["data"]["attributes"]["notes"], "n/a");
}

#[actix_web::test]
async fn a_backend_failure_is_a_500_with_the_error_envelope() {
    let mut manager = MockCustomerManager::new();
    manager
        .expect_fetch_customer()
        .returning(|_| Err(CustomerApiError::StorageError("the hamster fell off the wheel".to_string())));
    let configure = move |cfg: &mut ServiceConfig| {
        let api = CustomerApi::new(manager);
        cfg.service(CustomerByIdRoute::<MockCustomerManager>::new()).app_data(web::Data::new(api));
    };
    let req = TestRequest::get().uri("/v3/brands/AAMI/customers/123456789").insert_header(bearer(&read_token()));
    let (status, body) = send_request(req, configure).await;
    assert_eq!(status, 500);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["errors"][0]["code"], "API-500");
}
