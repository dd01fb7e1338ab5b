//! API integration tests
//!
//! They run against a live server with an administrator account, e.g. one
//! created through `MEDTRACK_AUTH__BOOTSTRAP_ADMIN_EMAIL` / `_PASSWORD`.
//! Run with: cargo test -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn admin_credentials() -> (String, String) {
    (
        std::env::var("MEDTRACK_TEST_EMAIL").unwrap_or_else(|_| "admin@medtrack.local".to_string()),
        std::env::var("MEDTRACK_TEST_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
    )
}

async fn login(client: &Client) -> Value {
    let (email, password) = admin_credentials();
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse login response")
}

/// Helper to get an access token
async fn get_auth_token(client: &Client) -> String {
    let body = login(client).await;
    body["access_token"]
        .as_str()
        .expect("No access token in response")
        .to_string()
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

async fn post_json(client: &Client, token: &str, path: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{}{}", BASE_URL, path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request")
}

async fn put_json(client: &Client, token: &str, path: &str, body: Value) -> reqwest::Response {
    client
        .put(format!("{}{}", BASE_URL, path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request")
}

async fn delete(client: &Client, token: &str, path: &str) -> reqwest::Response {
    client
        .delete(format!("{}{}", BASE_URL, path))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request")
}

async fn get_json(client: &Client, token: &str, path: &str) -> Value {
    let response = client
        .get(format!("{}{}", BASE_URL, path))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success(), "GET {} failed", path);
    response.json().await.expect("Failed to parse response")
}

/// Create a department and one piece of equipment in it, returning their ids
async fn create_equipment(client: &Client, token: &str) -> (String, String) {
    let response = post_json(
        client,
        token,
        "/departments",
        json!({ "name": unique("ICU") }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let department: Value = response.json().await.unwrap();
    let department_id = department["id"].as_str().unwrap().to_string();

    let response = post_json(
        client,
        token,
        "/equipment",
        json!({
            "code": unique("EQ"),
            "name": "Ventilator",
            "model": "V500",
            "manufacturer": "Draeger",
            "serial_number": unique("SN"),
            "acquired_on": "2023-05-10",
            "department_id": department_id,
            "criticality": "CRITICAL"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let equipment: Value = response.json().await.unwrap();
    assert_eq!(equipment["status"], "ACTIVE");

    (department_id, equipment["id"].as_str().unwrap().to_string())
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();
    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();
    let body = login(&client).await;

    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["user"]["password_hash"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();
    let (email, _) = admin_credentials();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_refresh_token_flow() {
    let client = Client::new();
    let body = login(&client).await;
    let access = body["access_token"].as_str().unwrap();
    let refresh = body["refresh_token"].as_str().unwrap();

    // Refresh tokens are not accepted on regular endpoints
    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(refresh)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Access tokens are not accepted on the refresh endpoint
    let response = client
        .post(format!("{}/auth/refresh", BASE_URL))
        .bearer_auth(access)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(format!("{}/auth/refresh", BASE_URL))
        .bearer_auth(refresh)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let refreshed: Value = response.json().await.unwrap();
    assert!(refreshed["access_token"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let body = get_json(&client, &token, "/auth/me").await;
    assert_eq!(body["role"], "ADMIN");
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/equipment", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert!(body["code"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_list_equipment_paginated() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    create_equipment(&client, &token).await;

    let body = get_json(&client, &token, "/equipment?page=1&per_page=5").await;
    assert!(body["items"].is_array());
    assert!(body["total"].as_i64().unwrap() >= 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 5);
}

#[tokio::test]
#[ignore]
async fn test_equipment_qr_code_and_search() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (_, equipment_id) = create_equipment(&client, &token).await;

    let response = post_json(
        &client,
        &token,
        &format!("/equipment/{}/qr-code", equipment_id),
        json!({}),
    )
    .await;
    assert!(response.status().is_success());
    let qr: Value = response.json().await.unwrap();
    assert!(qr["qr_code_url"].as_str().unwrap().ends_with(&equipment_id));

    let found = get_json(&client, &token, "/equipment/search?term=draeger").await;
    assert!(!found.as_array().unwrap().is_empty());

    let response = client
        .get(format!("{}/equipment/search?term=", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_equipment_code_conflicts() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (department_id, equipment_id) = create_equipment(&client, &token).await;
    let existing = get_json(&client, &token, &format!("/equipment/{}", equipment_id)).await;

    let response = post_json(
        &client,
        &token,
        "/equipment",
        json!({
            "code": existing["code"],
            "name": "Monitor",
            "model": "M1",
            "manufacturer": "Philips",
            "serial_number": unique("SN"),
            "acquired_on": "2023-05-10",
            "department_id": department_id
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_maintenance_status_propagates_to_equipment() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (_, equipment_id) = create_equipment(&client, &token).await;

    let response = post_json(
        &client,
        &token,
        "/maintenance",
        json!({
            "equipment_id": equipment_id,
            "maintenance_type": "CORRECTIVE",
            "description": "Replace flow sensor",
            "labor_cost": "150.00",
            "parts_cost": "1084.56"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record: Value = response.json().await.unwrap();
    let record_id = record["id"].as_str().unwrap().to_string();
    assert_eq!(record["status"], "SCHEDULED");

    let details = get_json(&client, &token, &format!("/maintenance/{}", record_id)).await;
    assert_eq!(details["total_cost_display"], "R$ 1.234,56");

    // Unknown status leaves everything unchanged
    let response = put_json(
        &client,
        &token,
        &format!("/maintenance/{}/status", record_id),
        json!({ "status": "BOGUS" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        &client,
        &token,
        &format!("/maintenance/{}/status", record_id),
        json!({ "status": "IN_PROGRESS" }),
    )
    .await;
    assert!(response.status().is_success());
    let status: Value = response.json().await.unwrap();
    assert_eq!(status["status"], "IN_PROGRESS");

    let equipment = get_json(&client, &token, &format!("/equipment/{}", equipment_id)).await;
    assert_eq!(equipment["status"], "UNDER_MAINTENANCE");

    let response = put_json(
        &client,
        &token,
        &format!("/maintenance/{}/status", record_id),
        json!({ "status": "COMPLETED" }),
    )
    .await;
    assert!(response.status().is_success());

    let equipment = get_json(&client, &token, &format!("/equipment/{}", equipment_id)).await;
    assert_eq!(equipment["status"], "ACTIVE");
    assert!(equipment["last_maintenance_date"].is_string());

    let record = get_json(&client, &token, &format!("/maintenance/{}", record_id)).await;
    assert!(record["start_time"].is_string());
    assert!(record["end_time"].is_string());
    assert!(record["downtime_minutes"].is_number());

    let history = get_json(&client, &token, &format!("/equipment/{}/history", equipment_id)).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_service_order_lifecycle_and_rating() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (department_id, equipment_id) = create_equipment(&client, &token).await;
    let me = get_json(&client, &token, "/auth/me").await;

    let response = post_json(
        &client,
        &token,
        "/service-orders",
        json!({
            "equipment_id": equipment_id,
            "department_id": department_id,
            "requester_id": me["id"],
            "service_type": "CORRECTIVE_MAINTENANCE",
            "problem_description": "Alarm keeps sounding"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let order: Value = response.json().await.unwrap();
    let order_id = order["id"].as_str().unwrap().to_string();
    assert!(order["code"].as_str().unwrap().starts_with("SO-"));
    assert_eq!(order["status"], "OPEN");

    // Not completed yet
    let response = post_json(
        &client,
        &token,
        &format!("/service-orders/{}/rating", order_id),
        json!({ "rating": 5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        &client,
        &token,
        &format!("/service-orders/{}/status", order_id),
        json!({ "status": "ASSIGNED" }),
    )
    .await;
    assert!(response.status().is_success());
    let assigned = get_json(&client, &token, &format!("/service-orders/{}", order_id)).await;
    let assigned_at = assigned["assigned_at"].clone();
    assert!(assigned_at.is_string());

    // Reapplying the same status keeps the first timestamp
    put_json(
        &client,
        &token,
        &format!("/service-orders/{}/status", order_id),
        json!({ "status": "ASSIGNED" }),
    )
    .await;
    let again = get_json(&client, &token, &format!("/service-orders/{}", order_id)).await;
    assert_eq!(again["assigned_at"], assigned_at);

    let response = put_json(
        &client,
        &token,
        &format!("/service-orders/{}/status", order_id),
        json!({ "status": "COMPLETED" }),
    )
    .await;
    assert!(response.status().is_success());

    for bad in [json!(0), json!(6), json!(4.5)] {
        let response = post_json(
            &client,
            &token,
            &format!("/service-orders/{}/rating", order_id),
            json!({ "rating": bad }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = post_json(
        &client,
        &token,
        &format!("/service-orders/{}/rating", order_id),
        json!({ "rating": 5, "comment": "Fast fix" }),
    )
    .await;
    assert!(response.status().is_success());
    let rated: Value = response.json().await.unwrap();
    assert_eq!(rated["satisfaction_rating"], 5);
    assert_eq!(rated["satisfaction_comment"], "Fast fix");

    let completed = get_json(&client, &token, "/service-orders/status/completed").await;
    assert!(completed
        .as_array()
        .unwrap()
        .iter()
        .any(|o| o["id"] == order_id.as_str()));
}

#[tokio::test]
#[ignore]
async fn test_maintenance_end_before_start_is_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (_, equipment_id) = create_equipment(&client, &token).await;

    let response = post_json(
        &client,
        &token,
        "/maintenance",
        json!({
            "equipment_id": equipment_id,
            "maintenance_type": "PREVENTIVE",
            "description": "Calibration",
            "start_time": "2024-05-14T10:00:00Z",
            "end_time": "2024-05-14T09:00:00Z"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Start set in the future, then completed now
    let response = post_json(
        &client,
        &token,
        "/maintenance",
        json!({
            "equipment_id": equipment_id,
            "maintenance_type": "PREVENTIVE",
            "description": "Calibration",
            "start_time": "2999-01-01T00:00:00Z"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record: Value = response.json().await.unwrap();
    let record_id = record["id"].as_str().unwrap().to_string();

    let response = put_json(
        &client,
        &token,
        &format!("/maintenance/{}/status", record_id),
        json!({ "status": "COMPLETED" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let record = get_json(&client, &token, &format!("/maintenance/{}", record_id)).await;
    assert_eq!(record["status"], "SCHEDULED");
    assert!(record["downtime_minutes"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_delete_guards() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (_, equipment_id) = create_equipment(&client, &token).await;
    let me = get_json(&client, &token, "/auth/me").await;

    // Order filed against a department that owns no equipment
    let response = post_json(
        &client,
        &token,
        "/departments",
        json!({ "name": unique("Radiology") }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let department: Value = response.json().await.unwrap();
    let department_id = department["id"].as_str().unwrap().to_string();

    let response = post_json(
        &client,
        &token,
        "/service-orders",
        json!({
            "equipment_id": equipment_id,
            "department_id": department_id,
            "requester_id": me["id"],
            "service_type": "CORRECTIVE_MAINTENANCE",
            "problem_description": "Display flickers"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let order: Value = response.json().await.unwrap();
    let order_id = order["id"].as_str().unwrap().to_string();

    let response = delete(&client, &token, &format!("/departments/{}", department_id)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &client,
        &token,
        "/maintenance",
        json!({
            "equipment_id": equipment_id,
            "maintenance_type": "CORRECTIVE",
            "description": "Replace display cable"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record: Value = response.json().await.unwrap();

    let response = put_json(
        &client,
        &token,
        &format!("/service-orders/{}", order_id),
        json!({ "maintenance_id": record["id"] }),
    )
    .await;
    assert!(response.status().is_success());

    let response = delete(&client, &token, &format!("/service-orders/{}", order_id)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let order = get_json(&client, &token, &format!("/service-orders/{}", order_id)).await;
    assert_eq!(order["maintenance_id"], record["id"]);
}

#[tokio::test]
#[ignore]
async fn test_certificates_expiring() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (_, equipment_id) = create_equipment(&client, &token).await;

    let today = chrono::Utc::now().date_naive();
    let response = post_json(
        &client,
        &token,
        "/certificates",
        json!({
            "equipment_id": equipment_id,
            "certificate_type": "CALIBRATION",
            "issued_on": (today - chrono::Duration::days(350)).to_string(),
            "expires_on": (today + chrono::Duration::days(15)).to_string(),
            "issuer": "Metrology Lab"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let certificate: Value = response.json().await.unwrap();
    assert_eq!(certificate["expired"], false);
    assert_eq!(certificate["expiring_soon"], true);

    let expiring = get_json(&client, &token, "/certificates/expiring?days=30").await;
    assert!(expiring
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["id"] == certificate["id"]));
}

#[tokio::test]
#[ignore]
async fn test_create_user_validation() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = post_json(
        &client,
        &token,
        "/users",
        json!({
            "name": "Short Password",
            "email": format!("{}@example.com", unique("user")),
            "password": "123"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &client,
        &token,
        "/users",
        json!({
            "name": "Viewer",
            "email": format!("{}@example.com", unique("viewer")),
            "password": "secret123",
            "role": "VIEWER"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["role"], "VIEWER");
    assert!(user["password_hash"].is_null());
}
