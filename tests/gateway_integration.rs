use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use healthchain_dashboard::api::{ApiService, Gateway, SharedGateway};
use healthchain_dashboard::blockchain::LocalWalletAdapter;
use healthchain_dashboard::models::{
    ConsentFilter, ConsentStatus, ConsentUpdate, PatientQuery, StatusFilter, TransactionFilter,
};
use healthchain_dashboard::services::{ConsentManager, ConsentWorkflow, PatientDetail};
use healthchain_dashboard::DashboardError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// Hardhat account #0
const PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

#[derive(Debug, Clone, PartialEq)]
struct Seen {
    method: &'static str,
    path: String,
    query: HashMap<String, String>,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct Stub {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Stub {
    fn push(&self, method: &'static str, path: String, query: HashMap<String, String>, body: Option<Value>) {
        self.seen.lock().unwrap().push(Seen {
            method,
            path,
            query,
            body,
        });
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

fn consent_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "patientId": "patient-001",
        "purpose": "Research Study Participation",
        "walletAddress": ADDRESS,
        "signature": "0xabc",
        "status": status,
        "createdAt": "2024-01-15T10:00:00Z"
    })
}

async fn list_patients(State(stub): State<Stub>, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    stub.push("GET", "/api/patients".into(), query, None);
    Json(json!({
        "patients": [{ "id": "patient-001", "name": "John Doe", "dateOfBirth": "1985-03-15" }],
        "pagination": { "page": 2, "limit": 10, "total": 12, "totalPages": 2 }
    }))
}

async fn get_patient(State(stub): State<Stub>, Path(id): Path<String>) -> Response {
    stub.push("GET", format!("/api/patients/{}", id), HashMap::new(), None);
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Patient not found" }))).into_response();
    }
    Json(json!({ "id": id, "name": "John Doe", "walletAddress": ADDRESS })).into_response()
}

async fn get_records(State(stub): State<Stub>, Path(id): Path<String>) -> Response {
    stub.push("GET", format!("/api/patients/{}/records", id), HashMap::new(), None);
    if id == "garbled" {
        return (StatusCode::OK, "<html>maintenance</html>").into_response();
    }
    Json(json!({
        "records": [
            { "id": "rec-1", "type": "Lab Results", "title": "Blood panel", "status": "verified" },
            { "id": "rec-2", "type": "Diagnosis", "title": "Annual checkup" }
        ]
    }))
    .into_response()
}

async fn list_consents(State(stub): State<Stub>, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let status = query.get("status").cloned();
    stub.push("GET", "/api/consents".into(), query, None);
    let consents = match status.as_deref() {
        Some("active") => vec![consent_json("consent-2", "active")],
        _ => vec![consent_json("consent-1", "pending"), consent_json("consent-2", "active")],
    };
    Json(json!({ "consents": consents }))
}

async fn create_consent(State(stub): State<Stub>, Json(body): Json<Value>) -> Response {
    stub.push("POST", "/api/consents".into(), HashMap::new(), Some(body.clone()));
    if body["patientId"] == "patient-locked" {
        return (StatusCode::CONFLICT, Json(json!({ "message": "Patient record is locked" }))).into_response();
    }
    let mut created = consent_json("consent-9", "pending");
    created["patientId"] = body["patientId"].clone();
    created["signature"] = body["signature"].clone();
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update_consent(State(stub): State<Stub>, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    stub.push("PATCH", format!("/api/consents/{}", id), HashMap::new(), Some(body.clone()));
    if id == "broken" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }
    let status = body["status"].as_str().unwrap_or("pending");
    Json(consent_json(&id, status)).into_response()
}

async fn list_transactions(State(stub): State<Stub>, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    stub.push("GET", "/api/transactions".into(), query, None);
    Json(json!({
        "transactions": [{
            "id": "tx-1",
            "type": "consent_approval",
            "from": ADDRESS,
            "to": "0x0000000000000000000000000000000000000001",
            "amount": "0.5",
            "status": "confirmed",
            "timestamp": "2024-01-15T10:00:00Z",
            "blockchainTxHash": "0x9fc76417374aa880d4449a1f7f31ec597f00b1f6f3dd2d66f4c9c6c445836d8b"
        }]
    }))
}

async fn stats(State(stub): State<Stub>) -> StatusCode {
    stub.push("GET", "/api/stats".into(), HashMap::new(), None);
    StatusCode::SERVICE_UNAVAILABLE
}

async fn spawn_stub() -> (Stub, ApiService) {
    let stub = Stub::default();
    let app = Router::new()
        .route("/api/patients", get(list_patients))
        .route("/api/patients/{id}", get(get_patient))
        .route("/api/patients/{id}/records", get(get_records))
        .route("/api/consents", get(list_consents).post(create_consent))
        .route("/api/consents/{id}", patch(update_consent))
        .route("/api/transactions", get(list_transactions))
        .route("/api/stats", get(stats))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub gateway");
    let addr = listener.local_addr().expect("Failed to read stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub gateway stopped");
    });

    let api = ApiService::new(&format!("http://{}/api/", addr), Duration::from_secs(5))
        .expect("Failed to build client");
    (stub, api)
}

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[tokio::test]
async fn test_patient_list_sends_paging_and_search() {
    let (stub, api) = spawn_stub().await;

    let response = api
        .list_patients(&PatientQuery {
            page: 2,
            limit: 10,
            search: "john doe".to_string(),
        })
        .await
        .expect("Failed to list patients");

    assert_eq!(response.patients[0].name, "John Doe");
    assert_eq!(response.pagination.map(|p| p.total_pages), Some(2));
    assert_eq!(
        stub.seen()[0].query,
        query(&[("page", "2"), ("limit", "10"), ("search", "john doe")])
    );
}

#[tokio::test]
async fn test_patient_detail_and_not_found_message() {
    let (_stub, api) = spawn_stub().await;
    let gateway: SharedGateway = Arc::new(api);

    let detail = PatientDetail::load(&gateway, "patient-001").await.expect("Failed to load detail");
    assert_eq!(detail.patient.wallet_address.as_deref(), Some(ADDRESS));
    assert_eq!(detail.records.len(), 2);
    assert_eq!(detail.records[0].record_type.as_deref(), Some("Lab Results"));

    let err = PatientDetail::load(&gateway, "missing").await.unwrap_err();
    assert_eq!(err, DashboardError::Gateway("Patient not found".to_string()));
}

#[tokio::test]
async fn test_consent_filters_are_omitted_when_unset() {
    let (stub, api) = spawn_stub().await;

    api.list_consents(&ConsentFilter::default()).await.expect("Failed to list consents");
    let active = api
        .list_consents(&ConsentFilter {
            patient_id: Some("patient-001".to_string()),
            status: StatusFilter::Only(ConsentStatus::Active),
        })
        .await
        .expect("Failed to list consents");

    assert_eq!(active.consents.len(), 1);
    let seen = stub.seen();
    assert!(seen[0].query.is_empty());
    assert_eq!(seen[1].query, query(&[("patientId", "patient-001"), ("status", "active")]));
}

#[tokio::test]
async fn test_create_consent_signs_and_posts() {
    let (stub, api) = spawn_stub().await;
    let wallet = LocalWalletAdapter::new(Some(PRIVATE_KEY)).unwrap().into_handle();
    wallet.connect().await.unwrap();

    let workflow = ConsentWorkflow::new(Arc::new(api), wallet);
    let consent = workflow
        .create_consent("patient-001", "Research Study Participation", Some(ADDRESS))
        .await
        .expect("Failed to create consent");

    assert_eq!(consent.status, ConsentStatus::Pending);
    let body = stub.seen()[0].body.clone().unwrap();
    assert_eq!(body["patientId"], "patient-001");
    assert_eq!(body["purpose"], "Research Study Participation");
    assert_eq!(body["walletAddress"], ADDRESS);

    let signature = body["signature"].as_str().unwrap();
    assert!(signature.starts_with("0x"));
    assert_eq!(signature.len(), 2 + 130);
    assert_eq!(consent.signature.as_deref(), Some(signature));
}

#[tokio::test]
async fn test_create_failure_carries_gateway_message() {
    let (_stub, api) = spawn_stub().await;
    let wallet = LocalWalletAdapter::new(Some(PRIVATE_KEY)).unwrap().into_handle();
    wallet.connect().await.unwrap();

    let err = ConsentWorkflow::new(Arc::new(api), wallet)
        .create_consent("patient-locked", "Data Sharing with Research Institution", Some(ADDRESS))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to create consent: Patient record is locked");
}

#[tokio::test]
async fn test_approve_patches_and_refetches() {
    let (stub, api) = spawn_stub().await;
    let wallet = LocalWalletAdapter::new(Some(PRIVATE_KEY)).unwrap().into_handle();
    wallet.connect().await.unwrap();

    let manager = ConsentManager::new(Arc::new(api), wallet);
    manager.mount().await.unwrap();
    let approved = manager.approve("consent-1").await.unwrap();
    assert_eq!(approved.status, ConsentStatus::Active);

    let seen = stub.seen();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[1].method, "PATCH");
    assert_eq!(seen[1].path, "/api/consents/consent-1");
    assert_eq!(seen[1].body, Some(json!({ "status": "active" })));
    assert_eq!(seen[2].path, "/api/consents");
}

#[tokio::test]
async fn test_update_with_anchor_hash_and_plain_text_error() {
    let (stub, api) = spawn_stub().await;

    let update = ConsentUpdate {
        status: ConsentStatus::Revoked,
        blockchain_tx_hash: Some("0xfeed".to_string()),
    };
    api.update_consent("consent-1", &update).await.unwrap();
    assert_eq!(
        stub.seen()[0].body,
        Some(json!({ "status": "revoked", "blockchainTxHash": "0xfeed" }))
    );

    let err = api.update_consent("broken", &update).await.unwrap_err();
    assert_eq!(err, DashboardError::Gateway("database unavailable".to_string()));
}

#[tokio::test]
async fn test_transactions_scope_and_string_amounts() {
    let (stub, api) = spawn_stub().await;

    let response = api
        .list_transactions(&TransactionFilter {
            wallet_address: Some(ADDRESS.to_string()),
            limit: 20,
        })
        .await
        .unwrap();
    api.list_transactions(&TransactionFilter::default()).await.unwrap();

    let tx = &response.transactions[0];
    assert_eq!(tx.amount_display().as_deref(), Some("0.5"));
    assert_eq!(tx.currency(), "ETH");
    assert!(tx.is_confirmed());

    let seen = stub.seen();
    assert_eq!(seen[0].query, query(&[("limit", "20"), ("walletAddress", ADDRESS)]));
    assert_eq!(seen[1].query, query(&[("limit", "20")]));
}

#[tokio::test]
async fn test_empty_error_body_falls_back_to_status_code() {
    let (_stub, api) = spawn_stub().await;
    let err = api.get_stats().await.unwrap_err();
    assert_eq!(err.message(), "Request failed with status code 503");
}

#[tokio::test]
async fn test_undecodable_success_body_is_serialization_error() {
    let (_stub, api) = spawn_stub().await;
    let err = api.get_patient_records("garbled").await.unwrap_err();
    assert!(matches!(err, DashboardError::Serialization(_)), "got {:?}", err);
    assert_eq!(err.kind(), "serialization_error");
}
