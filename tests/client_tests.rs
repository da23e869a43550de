use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, patch, post},
};
use hopeon_portal::{
    ApiClient, ApiError, MemorySessionStore, SessionState, SessionStore,
    models::{DonationStatus, OtpPurpose, PageParams, WithdrawalFilters, WithdrawalStatus},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

// --- Stub Backend ---

#[derive(Clone, Default)]
struct Seen {
    authorization: Arc<Mutex<Vec<Option<String>>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl Seen {
    fn record_auth(&self, headers: &HeaderMap) {
        let value = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.authorization.lock().unwrap().push(value);
    }
}

fn user(role: &str) -> Value {
    json!({ "_id": "u1", "name": "Ada", "email": "ada@example.com", "role": role })
}

async fn login(State(seen): State<Seen>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    seen.bodies.lock().unwrap().push(body.clone());
    if body["password"] == "secret" {
        (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "ok", "data": { "user": user("organizer"), "token": "tok-9" } })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Invalid email or password" })),
        )
    }
}

async fn profile(State(seen): State<Seen>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    seen.record_auth(&headers);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some("Bearer good") => (StatusCode::OK, Json(json!({ "success": true, "data": user("donor") }))),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Token expired" })),
        ),
    }
}

async fn stats(State(seen): State<Seen>, headers: HeaderMap) -> Json<Value> {
    seen.record_auth(&headers);
    Json(json!({
        "success": true,
        "data": {
            "totalAmount": 1500.5,
            "totalDonations": 12,
            "avgDonation": 125.04,
            "maxDonation": 500.0,
            "minDonation": 10.0
        }
    }))
}

async fn my_donations(State(seen): State<Seen>, Query(raw): Query<Vec<(String, String)>>) -> Json<Value> {
    let query = raw
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    seen.queries.lock().unwrap().push(query);
    Json(json!({
        "success": true,
        "donations": [],
        "pagination": { "page": 2, "limit": 5, "total": 0, "pages": 0 }
    }))
}

async fn donation_status(
    State(seen): State<Seen>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    seen.bodies.lock().unwrap().push(json!({ "id": id, "body": body }));
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "message": "Invalid status transition" })),
    )
}

async fn withdrawals(
    State(seen): State<Seen>,
    Query(raw): Query<Vec<(String, String)>>,
) -> Json<Value> {
    let query = raw
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    seen.queries.lock().unwrap().push(query);
    Json(json!({ "success": true, "withdrawals": [] }))
}

async fn request_otp(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
    seen.bodies.lock().unwrap().push(body);
    Json(json!({ "success": true, "data": { "message": "OTP sent", "otpCode": "123456" } }))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

async fn spawn_backend() -> (String, Seen) {
    let seen = Seen::default();
    let router = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/profile", get(profile))
        .route("/api/auth/request-otp", post(request_otp))
        .route("/api/donations/stats", get(stats))
        .route("/api/donations/my-donations", get(my_donations))
        .route("/api/donations/{id}/status", patch(donation_status))
        .route("/api/withdrawals", get(withdrawals))
        .route("/api/campaigns", get(broken))
        .with_state(seen.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (address, seen)
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
}

// --- Tests ---

#[tokio::test]
async fn test_login_returns_token_and_principal() {
    let (address, seen) = spawn_backend().await;

    let input = hopeon_portal::models::LoginInput {
        email: "ada@example.com".to_string(),
        password: "secret".to_string(),
    };
    let response = client(&address).login(&input).await.unwrap();

    assert!(response.success);
    assert_eq!(response.data.token, "tok-9");
    assert_eq!(response.data.user.role, hopeon_portal::Role::Organizer);
    assert_eq!(seen.bodies.lock().unwrap()[0]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_rejected_login_carries_backend_message() {
    let (address, _) = spawn_backend().await;

    let input = hopeon_portal::models::LoginInput {
        email: "ada@example.com".to_string(),
        password: "wrong".to_string(),
    };
    let err = client(&address).login(&input).await.unwrap_err();

    match err {
        ApiError::Unauthorized(message) => assert_eq!(message, "Invalid email or password"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_bound_client_sends_bearer_token() {
    let (address, seen) = spawn_backend().await;
    let store = Arc::new(MemorySessionStore::seeded(Some("good"), Some(r#"{"role":"donor"}"#)));
    let state: SessionState = store.clone();

    let profile = client(&address).with_session(state).profile().await.unwrap();

    assert_eq!(profile.data.email, "ada@example.com");
    assert_eq!(
        *seen.authorization.lock().unwrap(),
        vec![Some("Bearer good".to_string())]
    );
    assert_eq!(store.read().token.as_deref(), Some("good"));
}

#[tokio::test]
async fn test_unbound_client_sends_no_authorization() {
    let (address, seen) = spawn_backend().await;

    let stats = client(&address).donation_stats().await.unwrap();

    assert_eq!(stats.data.total_donations, 12);
    assert_eq!(*seen.authorization.lock().unwrap(), vec![None::<String>]);
}

#[tokio::test]
async fn test_unauthorized_response_clears_bound_session() {
    let (address, _) = spawn_backend().await;
    let store = Arc::new(MemorySessionStore::seeded(Some("stale"), Some(r#"{"role":"donor"}"#)));
    let state: SessionState = store.clone();

    let err = client(&address).with_session(state).profile().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "Token expired"));
    assert!(store.read().is_empty());
}

#[tokio::test]
async fn test_pagination_is_sent_as_query() {
    let (address, seen) = spawn_backend().await;

    let page = PageParams {
        page: Some(2),
        limit: Some(5),
    };
    let response = client(&address).my_donations(page).await.unwrap();

    assert_eq!(response.pagination.map(|p| p.page), Some(2));
    assert_eq!(seen.queries.lock().unwrap()[0], "page=2&limit=5");
}

#[tokio::test]
async fn test_filter_enums_use_backend_spelling() {
    let (address, seen) = spawn_backend().await;

    let filters = WithdrawalFilters {
        status: Some(WithdrawalStatus::Pending),
        ..Default::default()
    };
    let response = client(&address).list_withdrawals(&filters).await.unwrap();

    assert!(response.withdrawals.is_empty());
    assert!(response.pagination.is_none());
    // Unset filters are left out of the query entirely.
    assert_eq!(seen.queries.lock().unwrap()[0], "status=pending");
}

#[tokio::test]
async fn test_client_error_keeps_status_and_message() {
    let (address, seen) = spawn_backend().await;

    let err = client(&address)
        .update_donation_status("d/1", DonationStatus::Completed, None)
        .await
        .unwrap_err();

    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message, "Invalid status transition");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let recorded = seen.bodies.lock().unwrap()[0].clone();
    assert_eq!(recorded["id"], "d/1");
    assert_eq!(recorded["body"]["status"], "COMPLETED");
}

#[tokio::test]
async fn test_server_error_without_json_body_uses_reason_phrase() {
    let (address, _) = spawn_backend().await;

    let err = client(&address)
        .list_campaigns(&Default::default())
        .await
        .unwrap_err();

    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_request_otp_sends_purpose() {
    let (address, seen) = spawn_backend().await;

    let response = client(&address)
        .request_otp("ada@example.com", OtpPurpose::ForgetPassword)
        .await
        .unwrap();

    assert_eq!(response.data.otp_code.as_deref(), Some("123456"));
    assert_eq!(seen.bodies.lock().unwrap()[0]["purpose"], "forget-password");
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    // Bind then drop, leaving a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&address).donation_stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }));
}
