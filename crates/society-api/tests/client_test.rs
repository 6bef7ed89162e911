#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use society_api::types::{
    AlertStatus, BulkReviewRequest, ExportFormat, ListQuery, LoginRequest, ReviewAction,
    UpdateUserRequest, ViolationStatus,
};
use society_api::{ApiClient, Error, MemoryTokenStore, TokenPair, TokenStore};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(tokens: Option<TokenPair>) -> (MockServer, ApiClient, Arc<MemoryTokenStore>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let store = Arc::new(match tokens {
        Some(pair) => MemoryTokenStore::with_tokens(pair),
        None => MemoryTokenStore::new(),
    });
    let client = ApiClient::with_client(reqwest::Client::new(), base_url, store.clone());
    (server, client, store)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

fn alert_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "alertId": "ALT-0001",
        "title": "Water outage",
        "description": "Tank cleaning in block A",
        "type": "water",
        "priority": "high",
        "status": status,
        "createdBy": { "_id": "u1", "name": "Asha" },
        "createdAt": "2026-10-01T08:00:00Z"
    })
}

fn user_json() -> serde_json::Value {
    json!({
        "_id": "u1",
        "name": "Asha",
        "email": "asha@example.com",
        "role": "admin"
    })
}

// ── Authorization header ────────────────────────────────────────────

#[tokio::test]
async fn test_no_token_sends_no_authorization_header() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/alerts/active"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    let alerts = client.active_alerts().await.unwrap();
    assert!(alerts.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_stored_token_is_sent_as_bearer() {
    let (server, client, _) = setup(Some(TokenPair::new("tok-123", None))).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ok(user_json()))
        .mount(&server)
        .await;

    let me = client.me().await.unwrap();
    assert_eq!(me.id, "u1");
    assert!(me.is_admin());
}

#[tokio::test]
async fn test_unauthorized_surfaces_as_error() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/alerts/a1"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "success": false, "message": "Access token required" })),
        )
        .mount(&server)
        .await;

    let err = client.get_alert("a1").await.unwrap_err();
    match err {
        Error::Unauthorized { ref message } => assert_eq!(message, "Access token required"),
        other => panic!("expected Unauthorized, got: {other:?}"),
    }
    assert!(err.is_auth_expired());
}

// ── Envelope handling ───────────────────────────────────────────────

#[tokio::test]
async fn test_success_false_is_rejected() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/billing/admin/analytics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Analytics unavailable",
            "errors": ["cache cold"]
        })))
        .mount(&server)
        .await;

    let err = client.billing_analytics().await.unwrap_err();
    assert!(matches!(err, Error::Rejected { .. }), "got: {err:?}");
    assert_eq!(err.server_errors(), ["cache cold".to_string()]);
}

#[tokio::test]
async fn test_api_error_carries_status_and_message() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/admin/users/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "success": false, "message": "User not found" })),
        )
        .mount(&server)
        .await;

    let err = client.get_user("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.is_not_found());
    assert!(err.to_string().contains("User not found"));
}

#[tokio::test]
async fn test_non_json_error_body_uses_reason_phrase() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/alerts/active"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>down</html>"))
        .mount(&server)
        .await;

    let err = client.active_alerts().await.unwrap_err();
    match &err {
        Error::Api { status, message, .. } => {
            assert_eq!(*status, 503);
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/alerts/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.get_alert("a1").await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_missing_data_is_reported() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/alerts/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let err = client.get_alert("a1").await.unwrap_err();
    match err {
        Error::MissingData { endpoint } => assert_eq!(endpoint, "/api/alerts/a1"),
        other => panic!("expected MissingData, got: {other:?}"),
    }
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_tokens() {
    let (server, client, store) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "asha@example.com", "password": "hunter22" })))
        .respond_with(ok(json!({
            "user": user_json(),
            "accessToken": "access-1",
            "refreshToken": "refresh-1"
        })))
        .mount(&server)
        .await;

    let request = LoginRequest {
        email: "asha@example.com".into(),
        password: "hunter22".to_string().into(),
    };
    let auth = client.login(&request).await.unwrap();

    assert_eq!(auth.user.name, "Asha");
    let pair = store.load().unwrap();
    assert_eq!(secrecy::ExposeSecret::expose_secret(&pair.access_token), "access-1");
    assert!(client.has_access_token());
}

#[tokio::test]
async fn test_refresh_keeps_old_refresh_token_when_none_returned() {
    let (server, client, store) =
        setup(Some(TokenPair::new("stale", Some("refresh-1".into())))).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .and(body_json(json!({ "refreshToken": "refresh-1" })))
        .respond_with(ok(json!({ "accessToken": "fresh" })))
        .mount(&server)
        .await;

    client.refresh_tokens().await.unwrap();

    let access = store.access_token().unwrap();
    let refresh = store.refresh_token().unwrap();
    assert_eq!(secrecy::ExposeSecret::expose_secret(&access), "fresh");
    assert_eq!(secrecy::ExposeSecret::expose_secret(&refresh), "refresh-1");
}

#[tokio::test]
async fn test_refresh_without_token_makes_no_request() {
    let (server, client, _) = setup(None).await;

    let err = client.refresh_tokens().await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_clears_tokens_even_when_server_fails() {
    let (server, client, store) = setup(Some(TokenPair::new("tok", None))).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.logout().await;
    assert!(result.is_err());
    assert!(store.load().is_none());
}

// ── Alerts ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_alerts_sends_query_and_reads_page() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .and(query_param("status", "active"))
        .and(query_param("type", "water"))
        .and(query_param("page", "2"))
        .respond_with(ok(json!({
            "alerts": [alert_json("a1", "active")],
            "pagination": {
                "currentPage": 2,
                "totalPages": 3,
                "totalItems": 21,
                "itemsPerPage": 10
            }
        })))
        .mount(&server)
        .await;

    let query = ListQuery {
        page: Some(2),
        status: Some("active".into()),
        kind: Some("water".into()),
        ..ListQuery::default()
    };
    let page = client.list_alerts(&query).await.unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page.items[0].created_by.id(), "u1");
    assert!(page.pagination.has_next());
}

#[tokio::test]
async fn test_resolve_alert_posts_notes() {
    let (server, client, _) = setup(Some(TokenPair::new("tok", None))).await;

    Mock::given(method("POST"))
        .and(path("/api/alerts/a1/resolve"))
        .and(body_json(json!({ "resolutionNotes": "Tank refilled" })))
        .respond_with(ok(alert_json("a1", "resolved")))
        .mount(&server)
        .await;

    let request = society_api::types::ResolveRequest {
        resolution_notes: "Tank refilled".into(),
        proof_images: Vec::new(),
    };
    let alert = client.resolve_alert("a1", &request).await.unwrap();
    assert_eq!(alert.status, AlertStatus::Resolved);
}

// ── Parking ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bulk_review_reports_partial_failure() {
    let (server, client, _) = setup(Some(TokenPair::new("tok", None))).await;

    let ids: Vec<String> = (1..=6).map(|i| format!("v{i}")).collect();
    let mut results: Vec<_> = ids[..5]
        .iter()
        .map(|id| json!({ "violationId": id, "success": true }))
        .collect();
    results.push(json!({ "violationId": "v6", "success": false, "error": "Violation not found" }));

    Mock::given(method("PUT"))
        .and(path("/api/admin/parking/violations/bulk-review"))
        .respond_with(ok(json!({ "successful": 5, "failed": 1, "results": results })))
        .mount(&server)
        .await;

    let request = BulkReviewRequest {
        violation_ids: ids,
        action: ReviewAction::Approve,
        notes: None,
    };
    let result = client.bulk_review_violations(&request).await.unwrap();

    assert_eq!(result.successful, 5);
    assert_eq!(result.failed, 1);
    assert_eq!(result.results[5].violation_id, "v6");
    assert!(!result.results[5].success);
}

#[tokio::test]
async fn test_export_returns_raw_bytes() {
    let (server, client, _) = setup(Some(TokenPair::new("tok", None))).await;

    let csv = "violationId,vehicleNumber\nPV-1,KA01AB1234\n";
    Mock::given(method("GET"))
        .and(path("/api/admin/parking/violations/export"))
        .and(query_param("format", "csv"))
        .and(query_param("status", "approved"))
        .respond_with(ResponseTemplate::new(200).set_body_string(csv))
        .mount(&server)
        .await;

    let bytes = client
        .export_violations(ExportFormat::Csv, Some(ViolationStatus::Approved))
        .await
        .unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), csv);
}

// ── Users ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_user_sends_only_set_fields() {
    let (server, client, _) = setup(Some(TokenPair::new("tok", None))).await;

    Mock::given(method("PATCH"))
        .and(path("/api/admin/users/u1"))
        .and(body_json(json!({ "phone": "9876543210" })))
        .respond_with(ok(user_json()))
        .mount(&server)
        .await;

    let request = UpdateUserRequest {
        phone: Some("9876543210".into()),
        ..UpdateUserRequest::default()
    };
    let user = client.update_user("u1", &request).await.unwrap();
    assert_eq!(user.email, "asha@example.com");
}

#[tokio::test]
async fn test_delete_user_accepts_envelope_without_data() {
    let (server, client, _) = setup(Some(TokenPair::new("tok", None))).await;

    Mock::given(method("DELETE"))
        .and(path("/api/admin/users/u1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "message": "User deleted" })),
        )
        .mount(&server)
        .await;

    client.delete_user("u1").await.unwrap();
}
