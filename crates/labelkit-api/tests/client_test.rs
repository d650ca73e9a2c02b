#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use labelkit_api::{
    ApiClient, EntityId, Error, Generic, MemoryTokenStore, NewLabel, Shipping, TokenStore,
    UnauthorizedHook,
};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Default)]
struct CountingHook(AtomicUsize);

impl UnauthorizedHook for CountingHook {
    fn on_unauthorized(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

async fn setup(token: Option<&str>) -> (MockServer, ApiClient, Arc<MemoryTokenStore>) {
    let server = MockServer::start().await;
    let store = Arc::new(token.map_or_else(MemoryTokenStore::new, MemoryTokenStore::with_token));
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        10,
        store.clone(),
    );
    (server, client, store)
}

// ── Authorization header ────────────────────────────────────────────

#[tokio::test]
async fn test_request_without_token_has_no_authorization_header() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client.list_labels::<Generic>().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_request_with_token_carries_bearer() {
    let (server, client, _) = setup(Some("T")).await;

    Mock::given(method("GET"))
        .and(path("/labels"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
        .expect(1)
        .mount(&server)
        .await;

    let labels = client.list_labels::<Generic>().await.unwrap();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].id, EntityId::Numeric(1));
}

// ── 401 handling ────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_clears_token_and_runs_hook() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryTokenStore::with_token("expired"));
    let hook = Arc::new(CountingHook::default());
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        10,
        store.clone(),
    )
    .with_unauthorized_hook(hook.clone());

    Mock::given(method("GET"))
        .and(path("/shipping-labels"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Could not validate credentials" })),
        )
        .mount(&server)
        .await;

    let result = client.list_labels::<Shipping>().await;

    match result {
        Err(Error::Unauthorized { detail }) => {
            assert_eq!(detail.as_deref(), Some("Could not validate credentials"));
        }
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    assert!(store.load().unwrap().is_none());
    assert_eq!(hook.0.load(Ordering::SeqCst), 1);
}

// ── Auth endpoints ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_token() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "a@example.com", "password": "pw" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "tok", "token_type": "bearer" })),
        )
        .mount(&server)
        .await;

    let resp = client
        .login("a@example.com", &SecretString::from("pw"))
        .await
        .unwrap();
    assert_eq!(resp.access_token.expose_secret(), "tok");
    assert_eq!(resp.token_type.as_deref(), Some("bearer"));
}

#[tokio::test]
async fn test_reset_password_sends_email_query() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/auth/reset-password"))
        .and(query_param("email", "a@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "sent" })))
        .expect(1)
        .mount(&server)
        .await;

    client.reset_password("a@example.com").await.unwrap();
}

#[tokio::test]
async fn test_validation_error_detail_is_surfaced() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Email already registered" })),
        )
        .mount(&server)
        .await;

    let registration = labelkit_api::Registration {
        name: "A".into(),
        email: "a@example.com".into(),
        password: SecretString::from("pw"),
    };
    let err = client.register(&registration).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.detail(), Some("Email already registered"));
}

// ── Label endpoints ─────────────────────────────────────────────────

#[tokio::test]
async fn test_null_list_body_is_empty() {
    let (server, client, _) = setup(Some("T")).await;

    Mock::given(method("GET"))
        .and(path("/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    assert!(client.list_labels::<Generic>().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_non_ascii_body_is_deserialization_error() {
    let (server, client, _) = setup(Some("T")).await;
    let body = format!("{}{}", "x".repeat(199), "é".repeat(10));

    Mock::given(method("POST"))
        .and(path("/labels/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
        .mount(&server)
        .await;

    let draft = NewLabel {
        sender_name: "Toko".into(),
        shipping_code: "JNE1".into(),
    };
    let result = client.create_label::<Generic>(&draft).await;
    assert!(
        matches!(&result, Err(Error::Deserialization { body: kept, .. }) if *kept == body),
        "expected Deserialization, got: {result:?}"
    );
}

#[tokio::test]
async fn test_create_label_posts_draft() {
    let (server, client, _) = setup(Some("T")).await;

    Mock::given(method("POST"))
        .and(path("/labels/generate"))
        .and(body_json(json!({ "sender_name": "Toko", "shipping_code": "JNE1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "sender_name": "Toko",
            "shipping_code": "JNE1",
            "created_at": "2024-06-15T10:30:00"
        })))
        .mount(&server)
        .await;

    let draft = NewLabel {
        sender_name: "Toko".into(),
        shipping_code: "JNE1".into(),
    };
    let label = client.create_label::<Generic>(&draft).await.unwrap();
    assert_eq!(label.id, EntityId::Numeric(9));
    assert!(label.created_at.is_some());
}

#[tokio::test]
async fn test_bulk_delete_sends_ids() {
    let (server, client, _) = setup(Some("T")).await;

    Mock::given(method("DELETE"))
        .and(path("/shipping-labels/bulk"))
        .and(body_json(json!({ "ids": [1, 2] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deleted": 2 })))
        .mount(&server)
        .await;

    let result = client
        .bulk_delete_labels::<Shipping>(&[EntityId::Numeric(1), EntityId::Numeric(2)])
        .await
        .unwrap();
    assert_eq!(result.deleted, Some(2));
}

#[tokio::test]
async fn test_bulk_delete_keeps_partial_result() {
    let (server, client, _) = setup(Some("T")).await;

    Mock::given(method("DELETE"))
        .and(path("/labels/bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deleted": 1,
            "message": "1 of 2 deleted",
            "failed_ids": [{ "id": 2, "reason": "not owner" }]
        })))
        .mount(&server)
        .await;

    let result = client
        .bulk_delete_labels::<Generic>(&[EntityId::Numeric(1), EntityId::Numeric(2)])
        .await
        .unwrap();
    assert_eq!(result.deleted, Some(1));
    assert_eq!(result.message.as_deref(), Some("1 of 2 deleted"));
    assert_eq!(result.failed_ids.len(), 1);
    assert_eq!(result.failed_ids[0].id(), Some(&EntityId::Numeric(2)));
    assert_eq!(result.failed_ids[0].to_string(), "2 (not owner)");
}

#[tokio::test]
async fn test_bulk_delete_empty_body_is_empty_result() {
    let (server, client, _) = setup(Some("T")).await;

    Mock::given(method("DELETE"))
        .and(path("/labels/bulk"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = client
        .bulk_delete_labels::<Generic>(&[EntityId::Numeric(1)])
        .await
        .unwrap();
    assert_eq!(result, labelkit_api::BulkDeleteResult::default());
}

#[tokio::test]
async fn test_bulk_delete_non_json_body_is_error() {
    let (server, client, _) = setup(Some("T")).await;

    Mock::given(method("DELETE"))
        .and(path("/labels/bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let result = client.bulk_delete_labels::<Generic>(&[EntityId::Numeric(1)]).await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

#[tokio::test]
async fn test_preview_url_carries_token() {
    let (server, client, _) = setup(Some("T 1")).await;

    let url = client.preview_url::<Shipping>(&EntityId::Numeric(5)).unwrap();
    assert_eq!(url.path(), "/shipping-labels/preview/5");
    assert_eq!(url.query(), Some("token=T+1"));
    drop(server);
}

#[tokio::test]
async fn test_preview_without_token_is_not_authenticated() {
    let (_server, client, _) = setup(None).await;

    let result = client.preview_url::<Generic>(&EntityId::Numeric(5));
    assert!(matches!(result, Err(Error::NotAuthenticated)));
}

#[tokio::test]
async fn test_fetch_preview_downloads_image() {
    let (server, client, _) = setup(Some("T")).await;

    Mock::given(method("GET"))
        .and(path("/labels/preview/5"))
        .and(query_param("token", "T"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(vec![0x89, b'P', b'N', b'G']),
        )
        .mount(&server)
        .await;

    let image = client.fetch_preview::<Generic>(&EntityId::Numeric(5)).await.unwrap();
    assert_eq!(image.content_type.as_deref(), Some("image/png"));
    assert_eq!(&image.bytes[..], &[0x89, b'P', b'N', b'G']);
}

// ── Transport ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_timeout_is_reported() {
    let server = MockServer::start().await;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let client = ApiClient::with_client(
        http,
        Url::parse(&server.uri()).unwrap(),
        1,
        Arc::new(MemoryTokenStore::new()),
    );

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let result = client.current_user().await;
    assert!(
        matches!(result, Err(Error::Timeout { timeout_secs: 1 })),
        "expected Timeout, got: {result:?}"
    );
}

/// Serve one response whose headers arrive at once but whose body stalls.
async fn stalled_body_server() -> Url {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0_u8; 1024];
        let _ = socket.read(&mut buf).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n[")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

#[tokio::test]
async fn test_timeout_while_reading_body_is_reported() {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    let client = ApiClient::with_client(
        http,
        stalled_body_server().await,
        1,
        Arc::new(MemoryTokenStore::with_token("T")),
    );

    let result = client.list_labels::<Generic>().await;
    assert!(
        matches!(result, Err(Error::Timeout { timeout_secs: 1 })),
        "expected Timeout, got: {result:?}"
    );
}
