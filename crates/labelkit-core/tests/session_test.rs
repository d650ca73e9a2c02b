#![allow(clippy::unwrap_used)]
// End-to-end store behavior against a mocked service.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use labelkit_api::MemoryTokenStore;
use labelkit_core::{
    CoreError, EntityId, Locale, NewLabel, ProfileUpdate, Route, SessionConfig, SessionContext,
    TokenStore,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(token: Option<&str>) -> (MockServer, SessionContext, Arc<MemoryTokenStore>) {
    setup_with_locale(token, Locale::En).await
}

async fn setup_with_locale(
    token: Option<&str>,
    locale: Locale,
) -> (MockServer, SessionContext, Arc<MemoryTokenStore>) {
    let server = MockServer::start().await;
    let tokens = Arc::new(token.map_or_else(MemoryTokenStore::new, MemoryTokenStore::with_token));
    let mut config = SessionConfig::new(Url::parse(&server.uri()).unwrap());
    config.locale = locale;
    let ctx = SessionContext::new(&config, tokens.clone()).unwrap();
    (server, ctx, tokens)
}

fn ids(values: &[i64]) -> Vec<EntityId> {
    values.iter().copied().map(EntityId::Numeric).collect()
}

fn labels_json(values: &[i64]) -> serde_json::Value {
    json!(values
        .iter()
        .map(|id| json!({ "id": id, "sender_name": format!("S{id}") }))
        .collect::<Vec<_>>())
}

async fn mount_me(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": 1, "name": "Ana", "email": "a@x.io" })),
        )
        .mount(server)
        .await;
}

async fn mount_lists(server: &MockServer, labels: &[i64], shipping: &[i64]) {
    Mock::given(method("GET"))
        .and(path("/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(labels_json(labels)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shipping-labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(labels_json(shipping)))
        .mount(server)
        .await;
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_token_loads_profile_and_lists() {
    let (server, ctx, tokens) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "a@x.io", "password": "pw" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "T", "token_type": "bearer" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "name": "Ana" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_lists(&server, &[1, 2], &[9]).await;

    ctx.session()
        .login("a@x.io", &SecretString::from("pw"))
        .await
        .unwrap();

    assert!(ctx.session().is_authenticated());
    assert!(tokens.load().unwrap().is_some());
    assert_eq!(ctx.session().user_name(), "Ana");
    assert_eq!(ctx.labels().snapshot().ids(), ids(&[1, 2]));
    assert_eq!(ctx.shipping().snapshot().ids(), ids(&[9]));
    let state = ctx.session().snapshot();
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_invalid_login_leaves_no_token() {
    let (server, ctx, tokens) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let err = ctx
        .session()
        .login("a@x.io", &SecretString::from("wrong"))
        .await
        .unwrap_err();

    assert!(err.is_authentication());
    assert_eq!(err.message(), "Invalid credentials");
    assert!(tokens.load().unwrap().is_none());
    let state = ctx.session().snapshot();
    assert!(!state.is_authenticated());
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
    assert_eq!(ctx.navigator().current(), Route::Login);
}

#[tokio::test]
async fn test_failed_profile_fetch_aborts_login() {
    let (server, ctx, tokens) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "T" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = ctx
        .session()
        .login("a@x.io", &SecretString::from("pw"))
        .await
        .unwrap_err();

    assert_eq!(err.message(), "Failed to load profile");
    assert!(tokens.load().unwrap().is_none());
    assert!(!ctx.session().is_authenticated());
    assert!(ctx.session().user().is_none());
}

#[tokio::test]
async fn test_fallback_message_follows_locale() {
    let (server, ctx, _) = setup_with_locale(None, Locale::Id).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = ctx
        .session()
        .login("a@x.io", &SecretString::from("pw"))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Login gagal");
}

// ── Registration ────────────────────────────────────────────────────

#[tokio::test]
async fn test_register_does_not_start_a_session() {
    let (server, ctx, tokens) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Email already registered" })),
        )
        .mount(&server)
        .await;

    let err = ctx
        .session()
        .register(&labelkit_core::Registration {
            name: "Ana".into(),
            email: "a@x.io".into(),
            password: SecretString::from("pw"),
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CoreError::Rejected {
            message: "Email already registered".into(),
            status: 400
        }
    );
    assert!(tokens.load().unwrap().is_none());
}

// ── Profile ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_profile_merges_returned_fields() {
    let (server, ctx, _) = setup(Some("T")).await;
    mount_me(&server).await;
    Mock::given(method("PUT"))
        .and(path("/auth/me"))
        .and(body_json(json!({ "name": "Bea" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Bea" })))
        .mount(&server)
        .await;

    ctx.session().current_user().await.unwrap();
    let user = ctx
        .session()
        .update_profile(&ProfileUpdate {
            name: Some("Bea".into()),
            email: None,
        })
        .await
        .unwrap();

    assert_eq!(user.name.as_deref(), Some("Bea"));
    assert_eq!(user.email.as_deref(), Some("a@x.io"));
    assert_eq!(ctx.session().user_name(), "Bea");
}

#[tokio::test]
async fn test_current_user_without_token_is_noop() {
    let (server, ctx, _) = setup(None).await;
    assert!(ctx.session().current_user().await.unwrap().is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_current_user_holds_loading_flag() {
    let (server, ctx, _) = setup(Some("T")).await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": 1, "name": "Ana" }))
                .set_delay(std::time::Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let session = ctx.session();
    let (user, loading_mid_flight) = tokio::join!(session.current_user(), async {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        session.snapshot().loading
    });

    assert_eq!(user.unwrap().unwrap().name.as_deref(), Some("Ana"));
    assert!(loading_mid_flight);
    assert!(!session.snapshot().loading);
}

// ── Labels ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_created_label_goes_first() {
    let (server, ctx, _) = setup(Some("T")).await;
    mount_lists(&server, &[1, 2], &[]).await;
    Mock::given(method("POST"))
        .and(path("/labels/generate"))
        .and(body_json(json!({ "sender_name": "Toko", "shipping_code": "JNE1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": 3, "sender_name": "Toko", "shipping_code": "JNE1" })),
        )
        .mount(&server)
        .await;

    ctx.labels().fetch_list().await.unwrap();
    let created = ctx
        .labels()
        .create(&NewLabel {
            sender_name: "Toko".into(),
            shipping_code: "JNE1".into(),
        })
        .await
        .unwrap();

    let state = ctx.labels().snapshot();
    assert_eq!(state.ids(), ids(&[3, 1, 2]));
    assert_eq!(state.current_label, Some(created));
    assert!(!state.loading);
}

#[tokio::test]
async fn test_delete_and_bulk_delete_prune_the_list() {
    let (server, ctx, _) = setup(Some("T")).await;
    mount_lists(&server, &[1, 2, 3, 4], &[]).await;
    Mock::given(method("DELETE"))
        .and(path("/labels/4"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/labels/bulk"))
        .and(body_json(json!({ "ids": [1, 2] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deleted": 2 })))
        .mount(&server)
        .await;

    ctx.labels().fetch_list().await.unwrap();
    ctx.labels().delete(&EntityId::Numeric(4)).await.unwrap();
    assert_eq!(ctx.labels().snapshot().ids(), ids(&[1, 2, 3]));

    let result = ctx.labels().bulk_delete(&ids(&[1, 2])).await.unwrap();
    assert_eq!(result.deleted, Some(2));
    assert_eq!(ctx.labels().snapshot().ids(), ids(&[3]));
}

#[tokio::test]
async fn test_failed_delete_keeps_the_record() {
    let (server, ctx, _) = setup(Some("T")).await;
    mount_lists(&server, &[1], &[]).await;
    Mock::given(method("DELETE"))
        .and(path("/labels/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Label not found" })))
        .mount(&server)
        .await;

    ctx.labels().fetch_list().await.unwrap();
    let err = ctx.labels().delete(&EntityId::Numeric(1)).await.unwrap_err();

    assert!(matches!(err, CoreError::NotFound { .. }));
    let state = ctx.labels().snapshot();
    assert_eq!(state.ids(), ids(&[1]));
    assert_eq!(state.error.as_deref(), Some("Label not found"));
}

#[tokio::test]
async fn test_refetch_replaces_list() {
    let (server, ctx, _) = setup(Some("T")).await;
    Mock::given(method("GET"))
        .and(path("/shipping-labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(labels_json(&[7])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shipping-labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    ctx.shipping().fetch_list().await.unwrap();
    assert_eq!(ctx.shipping().snapshot().ids(), ids(&[7]));
    ctx.shipping().fetch_list().await.unwrap();
    assert!(ctx.shipping().snapshot().labels.is_empty());
}

// ── Logout ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_logout_clears_every_store_and_is_idempotent() {
    let (server, ctx, tokens) = setup(Some("T")).await;
    mount_me(&server).await;
    mount_lists(&server, &[1], &[2]).await;

    ctx.session().current_user().await.unwrap();
    ctx.labels().fetch_list().await.unwrap();
    ctx.shipping().fetch_list().await.unwrap();

    ctx.session().logout();
    ctx.session().logout();

    assert!(tokens.load().unwrap().is_none());
    assert!(!ctx.session().is_authenticated());
    assert!(ctx.session().user().is_none());
    assert!(ctx.labels().snapshot().labels.is_empty());
    assert!(ctx.shipping().snapshot().labels.is_empty());
    assert_eq!(ctx.navigator().current(), Route::Login);
}

#[tokio::test]
async fn test_unauthorized_response_forces_logout() {
    let (server, ctx, tokens) = setup(Some("T")).await;
    mount_lists(&server, &[], &[5]).await;
    ctx.shipping().fetch_list().await.unwrap();
    assert_eq!(ctx.navigate(Route::Dashboard), Route::Dashboard);

    Mock::given(method("GET"))
        .and(path("/labels"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "expired" })))
        .with_priority(1)
        .mount(&server)
        .await;

    let err = ctx.labels().fetch_list().await.unwrap_err();

    assert!(err.is_authentication());
    assert!(tokens.load().unwrap().is_none());
    assert!(!ctx.session().is_authenticated());
    assert!(ctx.shipping().snapshot().labels.is_empty());
    assert_eq!(ctx.navigator().current(), Route::Login);
    assert_eq!(ctx.navigate(Route::CreateLabel), Route::Login);
}

#[tokio::test]
async fn test_shutdown_tears_down_session() {
    let (server, ctx, tokens) = setup(Some("T")).await;
    mount_lists(&server, &[1], &[]).await;
    ctx.labels().fetch_list().await.unwrap();

    ctx.shutdown();

    assert!(tokens.load().unwrap().is_none());
    assert!(ctx.labels().snapshot().labels.is_empty());
    assert_eq!(ctx.navigator().current(), Route::Login);
}

// ── Navigation ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_stored_token_starts_authenticated() {
    let (_server, ctx, _) = setup(Some("T")).await;
    assert!(ctx.session().is_authenticated());
    assert_eq!(ctx.navigate(Route::Root), Route::Dashboard);
    assert_eq!(ctx.navigate(Route::Login), Route::Dashboard);
}

#[tokio::test]
async fn test_guest_is_sent_to_login() {
    let (_server, ctx, _) = setup(None).await;
    assert_eq!(ctx.navigate(Route::ProfileEdit), Route::Login);
    assert_eq!(ctx.navigate(Route::ResetPassword), Route::ResetPassword);
}
