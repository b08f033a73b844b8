//! Integration tests for the payment settings admin routes

use axum::{body::Body, Router};
use gateway_settings_backend::api::{build_router, AdminState};
use gateway_settings_backend::config::SiteConfig;
use gateway_settings_backend::database::memory::InMemorySettingsStore;
use gateway_settings_backend::database::payment_method_repository::PaymentMethod;
use gateway_settings_backend::database::repository::{OptionStore, PaymentMethodStore};
use http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::util::ServiceExt;

fn seeded_store() -> Arc<InMemorySettingsStore> {
    Arc::new(
        InMemorySettingsStore::new()
            .with_method(PaymentMethod {
                id: 1,
                title: "Credit Card".to_string(),
                folder: "stripe".to_string(),
                installed: true,
            })
            .with_method(PaymentMethod {
                id: 2,
                title: "Bank Transfer".to_string(),
                folder: "wire_transfer".to_string(),
                installed: false,
            })
            .with_method(PaymentMethod {
                id: 3,
                title: "Crypto".to_string(),
                folder: "bitpay".to_string(),
                installed: false,
            })
            .with_option("stripe_payment_mode", "one_time")
            .with_option("company_bank_info", "IBAN GB00 0000"),
    )
}

fn build_app(store: Arc<InMemorySettingsStore>) -> Router {
    build_router(AdminState::new(
        store,
        SiteConfig::new("https://shop.example.com"),
    ))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/admin/payments/edit")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("x-request-id", "req-test-1")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_edit_panel_renders_stripe_form() {
    let app = build_app(seeded_store());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/payments/edit?id=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;

    assert!(html.contains("Stripe - Settings"));
    assert!(html.contains(r#"<option value="one_time" selected>One Time</option>"#));
    assert!(html.contains(r#"name="stripe_secret_key""#));
    assert!(html.contains("https://shop.example.com/webhook/stripe"));
    assert!(!html.contains("company_bank_info"));
}

#[tokio::test]
async fn test_edit_panel_unknown_id_is_not_found_panel() {
    let app = build_app(seeded_store());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/payments/edit?id=999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_string(response).await;
    assert!(html.contains("Not found"));
    assert!(!html.contains("sidePanel_form"));
}

#[tokio::test]
async fn test_edit_panel_non_numeric_id() {
    let app = build_app(seeded_store());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/payments/edit?id=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_panel_unknown_provider_shows_universal_fields() {
    let app = build_app(seeded_store());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/payments/edit?id=3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains(r#"name="title""#));
    assert!(html.contains(r#"name="install""#));
    assert!(!html.contains("WebHook Url"));
}

#[tokio::test]
async fn test_submit_updates_declared_keys() {
    let store = seeded_store();
    let app = build_app(store.clone());

    let response = app
        .oneshot(post_form(
            "action=paymentEdit&id=2&title=Wire&install=1&company_bank_info=IBAN+DE99+1234",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["installed"], true);
    assert_eq!(json["data"]["title"], "Wire");

    assert_eq!(
        store.get_option("company_bank_info").await.unwrap().as_deref(),
        Some("IBAN DE99 1234")
    );
    assert_eq!(
        store.get_option("stripe_payment_mode").await.unwrap().as_deref(),
        Some("one_time")
    );
}

#[tokio::test]
async fn test_submit_foreign_key_rejected_without_effect() {
    let store = seeded_store();
    let app = build_app(store.clone());

    let response = app
        .oneshot(post_form(
            "action=paymentEdit&id=2&install=1&company_bank_info=changed&stripe_secret_key=X",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "VALIDATION_ERROR");
    assert_eq!(json["request_id"], "req-test-1");
    assert_eq!(json["details"]["fields"][0]["field"], "stripe_secret_key");

    assert_eq!(
        store.get_option("company_bank_info").await.unwrap().as_deref(),
        Some("IBAN GB00 0000")
    );
    assert_eq!(store.get_option("stripe_secret_key").await.unwrap(), None);
    let method = store.find_payment_method(2).await.unwrap().unwrap();
    assert!(!method.installed);
}

#[tokio::test]
async fn test_submit_unknown_method() {
    let app = build_app(seeded_store());

    let response = app
        .oneshot(post_form("action=paymentEdit&id=404&install=0"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "PAYMENT_METHOD_NOT_FOUND");
}

#[tokio::test]
async fn test_list_methods_flags_known_providers() {
    let app = build_app(seeded_store());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/payments")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let methods = json["data"].as_array().unwrap();
    assert_eq!(methods.len(), 3);
    assert_eq!(methods[0]["folder"], "stripe");
    assert_eq!(methods[0]["known_provider"], true);
    assert_eq!(methods[2]["known_provider"], false);
}

#[tokio::test]
async fn test_method_settings_json() {
    let app = build_app(seeded_store());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/payments/2/settings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let fields = json["data"]["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0]["name"], "company_bank_info");
    assert_eq!(fields[0]["kind"], "textarea");
    assert_eq!(fields[0]["value"], "IBAN GB00 0000");
}

#[tokio::test]
async fn test_providers_listing() {
    let app = build_app(seeded_store());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/providers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(response).await;
    let providers = json["data"].as_array().unwrap();
    assert_eq!(providers.len(), 18);
    assert_eq!(providers[0]["provider_id"], "paypal");
}

#[tokio::test]
async fn test_health_with_in_memory_store() {
    let app = build_app(seeded_store());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "Healthy");
}

#[tokio::test]
async fn test_edit_panel_labels_match_admin_form() {
    // paypal is id 1 and paytm id 4 in registry order
    let store = Arc::new(InMemorySettingsStore::seeded_from_registry());

    let response = build_app(store.clone())
        .oneshot(
            Request::builder()
                .uri("/admin/payments/edit?id=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let html = body_string(response).await;

    assert!(html.contains(r#"<label class="col-sm-4 control-label">Live Mode/ Sandbox Mode</label>"#));
    assert!(html.contains(r#"<label class="col-sm-4 control-label">Paypal API Secret:</label>"#));
    assert!(html.contains(r#"<label class="col-sm-4 control-label">Paypal API WebHook Url:</label>"#));

    let response = build_app(store)
        .oneshot(
            Request::builder()
                .uri("/admin/payments/edit?id=4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let html = body_string(response).await;

    assert!(html.contains("Paytm - Settings"));
    assert_eq!(html.matches(r#"<code class="help-block">"#).count(), 3);
}
