//! HTTP API 集成测试
//!
//! 用真实的路由构建函数组装 App，覆盖 health、公开卡片与带 JWT 的 v1 接口。

use std::sync::{Arc, Once};

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};
use tempfile::TempDir;

use cardshare::api::jwt::get_jwt_service;
use cardshare::api::middleware::UserAuth;
use cardshare::api::services::{AppStartTime, health_routes, public_card_routes, v1_routes};
use cardshare::config::init_config;
use cardshare::runtime::lifetime::startup::StartupContext;
use cardshare::storage::SeaOrmStorage;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn setup() -> (TempDir, StartupContext) {
    init_test_config();
    let dir = TempDir::new().expect("创建临时目录失败");
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("api_test.db").display()
    );
    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("创建存储失败"),
    );
    (dir, StartupContext::from_storage(storage))
}

/// 与 server 模式相同的路由和 app_data
macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ctx.storage.clone()))
                .app_data(web::Data::new($ctx.user_service.clone()))
                .app_data(web::Data::new($ctx.card_service.clone()))
                .app_data(web::Data::new($ctx.contact_service.clone()))
                .app_data(web::Data::new($ctx.analytics_service.clone()))
                .app_data(web::Data::new($ctx.sharing_service.clone()))
                .app_data(web::Data::new(AppStartTime::now()))
                .service(health_routes())
                .service(public_card_routes())
                .service(v1_routes().wrap(UserAuth)),
        )
        .await
    };
}

fn token_for(user_id: &str) -> String {
    get_jwt_service()
        .generate_access_token(user_id, &format!("{}@example.com", user_id), None)
        .expect("签发 token 失败")
}

fn bearer(user_id: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token_for(user_id)))
}

// =============================================================================
// health
// =============================================================================

#[actix_web::test]
async fn test_health_endpoints() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["checks"]["storage"]["cards_count"], 0);
    assert_eq!(
        body["data"]["checks"]["storage"]["backend"]["storage_type"],
        "sqlite"
    );

    let resp = test::call_service(&app, TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

// =============================================================================
// auth
// =============================================================================

#[actix_web::test]
async fn test_v1_requires_bearer_token() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let resp = test::call_service(&app, TestRequest::get().uri("/api/v1/cards").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1001);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/cards")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/cards")
            .insert_header(bearer("user_1"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"], json!([]));
}

#[actix_web::test]
async fn test_current_user_profile() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header(bearer("ada"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        TestRequest::put()
            .uri("/api/v1/users/me")
            .insert_header(bearer("ada"))
            .set_json(json!({"display_name": "Ada", "company": "Engines"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header(bearer("ada"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["id"], "ada");
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["display_name"], "Ada");
}

// =============================================================================
// cards
// =============================================================================

#[actix_web::test]
async fn test_card_crud_over_http() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/cards")
            .insert_header(bearer("owner"))
            .set_json(json!({"full_name": "Ada Lovelace", "company": "Engines"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let card_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["name"], "My Business Card");
    assert_eq!(body["data"]["template_id"], "modern");

    // 其他用户看不到
    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/api/v1/cards/{}", card_id))
            .insert_header(bearer("intruder"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3000);

    let resp = test::call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/v1/cards/{}", card_id))
            .insert_header(bearer("owner"))
            .set_json(json!({"background_color": "red"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);

    let resp = test::call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/v1/cards/{}", card_id))
            .insert_header(bearer("owner"))
            .set_json(json!({"job_title": "Analyst", "company": ""}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["job_title"], "Analyst");
    assert!(body["data"]["company"].is_null());

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri(&format!("/api/v1/cards/{}/toggle-active", card_id))
            .insert_header(bearer("owner"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["is_active"], false);

    let resp = test::call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/v1/cards/{}", card_id))
            .insert_header(bearer("owner"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["id"], card_id.as_str());
    assert_eq!(body["data"]["deleted"], true);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/api/v1/cards/{}", card_id))
            .insert_header(bearer("owner"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_card_qr_and_analytics_endpoints() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/cards")
            .insert_header(bearer("owner"))
            .set_json(json!({"full_name": "Grace Hopper"}))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let card_id = body["data"]["id"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/api/v1/cards/{}/qr", card_id))
            .insert_header(bearer("owner"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(
        body["data"]["payload"]
            .as_str()
            .unwrap()
            .ends_with(&format!("/card/{}", card_id))
    );

    // 公开访问一次
    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/card/{}", card_id))
            .insert_header(("User-Agent", "integration-test"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/api/v1/cards/{}/analytics?days=7", card_id))
            .insert_header(bearer("owner"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["days"], 7);
    assert_eq!(body["data"]["total_views"], 1);
    assert_eq!(
        body["data"]["recent_views"][0]["viewer_user_agent"],
        "integration-test"
    );

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/analytics/summary")
            .insert_header(bearer("owner"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total_cards"], 1);
    assert_eq!(body["data"]["total_views"], 1);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/analytics/top-cards?limit=3")
            .insert_header(bearer("owner"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"][0]["card_id"], card_id.as_str());
}

// =============================================================================
// public card
// =============================================================================

#[actix_web::test]
async fn test_public_card_view_share_and_vcard() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let card = ctx
        .card_service
        .create_card(
            "owner",
            cardshare::services::CreateCardRequest {
                full_name: Some("Ada Lovelace".into()),
                email: Some("ada@example.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let resp = test::call_service(
        &app,
        TestRequest::get().uri(&format!("/card/{}", card.id)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["full_name"], "Ada Lovelace");
    assert!(body["data"].get("user_id").is_none());
    assert!(body["data"].get("view_count").is_none());

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri(&format!("/card/{}/share", card.id))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["data"]["message"],
        "Check out Ada Lovelace's digital business card"
    );

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri(&format!("/card/{}/share", card.id))
            .set_json(json!({"method": "qr"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/card/{}/vcard", card.id))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("ada-lovelace.vcf"));
    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("FN:Ada Lovelace"));

    let stored = ctx.card_service.get_card("owner", &card.id).await.unwrap();
    assert_eq!(stored.view_count, 1);
    assert_eq!(stored.share_count, 2);

    let resp = test::call_service(&app, TestRequest::get().uri("/card/card_missing").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3000);
}

#[actix_web::test]
async fn test_private_card_is_hidden() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let card = ctx
        .card_service
        .create_card(
            "owner",
            cardshare::services::CreateCardRequest {
                is_public: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let resp = test::call_service(
        &app,
        TestRequest::get().uri(&format!("/card/{}", card.id)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri(&format!("/api/v1/cards/{}/save-contact", card.id))
            .insert_header(bearer("viewer"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// contacts
// =============================================================================

#[actix_web::test]
async fn test_contacts_crud_and_favorite() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/contacts")
            .insert_header(bearer("user_1"))
            .set_json(json!({"full_name": "Linus", "company": "Kernel"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let contact_id = body["data"]["id"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri(&format!("/api/v1/contacts/{}/favorite", contact_id))
            .insert_header(bearer("user_1"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["is_favorite"], true);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/contacts?filter=favorites&search=kern")
            .insert_header(bearer("user_1"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/api/v1/contacts/{}", contact_id))
            .insert_header(bearer("user_2"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 4000);

    let resp = test::call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/v1/contacts/{}", contact_id))
            .insert_header(bearer("user_1"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

fn multipart_body(boundary: &str, filename: &str, content: &str) -> String {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: application/octet-stream\r\n\r\n{c}\r\n--{b}--\r\n",
        b = boundary,
        f = filename,
        c = content
    )
}

#[actix_web::test]
async fn test_import_then_export_contacts() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let boundary = "cardshare-test-boundary";
    let json_payload = r#"[{"name": "Ada Lovelace", "email": "ada@example.com"}, {"email": "nobody@example.com"}]"#;

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/contacts/import")
            .insert_header(bearer("user_1"))
            .insert_header((
                "Content-Type",
                format!("multipart/form-data; boundary={}", boundary),
            ))
            .set_payload(multipart_body(boundary, "people.json", json_payload))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["success"], 1);
    assert_eq!(body["data"]["failed"], 1);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/contacts/export?format=csv")
            .insert_header(bearer("user_1"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"contacts-"));
    assert!(disposition.ends_with(".csv\""));
    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("\"Ada Lovelace\",\"ada@example.com\""));
    assert!(text.contains("\"import\""));
}

#[actix_web::test]
async fn test_import_without_file_is_rejected() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let boundary = "cardshare-test-boundary";
    let payload = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"format\"\r\n\r\ncsv\r\n--{b}--\r\n",
        b = boundary
    );

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/contacts/import")
            .insert_header(bearer("user_1"))
            .insert_header((
                "Content-Type",
                format!("multipart/form-data; boundary={}", boundary),
            ))
            .set_payload(payload)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 4004);
}

// =============================================================================
// sharing
// =============================================================================

#[actix_web::test]
async fn test_sharing_endpoints() {
    let (_dir, ctx) = setup().await;
    let app = init_app!(ctx);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/sharing/qr")
            .insert_header(bearer("user_1"))
            .set_json(json!({"template": "phone", "data": "+1 555 0100"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["payload"], "tel:+1 555 0100");

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/sharing/signature")
            .insert_header(bearer("user_1"))
            .set_json(json!({"name": "Ada", "email": "ada@example.com"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["html"].as_str().unwrap().contains("Ada"));

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/sharing/social")
            .insert_header(bearer("user_1"))
            .set_json(json!({"platform": "twitter", "username": "ada"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["url"], "https://twitter.com/ada");

    let resp = test::call_service(
        &app,
        TestRequest::delete()
            .uri("/api/v1/sharing/nfc/nfc_missing")
            .insert_header(bearer("user_1"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 6000);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/sharing/settings")
            .insert_header(bearer("user_1"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["include_qr"], true);
}
