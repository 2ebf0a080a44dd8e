//! SharingService 集成测试：二维码、NFC、社交资料、分享设置与签名

use std::sync::{Arc, Once};

use tempfile::TempDir;

use cardshare::config::init_config;
use cardshare::errors::CardshareError;
use cardshare::services::sharing::{
    CreateNfcTagRequest, QrOptions, QrRequest, QrTemplate, SharingSettingsRequest,
    SignatureRequest, SignatureTemplate, SocialProfileRequest, UpdateSocialProfileRequest,
    WifiInput,
};
use cardshare::services::{CardService, CreateCardRequest, SharingService};
use cardshare::storage::SeaOrmStorage;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

struct TestEnv {
    _dir: TempDir,
    cards: CardService,
    sharing: SharingService,
}

async fn setup() -> TestEnv {
    init_test_config();
    let dir = TempDir::new().expect("创建临时目录失败");
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("sharing_test.db").display()
    );
    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("创建存储失败"),
    );
    TestEnv {
        _dir: dir,
        cards: CardService::new(storage.clone()),
        sharing: SharingService::new(storage),
    }
}

async fn sample_card(env: &TestEnv, user: &str) -> String {
    env.cards
        .create_card(
            user,
            CreateCardRequest {
                name: Some("Work".into()),
                full_name: Some("Ada Lovelace".into()),
                job_title: Some("Analyst".into()),
                company: Some("Analytical Engines".into()),
                email: Some("ada@example.com".into()),
                linkedin_url: Some("https://linkedin.com/in/ada".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .id
}

// ---------------- QR ----------------

#[tokio::test]
async fn test_qr_for_card_defaults_to_card_url() {
    let env = setup().await;
    let card_id = sample_card(&env, "owner").await;

    let qr = env
        .sharing
        .qr_for_card("owner", &card_id, QrTemplate::Url, None)
        .await
        .unwrap();
    assert_eq!(qr.template, QrTemplate::Url);
    assert!(qr.payload.ends_with(&format!("/card/{}", card_id)));
    assert_eq!(qr.options, QrOptions::default());

    let vcard = env
        .sharing
        .qr_for_card("owner", &card_id, QrTemplate::Vcard, None)
        .await
        .unwrap();
    assert!(vcard.payload.starts_with("BEGIN:VCARD"));
    assert!(vcard.payload.contains("FN:Ada Lovelace"));

    let err = env
        .sharing
        .qr_for_card("intruder", &card_id, QrTemplate::Url, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CardshareError::NotFound(_)));
}

#[tokio::test]
async fn test_build_qr_templates_without_card() {
    let env = setup().await;

    let email = env
        .sharing
        .build_qr(
            "owner",
            QrRequest {
                template: QrTemplate::Email,
                data: Some("ada@example.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(email.payload, "mailto:ada@example.com");

    let wifi = env
        .sharing
        .build_qr(
            "owner",
            QrRequest {
                template: QrTemplate::Wifi,
                wifi: Some(WifiInput {
                    ssid: "Office;5G".into(),
                    password: "p@ss".into(),
                    auth: String::new(),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(wifi.payload, "WIFI:T:WPA;S:Office\\;5G;P:p@ss;;");

    let missing = env
        .sharing
        .build_qr(
            "owner",
            QrRequest {
                template: QrTemplate::Url,
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(missing, Err(CardshareError::Validation(_))));

    let bad_options = env
        .sharing
        .build_qr(
            "owner",
            QrRequest {
                template: QrTemplate::Url,
                data: Some("https://example.com".into()),
                options: Some(QrOptions {
                    width: 10,
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(bad_options, Err(CardshareError::Validation(_))));
}

// ---------------- NFC ----------------

#[tokio::test]
async fn test_nfc_tag_lifecycle() {
    let env = setup().await;
    let card_id = sample_card(&env, "owner").await;

    let tag = env
        .sharing
        .create_nfc_tag(
            "owner",
            CreateNfcTagRequest {
                card_id: card_id.clone(),
                name: None,
            },
        )
        .await
        .unwrap();
    assert!(tag.id.starts_with("nfc_"));
    assert_eq!(tag.name, "Work tag");
    assert_eq!(tag.card_title, "Ada Lovelace");
    assert!(tag.is_active);
    assert_eq!(tag.write_count, 0);

    let written = env.sharing.record_nfc_write("owner", &tag.id).await.unwrap();
    assert_eq!(written.tag.write_count, 1);
    assert!(written.tag.last_used.is_some());
    assert_eq!(written.records.len(), 2);
    assert_eq!(written.records[0].record_type, "url");
    assert_eq!(written.records[0].data, tag.card_url);

    let toggled = env.sharing.toggle_nfc_tag("owner", &tag.id).await.unwrap();
    assert!(!toggled.is_active);
    let err = env
        .sharing
        .record_nfc_write("owner", &tag.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CardshareError::Validation(_)));

    assert_eq!(env.sharing.list_nfc_tags("owner").await.unwrap().len(), 1);
    assert!(env.sharing.list_nfc_tags("intruder").await.unwrap().is_empty());

    assert!(matches!(
        env.sharing.delete_nfc_tag("intruder", &tag.id).await,
        Err(CardshareError::NotFound(_))
    ));
    env.sharing.delete_nfc_tag("owner", &tag.id).await.unwrap();
    assert!(env.sharing.list_nfc_tags("owner").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_nfc_tag_requires_own_card() {
    let env = setup().await;
    let card_id = sample_card(&env, "owner").await;

    let err = env
        .sharing
        .create_nfc_tag(
            "intruder",
            CreateNfcTagRequest {
                card_id,
                name: Some("Stolen".into()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CardshareError::NotFound(_)));
}

// ---------------- social profiles ----------------

#[tokio::test]
async fn test_social_profiles() {
    let env = setup().await;

    let github = env
        .sharing
        .add_social_profile(
            "owner",
            SocialProfileRequest {
                platform: "GitHub".into(),
                username: "@ada".into(),
                is_active: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(github.platform, "github");
    assert_eq!(github.username, "ada");
    assert_eq!(github.url, "https://github.com/ada");
    assert!(github.is_active);

    let err = env
        .sharing
        .add_social_profile(
            "owner",
            SocialProfileRequest {
                platform: "myspace".into(),
                username: "ada".into(),
                is_active: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CardshareError::Validation(_)));

    let err = env
        .sharing
        .add_social_profile(
            "owner",
            SocialProfileRequest {
                platform: "website".into(),
                username: "ada".into(),
                is_active: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CardshareError::Validation(_)));

    let updated = env
        .sharing
        .update_social_profile(
            "owner",
            &github.id,
            UpdateSocialProfileRequest {
                username: Some("lovelace".into()),
                is_active: Some(false),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.url, "https://github.com/lovelace");
    assert!(!updated.is_active);

    let listed = env.sharing.list_social_profiles("owner").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].username, "lovelace");

    assert!(matches!(
        env.sharing.delete_social_profile("intruder", &github.id).await,
        Err(CardshareError::NotFound(_))
    ));
    env.sharing
        .delete_social_profile("owner", &github.id)
        .await
        .unwrap();
    assert!(env.sharing.list_social_profiles("owner").await.unwrap().is_empty());
}

// ---------------- settings & share url ----------------

#[tokio::test]
async fn test_settings_defaults_and_save() {
    let env = setup().await;

    let defaults = env.sharing.get_settings("owner").await.unwrap();
    assert!(!defaults.auto_share);
    assert!(defaults.include_qr);
    assert!(defaults.platforms.is_empty());
    assert_eq!(defaults.custom_message, "Check out my digital business card!");

    let saved = env
        .sharing
        .save_settings(
            "owner",
            SharingSettingsRequest {
                auto_share: Some(true),
                platforms: Some(vec!["Twitter".into(), "linkedin".into(), "twitter".into()]),
                custom_message: Some("Say hi".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(saved.auto_share);
    assert_eq!(saved.platforms, vec!["twitter".to_string(), "linkedin".to_string()]);

    let loaded = env.sharing.get_settings("owner").await.unwrap();
    assert!(loaded.auto_share);
    assert!(loaded.include_qr);
    assert_eq!(loaded.platforms, saved.platforms);
    assert_eq!(loaded.custom_message, "Say hi");

    let err = env
        .sharing
        .save_settings(
            "owner",
            SharingSettingsRequest {
                platforms: Some(vec!["friendster".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CardshareError::Validation(_)));
}

#[tokio::test]
async fn test_share_url_uses_custom_message() {
    let env = setup().await;
    let card_id = sample_card(&env, "owner").await;

    env.sharing
        .save_settings(
            "owner",
            SharingSettingsRequest {
                custom_message: Some("Hello there".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let tweet = env
        .sharing
        .share_url("owner", "Twitter", &card_id)
        .await
        .unwrap();
    assert_eq!(tweet.platform, "twitter");
    assert!(tweet.card_url.ends_with(&format!("/card/{}", card_id)));
    assert!(tweet.share_url.starts_with("https://twitter.com/intent/tweet?text=Hello%20there&url="));

    let linkedin = env
        .sharing
        .share_url("owner", "linkedin", &card_id)
        .await
        .unwrap();
    assert!(linkedin.share_url.contains("linkedin.com/sharing"));

    assert!(matches!(
        env.sharing.share_url("owner", "github", &card_id).await,
        Err(CardshareError::Validation(_))
    ));
    assert!(matches!(
        env.sharing.share_url("intruder", "twitter", &card_id).await,
        Err(CardshareError::NotFound(_))
    ));
}

// ---------------- signature ----------------

#[tokio::test]
async fn test_signature_prefilled_from_card() {
    let env = setup().await;
    let card_id = sample_card(&env, "owner").await;

    let req = env
        .sharing
        .prefill_signature("owner", &card_id, Some(SignatureTemplate::Classic), None)
        .await
        .unwrap();
    assert_eq!(req.name, "Ada Lovelace");
    assert_eq!(req.title.as_deref(), Some("Analyst"));
    assert_eq!(req.template, SignatureTemplate::Classic);
    assert_eq!(req.social_links.len(), 1);
    assert_eq!(req.social_links[0].platform, "linkedin");

    let html = env.sharing.render_signature(&req).unwrap();
    assert!(html.contains("Ada Lovelace"));
    assert!(html.contains("Analytical Engines"));
    assert!(html.contains("mailto:ada@example.com"));
}

#[test]
fn test_signature_escapes_and_validates() {
    let mut req = SignatureRequest::new("<script>alert(1)</script>");
    let html = cardshare::services::sharing::render_signature(&req).unwrap();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));

    req.font_size = 64;
    assert!(cardshare::services::sharing::render_signature(&req).is_err());

    let blank = SignatureRequest::new("   ");
    assert!(cardshare::services::sharing::render_signature(&blank).is_err());
}
