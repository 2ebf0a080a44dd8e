//! AnalyticsService 集成测试
//!
//! 通过存储自带的事件 sink 写入访问 / 分享，再验证单卡片统计、用户总览与排行。

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use tempfile::TempDir;

use cardshare::config::init_config;
use cardshare::errors::{CardshareError, Result};
use cardshare::services::{
    AnalyticsService, CardEventSink, CardService, ContactService, CreateCardRequest, CreateContactRequest,
    UpdateCardRequest, ViewContext,
};
use cardshare::storage::SeaOrmStorage;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

struct TestEnv {
    _dir: TempDir,
    storage: Arc<SeaOrmStorage>,
    cards: CardService,
    contacts: ContactService,
    analytics: AnalyticsService,
}

async fn setup() -> TestEnv {
    init_test_config();
    let dir = TempDir::new().expect("创建临时目录失败");
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("analytics_test.db").display()
    );
    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("创建存储失败"),
    );
    TestEnv {
        _dir: dir,
        storage: storage.clone(),
        cards: CardService::new(storage.clone()),
        contacts: ContactService::new(storage.clone()),
        analytics: AnalyticsService::new(storage),
    }
}

fn visitor(ip: &str) -> ViewContext {
    ViewContext {
        ip: Some(ip.to_string()),
        user_agent: Some("Mozilla/5.0".to_string()),
        referrer: Some("https://example.com".to_string()),
        location: None,
    }
}

async fn card_named(env: &TestEnv, user: &str, name: &str) -> String {
    env.cards
        .create_card(
            user,
            CreateCardRequest {
                name: Some(name.to_string()),
                full_name: Some(format!("{} Owner", name)),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_views_and_shares_update_counters() {
    let env = setup().await;
    let card_id = card_named(&env, "owner", "Work").await;

    for i in 0..3 {
        env.analytics
            .record_card_view(&card_id, visitor(&format!("10.0.0.{}", i)))
            .await
            .unwrap();
    }
    assert_eq!(
        env.analytics.record_card_share(&card_id, None).await.unwrap(),
        "link"
    );
    assert_eq!(
        env.analytics
            .record_card_share(&card_id, Some(" QR "))
            .await
            .unwrap(),
        "qr"
    );

    let card = env.cards.get_card("owner", &card_id).await.unwrap();
    assert_eq!(card.view_count, 3);
    assert_eq!(card.share_count, 2);
}

#[tokio::test]
async fn test_events_for_missing_card_are_not_found() {
    let env = setup().await;

    let err = env
        .analytics
        .record_card_view("card_missing", ViewContext::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CardshareError::NotFound(_)));

    let err = env
        .analytics
        .record_card_share("card_missing", Some("email"))
        .await
        .unwrap_err();
    assert!(matches!(err, CardshareError::NotFound(_)));
}

#[tokio::test]
async fn test_invalid_share_method_is_rejected() {
    let env = setup().await;
    let card_id = card_named(&env, "owner", "Work").await;

    let err = env
        .analytics
        .record_card_share(&card_id, Some("not a method"))
        .await
        .unwrap_err();
    assert!(matches!(err, CardshareError::Validation(_)));

    let card = env.cards.get_card("owner", &card_id).await.unwrap();
    assert_eq!(card.share_count, 0);
}

#[tokio::test]
async fn test_card_analytics_breakdown() {
    let env = setup().await;
    let card_id = card_named(&env, "owner", "Work").await;

    for i in 0..4 {
        env.analytics
            .record_card_view(&card_id, visitor(&format!("10.0.0.{}", i)))
            .await
            .unwrap();
    }
    env.analytics
        .record_card_share(&card_id, Some("email"))
        .await
        .unwrap();
    env.contacts
        .save_card_as_contact("viewer", &card_id)
        .await
        .unwrap();

    let stats = env
        .analytics
        .get_card_analytics("owner", &card_id, None)
        .await
        .unwrap();

    assert_eq!(stats.card_id, card_id);
    assert_eq!(stats.days, 30);
    assert_eq!(stats.total_views, 4);
    assert_eq!(stats.total_shares, 1);
    assert_eq!(stats.total_contacts, 1);
    assert_eq!(stats.engagement_rate, "50%");

    let counted: u64 = stats.views_by_date.iter().map(|d| d.count).sum();
    assert_eq!(counted, 4);
    assert_eq!(stats.shares_by_method.len(), 1);
    assert_eq!(stats.shares_by_method[0].method, "email");
    assert_eq!(stats.shares_by_method[0].count, 1);

    assert_eq!(stats.recent_views.len(), 4);
    assert_eq!(
        stats.recent_views[0].viewer_user_agent.as_deref(),
        Some("Mozilla/5.0")
    );
    assert_eq!(stats.recent_shares.len(), 1);

    // 超出上限的天数被截断
    let clamped = env
        .analytics
        .get_card_analytics("owner", &card_id, Some(10_000))
        .await
        .unwrap();
    assert_eq!(clamped.days, 365);
}

#[tokio::test]
async fn test_card_analytics_requires_ownership() {
    let env = setup().await;
    let card_id = card_named(&env, "owner", "Work").await;

    let err = env
        .analytics
        .get_card_analytics("intruder", &card_id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CardshareError::NotFound(_)));
}

#[tokio::test]
async fn test_recent_views_are_limited() {
    let env = setup().await;
    let card_id = card_named(&env, "owner", "Busy").await;

    for i in 0..12 {
        env.analytics
            .record_card_view(&card_id, visitor(&format!("10.0.1.{}", i)))
            .await
            .unwrap();
    }

    let stats = env
        .analytics
        .get_card_analytics("owner", &card_id, Some(7))
        .await
        .unwrap();
    assert_eq!(stats.total_views, 12);
    assert_eq!(stats.recent_views.len(), 10);
}

#[tokio::test]
async fn test_user_analytics_summary() {
    let env = setup().await;

    let work = card_named(&env, "owner", "Work").await;
    let side = card_named(&env, "owner", "Side").await;
    card_named(&env, "someone_else", "Foreign").await;

    env.cards
        .update_card(
            "owner",
            &side,
            UpdateCardRequest {
                is_public: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    env.cards.toggle_active("owner", &side).await.unwrap();

    for _ in 0..3 {
        env.analytics
            .record_card_view(&work, ViewContext::default())
            .await
            .unwrap();
    }
    env.analytics
        .record_card_view(&side, ViewContext::default())
        .await
        .unwrap();
    env.analytics
        .record_card_share(&work, Some("twitter"))
        .await
        .unwrap();

    env.contacts
        .create_contact(
            "owner",
            CreateContactRequest {
                full_name: Some("Met Someone".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let summary = env.analytics.get_user_analytics("owner").await.unwrap();
    assert_eq!(summary.total_cards, 2);
    assert_eq!(summary.active_cards, 1);
    assert_eq!(summary.public_cards, 1);
    assert_eq!(summary.total_views, 4);
    assert_eq!(summary.total_shares, 1);
    assert_eq!(summary.total_contacts, 1);
    assert_eq!(summary.recent_contacts, 1);
    assert_eq!(summary.engagement_rate, "50%");

    assert_eq!(summary.this_month.views, 4);
    assert_eq!(summary.this_month.shares, 1);
    assert_eq!(summary.this_month.contacts, 1);
    // 上月没有数据时增长记为 100%
    assert_eq!(summary.growth.views, 100);
    assert_eq!(summary.growth.shares, 100);
    assert_eq!(summary.growth.contacts, 100);
}

#[tokio::test]
async fn test_user_analytics_empty_account() {
    let env = setup().await;

    let summary = env.analytics.get_user_analytics("nobody").await.unwrap();
    assert_eq!(summary.total_cards, 0);
    assert_eq!(summary.total_views, 0);
    assert_eq!(summary.engagement_rate, "0%");
    assert_eq!(summary.growth.views, 0);
}

#[tokio::test]
async fn test_top_cards_ranking() {
    let env = setup().await;

    let quiet = card_named(&env, "owner", "Quiet").await;
    let popular = card_named(&env, "owner", "Popular").await;
    let middle = card_named(&env, "owner", "Middle").await;

    for _ in 0..3 {
        env.analytics
            .record_card_view(&popular, ViewContext::default())
            .await
            .unwrap();
    }
    env.analytics
        .record_card_view(&middle, ViewContext::default())
        .await
        .unwrap();
    env.analytics
        .record_card_share(&middle, None)
        .await
        .unwrap();

    let top = env.analytics.top_cards("owner", None).await.unwrap();
    let ids: Vec<&str> = top.iter().map(|c| c.card_id.as_str()).collect();
    assert_eq!(ids, vec![popular.as_str(), middle.as_str(), quiet.as_str()]);
    assert_eq!(top[0].views, 3);
    assert_eq!(top[1].engagement, "100%");

    let limited = env.analytics.top_cards("owner", Some(1)).await.unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].card_id, popular);

    // limit 0 被抬到 1
    let clamped = env.analytics.top_cards("owner", Some(0)).await.unwrap();
    assert_eq!(clamped.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_views_are_all_counted() {
    let env = setup().await;
    let card_id = card_named(&env, "owner", "Busy").await;
    let analytics = Arc::new(AnalyticsService::new(env.storage.clone()));

    const VIEWS: usize = 40;
    let handles: Vec<_> = (0..VIEWS)
        .map(|i| {
            let analytics = analytics.clone();
            let card_id = card_id.clone();
            tokio::spawn(async move {
                analytics
                    .record_card_view(&card_id, visitor(&format!("10.1.0.{}", i)))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let card = env.cards.get_card("owner", &card_id).await.unwrap();
    assert_eq!(card.view_count, VIEWS as u64);
    let analytics = env
        .analytics
        .get_card_analytics("owner", &card_id, None)
        .await
        .unwrap();
    assert_eq!(analytics.total_views, VIEWS as u64);
}

#[tokio::test]
async fn test_unknown_share_method_keeps_its_spelling() {
    let env = setup().await;
    let card_id = card_named(&env, "owner", "Work").await;

    assert_eq!(
        env.analytics
            .record_card_share(&card_id, Some("WhatsApp"))
            .await
            .unwrap(),
        "WhatsApp"
    );
    assert_eq!(
        env.analytics
            .record_card_share(&card_id, Some("LinkedIn"))
            .await
            .unwrap(),
        "linkedin"
    );
}

/// 只记下调用的 sink
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<String>>,
}

#[async_trait]
impl CardEventSink for RecordingSink {
    async fn record_view(&self, card_id: &str, _ctx: ViewContext) -> Result<()> {
        self.events.lock().unwrap().push(format!("view:{}", card_id));
        Ok(())
    }

    async fn record_share(&self, card_id: &str, method: &str) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("share:{}:{}", card_id, method));
        Ok(())
    }
}

#[tokio::test]
async fn test_custom_sink_receives_events() {
    let env = setup().await;
    let card_id = card_named(&env, "owner", "Work").await;

    let sink = Arc::new(RecordingSink::default());
    let analytics = AnalyticsService::with_sink(env.storage.clone(), sink.clone());

    analytics
        .record_card_view(&card_id, ViewContext::default())
        .await
        .unwrap();
    analytics.record_card_share(&card_id, None).await.unwrap();

    assert_eq!(
        *sink.events.lock().unwrap(),
        vec![format!("view:{}", card_id), format!("share:{}:link", card_id)]
    );

    // 事件没有进入存储
    let card = env.cards.get_card("owner", &card_id).await.unwrap();
    assert_eq!(card.view_count, 0);
    assert_eq!(card.share_count, 0);
}
