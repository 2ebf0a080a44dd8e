//! Analytics service layer
//!
//! 事件写入走 [`CardEventSink`]，聚合查询直接读存储。
//! 本月与环比使用真实的自然月窗口（UTC）。

mod engagement;
mod sink;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::errors::{CardshareError, Result};
use crate::storage::{CardShare, CardView, ContactFilter, DigitalCard, SeaOrmStorage};
use crate::utils::time_window::{days_ago, growth_percent, month_start, previous_month_start};

pub use engagement::{engagement_percent, engagement_rate};
pub use sink::{CardEventSink, ViewContext};

/// 已知的分享方式
pub const KNOWN_SHARE_METHODS: &[&str] = &[
    "link", "qr", "nfc", "email", "social", "twitter", "facebook", "linkedin",
];

const DEFAULT_ANALYTICS_DAYS: u32 = 30;
const MAX_ANALYTICS_DAYS: u32 = 365;
const RECENT_EVENT_LIMIT: u64 = 10;
const RECENT_CONTACT_DAYS: u32 = 30;
const MAX_SHARE_METHOD_LEN: usize = 32;

/// 规范化分享方式：空值记为 link，已知方式转小写，未知方式原样保留（不超过 32 字符的单个 token）
pub fn normalize_share_method(raw: Option<&str>) -> Result<String> {
    let method = raw.map(str::trim).unwrap_or("");
    if method.is_empty() {
        return Ok("link".to_string());
    }
    let lowered = method.to_ascii_lowercase();
    if KNOWN_SHARE_METHODS.contains(&lowered.as_str()) {
        return Ok(lowered);
    }
    let is_token = method
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !is_token || method.len() > MAX_SHARE_METHOD_LEN {
        return Err(CardshareError::validation(format!(
            "Invalid share method: {}",
            method
        )));
    }
    Ok(method.to_string())
}

// ============ 响应类型 ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct DailyCount {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MethodCount {
    pub method: String,
    pub count: u64,
}

/// 单卡片统计
#[derive(Debug, Clone, Serialize)]
pub struct CardAnalytics {
    pub card_id: String,
    pub total_views: u64,
    pub total_shares: u64,
    pub total_contacts: u64,
    pub engagement_rate: String,
    pub days: u32,
    pub views_by_date: Vec<DailyCount>,
    pub shares_by_method: Vec<MethodCount>,
    pub recent_views: Vec<CardView>,
    pub recent_shares: Vec<CardShare>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PeriodCounts {
    pub views: u64,
    pub shares: u64,
    pub contacts: u64,
}

/// 环比百分比
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct GrowthStats {
    pub views: i64,
    pub shares: i64,
    pub contacts: i64,
}

/// 用户总览
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UserAnalytics {
    pub total_cards: u64,
    pub active_cards: u64,
    pub public_cards: u64,
    pub total_views: u64,
    pub total_shares: u64,
    pub total_contacts: u64,
    pub recent_contacts: u64,
    pub engagement_rate: String,
    pub this_month: PeriodCounts,
    pub growth: GrowthStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TopCard {
    pub card_id: String,
    pub name: String,
    pub views: u64,
    pub shares: u64,
    pub contacts: u64,
    pub engagement: String,
}

impl From<&DigitalCard> for TopCard {
    fn from(card: &DigitalCard) -> Self {
        Self {
            card_id: card.id.clone(),
            name: card.name.clone(),
            views: card.view_count,
            shares: card.share_count,
            contacts: card.contact_count,
            engagement: engagement_rate(card.view_count, card.share_count, card.contact_count),
        }
    }
}

// ============ Service ============

/// Analytics service for card events and aggregates
pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
    sink: Arc<dyn CardEventSink>,
}

impl AnalyticsService {
    /// 以存储本身作为事件 sink
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        let sink: Arc<dyn CardEventSink> = storage.clone();
        Self { storage, sink }
    }

    pub fn with_sink(storage: Arc<SeaOrmStorage>, sink: Arc<dyn CardEventSink>) -> Self {
        Self { storage, sink }
    }

    pub async fn record_card_view(&self, card_id: &str, ctx: ViewContext) -> Result<()> {
        self.sink.record_view(card_id, ctx).await
    }

    /// 返回实际写入的分享方式
    pub async fn record_card_share(&self, card_id: &str, method: Option<&str>) -> Result<String> {
        let method = normalize_share_method(method)?;
        self.sink.record_share(card_id, &method).await?;
        Ok(method)
    }

    async fn owned_card(&self, user_id: &str, card_id: &str) -> Result<DigitalCard> {
        self.storage
            .get_card(card_id)
            .await?
            .filter(|c| c.user_id == user_id)
            .ok_or_else(|| CardshareError::not_found(format!("Card not found: {}", card_id)))
    }

    /// 单卡片统计，`days` 默认 30，最多 365
    pub async fn get_card_analytics(
        &self,
        user_id: &str,
        card_id: &str,
        days: Option<u32>,
    ) -> Result<CardAnalytics> {
        let card = self.owned_card(user_id, card_id).await?;
        let days = days
            .unwrap_or(DEFAULT_ANALYTICS_DAYS)
            .clamp(1, MAX_ANALYTICS_DAYS);
        let since = days_ago(Utc::now(), days);

        let window_views = self
            .storage
            .list_views_for_card(card_id, Some(since), None)
            .await?;
        let window_shares = self
            .storage
            .list_shares_for_card(card_id, Some(since), None)
            .await?;

        let mut by_date: BTreeMap<String, u64> = BTreeMap::new();
        for view in &window_views {
            *by_date
                .entry(view.viewed_at.format("%Y-%m-%d").to_string())
                .or_default() += 1;
        }

        let mut by_method: BTreeMap<String, u64> = BTreeMap::new();
        for share in &window_shares {
            *by_method.entry(share.share_method.clone()).or_default() += 1;
        }
        let mut shares_by_method: Vec<MethodCount> = by_method
            .into_iter()
            .map(|(method, count)| MethodCount { method, count })
            .collect();
        shares_by_method.sort_by(|a, b| b.count.cmp(&a.count).then(a.method.cmp(&b.method)));

        let recent_views = self
            .storage
            .list_views_for_card(card_id, None, Some(RECENT_EVENT_LIMIT))
            .await?;
        let recent_shares = self
            .storage
            .list_shares_for_card(card_id, None, Some(RECENT_EVENT_LIMIT))
            .await?;

        debug!(
            "Card analytics for {}: {} views / {} shares in last {} days",
            card_id,
            window_views.len(),
            window_shares.len(),
            days
        );

        Ok(CardAnalytics {
            card_id: card.id.clone(),
            total_views: card.view_count,
            total_shares: card.share_count,
            total_contacts: card.contact_count,
            engagement_rate: engagement_rate(card.view_count, card.share_count, card.contact_count),
            days,
            views_by_date: by_date
                .into_iter()
                .map(|(date, count)| DailyCount { date, count })
                .collect(),
            shares_by_method,
            recent_views,
            recent_shares,
        })
    }

    /// 用户所有卡片的汇总
    pub async fn get_user_analytics(&self, user_id: &str) -> Result<UserAnalytics> {
        let now = Utc::now();
        let cards = self.storage.list_cards_by_user(user_id).await?;
        let card_ids: Vec<String> = cards.iter().map(|c| c.id.clone()).collect();

        let total_views: u64 = cards.iter().map(|c| c.view_count).sum();
        let total_shares: u64 = cards.iter().map(|c| c.share_count).sum();

        let all_contacts = self
            .storage
            .list_contacts_by_user(user_id, &ContactFilter::default())
            .await?;
        let recent_since = days_ago(now, RECENT_CONTACT_DAYS);
        let recent_contacts = all_contacts
            .iter()
            .filter(|c| c.created_at >= recent_since)
            .count() as u64;
        let total_contacts = all_contacts.len() as u64;

        let this_start = month_start(now);
        let prev_start = previous_month_start(now);

        let this_month = PeriodCounts {
            views: self
                .storage
                .count_views_for_cards(&card_ids, Some(this_start), None)
                .await?,
            shares: self
                .storage
                .count_shares_for_cards(&card_ids, Some(this_start), None)
                .await?,
            contacts: self
                .storage
                .count_contacts_created(user_id, Some(this_start), None)
                .await?,
        };
        let last_month = PeriodCounts {
            views: self
                .storage
                .count_views_for_cards(&card_ids, Some(prev_start), Some(this_start))
                .await?,
            shares: self
                .storage
                .count_shares_for_cards(&card_ids, Some(prev_start), Some(this_start))
                .await?,
            contacts: self
                .storage
                .count_contacts_created(user_id, Some(prev_start), Some(this_start))
                .await?,
        };

        let growth = GrowthStats {
            views: growth_percent(this_month.views, last_month.views),
            shares: growth_percent(this_month.shares, last_month.shares),
            contacts: growth_percent(this_month.contacts, last_month.contacts),
        };

        Ok(UserAnalytics {
            total_cards: cards.len() as u64,
            active_cards: cards.iter().filter(|c| c.is_active).count() as u64,
            public_cards: cards.iter().filter(|c| c.is_public).count() as u64,
            total_views,
            total_shares,
            total_contacts,
            recent_contacts,
            engagement_rate: engagement_rate(total_views, total_shares, total_contacts),
            this_month,
            growth,
        })
    }

    /// 按 views + shares 降序，平局时新卡在前
    pub async fn top_cards(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<TopCard>> {
        let limit = limit.unwrap_or(5).clamp(1, 100);
        // list_cards_by_user 已按创建时间倒序，稳定排序保留该顺序
        let mut cards = self.storage.list_cards_by_user(user_id).await?;
        cards.sort_by(|a, b| {
            (b.view_count + b.share_count).cmp(&(a.view_count + a.share_count))
        });
        Ok(cards.iter().take(limit).map(TopCard::from).collect())
    }
}
