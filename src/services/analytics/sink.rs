//! 卡片事件写入抽象
//!
//! 服务层只依赖这个 trait，存储后端负责在一次事务里追加事件并自增计数器。

use async_trait::async_trait;

use crate::errors::Result;

/// 一次访问的上下文
#[derive(Debug, Clone, Default)]
pub struct ViewContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub location: Option<String>,
}

#[async_trait]
pub trait CardEventSink: Send + Sync {
    /// 追加一条访问记录并 view_count + 1，卡片不存在时返回 NotFound
    async fn record_view(&self, card_id: &str, ctx: ViewContext) -> Result<()>;

    /// 追加一条分享记录并 share_count + 1，卡片不存在时返回 NotFound
    async fn record_share(&self, card_id: &str, method: &str) -> Result<()>;
}
