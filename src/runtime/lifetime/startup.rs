use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::services::{AnalyticsService, CardService, ContactService, SharingService, UserService};
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub user_service: Arc<UserService>,
    pub card_service: Arc<CardService>,
    pub contact_service: Arc<ContactService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub sharing_service: Arc<SharingService>,
}

impl StartupContext {
    /// 基于已有存储构建全部服务（测试与 CLI 复用）
    pub fn from_storage(storage: Arc<SeaOrmStorage>) -> Self {
        Self {
            user_service: Arc::new(UserService::new(storage.clone())),
            card_service: Arc::new(CardService::new(storage.clone())),
            contact_service: Arc::new(ContactService::new(storage.clone())),
            analytics_service: Arc::new(AnalyticsService::new(storage.clone())),
            sharing_service: Arc::new(SharingService::new(storage.clone())),
            storage,
        }
    }
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    // 多个依赖都用到 rustls，进程级只装一次
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    let context = StartupContext::from_storage(storage);

    let config = crate::config::get_config();
    if config.auth.jwt_secret.trim().is_empty() {
        warn!(
            "auth.jwt_secret is not set; a random secret is used and tokens will not survive a restart"
        );
    }
    // 提前初始化，让随机密钥在第一个请求前就确定下来
    let _ = crate::api::jwt::get_jwt_service();

    info!(
        "Pre-startup processing completed in {:?}",
        start_time.elapsed()
    );
    Ok(context)
}
