use std::sync::Arc;

use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::{CardCounter, ContactFilter, SeaOrmStorage};
pub use models::{
    CardShare, CardTemplate, CardView, Contact, DigitalCard, NfcTag, SharingSettings,
    SocialProfile, SourceType, User,
};

pub struct StorageFactory;

impl StorageFactory {
    /// 按配置中的 database_url 创建存储（自动推断后端并执行迁移）
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        let backend_type = backend::infer_backend_from_url(database_url)?;

        let storage = SeaOrmStorage::new(database_url, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
