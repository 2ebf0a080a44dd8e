//! API v1 请求与响应类型

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::services::TransferFormat;
use crate::services::sharing::{ColorScheme, QrTemplate, SignatureTemplate};

/// 统一响应包装
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CardAnalyticsQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CardQrQuery {
    pub template: Option<QrTemplate>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SignatureQuery {
    pub template: Option<SignatureTemplate>,
    pub color_scheme: Option<ColorScheme>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ExportQuery {
    pub format: Option<TransferFormat>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TopCardsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ShareUrlQuery {
    pub platform: String,
    pub card_id: String,
}

/// 删除操作的返回
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct DeletedResponse {
    pub id: String,
    pub deleted: bool,
}

impl DeletedResponse {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            deleted: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct FavoriteResponse {
    pub id: String,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SignatureResponse {
    pub html: String,
}

/// 卡片预填签名：请求内容 + 渲染结果，前端可在此基础上继续编辑
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CardSignatureResponse {
    pub request: crate::services::sharing::SignatureRequest,
    pub html: String,
}
