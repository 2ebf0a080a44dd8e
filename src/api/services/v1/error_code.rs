//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::errors::CardshareError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，ts-rs 自动生成 TypeScript 类型。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 卡片错误
/// - 4000-4099: 联系人与导入导出错误
/// - 5000-5099: 统计错误
/// - 6000-6099: 分享错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    FileTooLarge = 1011,
    InvalidDateFormat = 1012,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    TokenMissing = 2000,
    TokenInvalid = 2001,

    // 卡片错误 3000-3099
    CardNotFound = 3000,

    // 联系人与导入导出错误 4000-4099
    ContactNotFound = 4000,
    ImportFailed = 4001,
    ExportFailed = 4002,
    InvalidMultipartData = 4003,
    ImportFileMissing = 4004,
    ImportParseError = 4005,

    // 统计错误 5000-5099
    AnalyticsQueryFailed = 5000,

    // 分享错误 6000-6099
    NfcTagNotFound = 6000,
    SocialProfileNotFound = 6001,
}

impl From<CardshareError> for ErrorCode {
    fn from(err: CardshareError) -> Self {
        match err {
            CardshareError::Validation(_) => ErrorCode::BadRequest,
            CardshareError::DateParse(_) => ErrorCode::InvalidDateFormat,
            CardshareError::NotFound(_) => ErrorCode::NotFound,
            CardshareError::Unauthorized(_) => ErrorCode::Unauthorized,
            CardshareError::Forbidden(_) => ErrorCode::Forbidden,
            CardshareError::ImportParse(_) => ErrorCode::ImportParseError,
            CardshareError::ExportFailed(_) => ErrorCode::ExportFailed,
            CardshareError::InvalidMultipartData(_) => ErrorCode::InvalidMultipartData,
            CardshareError::FileTooLarge(_) => ErrorCode::FileTooLarge,
            CardshareError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            CardshareError::DatabaseConfig(_)
            | CardshareError::DatabaseOperation(_)
            | CardshareError::FileOperation(_)
            | CardshareError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}
