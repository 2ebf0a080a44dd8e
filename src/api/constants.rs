//! API 模块常量定义

/// ts-rs 生成的 TypeScript 类型文件
pub const TS_EXPORT_PATH: &str = "cardshare.generated.ts";

/// 认证后的 API 前缀
pub const API_V1_PREFIX: &str = "/api/v1";

/// JSON 请求体上限
pub const JSON_BODY_LIMIT: usize = 1024 * 1024;

/// JWT 中 token_type 字段的取值
pub const ACCESS_TOKEN_TYPE: &str = "access";
