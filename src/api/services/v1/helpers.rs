//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::CardshareError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 201 Created
pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 CardshareError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_cardshare(err: &CardshareError) -> HttpResponse {
    let status = err.http_status();
    let error_code = ErrorCode::from(err.clone());
    error_response(status, error_code, err.message())
}

/// 同上，但 NotFound 使用资源专属的错误码（如 CardNotFound）
pub fn error_for_resource(err: &CardshareError, not_found: ErrorCode) -> HttpResponse {
    match err {
        CardshareError::NotFound(msg) => error_response(StatusCode::NOT_FOUND, not_found, msg),
        other => error_from_cardshare(other),
    }
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 CardshareError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<CardshareError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: CardshareError = e.into();
            error_from_cardshare(&err)
        }
    }
}

/// 带资源专属 NotFound 错误码的 [`api_result`]
pub fn resource_result<T, E>(result: Result<T, E>, not_found: ErrorCode) -> HttpResponse
where
    T: Serialize,
    E: Into<CardshareError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_for_resource(&e.into(), not_found),
    }
}
