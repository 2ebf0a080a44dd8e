//! 联系人导入导出

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use futures_util::StreamExt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::get_config;
use crate::errors::CardshareError;
use crate::services::{AuthUser, ContactService, TransferFormat};

use super::error_code::ErrorCode;
use super::helpers::{error_from_cardshare, error_response, success_response};
use super::types::ExportQuery;

/// `GET /contacts/export?format=`，默认 csv
pub async fn export_contacts(
    user: AuthUser,
    query: web::Query<ExportQuery>,
    service: web::Data<Arc<ContactService>>,
) -> ActixResult<impl Responder> {
    let format = query.format.unwrap_or_default();

    match service.export_contacts(&user.id, format).await {
        Ok(file) => {
            info!("API: exporting contacts for {} as {}", user.id, file.filename);
            Ok(HttpResponse::Ok()
                .insert_header(("Content-Type", file.content_type))
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", file.filename),
                ))
                .body(file.body))
        }
        Err(e) => {
            error!("API: contact export failed for {}: {}", user.id, e);
            Ok(error_from_cardshare(&e))
        }
    }
}

/// 读取 multipart 字段，超过 `limit` 字节时报错
async fn read_field(field: &mut actix_multipart::Field, limit: usize) -> Result<Vec<u8>, CardshareError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let bytes = chunk.map_err(|e| {
            CardshareError::invalid_multipart_data(format!("Failed to read upload: {}", e))
        })?;
        if data.len() + bytes.len() > limit {
            return Err(CardshareError::file_too_large(format!(
                "File size exceeds maximum {} bytes",
                limit
            )));
        }
        data.extend_from_slice(&bytes);
    }
    Ok(data)
}

/// `POST /contacts/import`
///
/// multipart 字段：`file`（必填）与 `format`（可选）。
/// 未给出 format 时按文件名后缀推断，仍无法判断则按 csv 处理。
pub async fn import_contacts(
    user: AuthUser,
    mut payload: Multipart,
    service: web::Data<Arc<ContactService>>,
) -> ActixResult<impl Responder> {
    let max_bytes = get_config().public.max_import_bytes;

    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut format_field: Option<String> = None;

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to parse multipart field: {}", e);
                return Ok(error_from_cardshare(
                    &CardshareError::invalid_multipart_data(format!(
                        "Invalid multipart data: {}",
                        e
                    )),
                ));
            }
        };

        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(String::from);
                match read_field(&mut field, max_bytes).await {
                    Ok(data) => file_data = Some(data),
                    Err(e) => {
                        warn!("API: import upload rejected for {}: {}", user.id, e);
                        return Ok(error_from_cardshare(&e));
                    }
                }
            }
            "format" => match read_field(&mut field, 64).await {
                Ok(data) => format_field = Some(String::from_utf8_lossy(&data).trim().to_string()),
                Err(e) => return Ok(error_from_cardshare(&e)),
            },
            _ => {
                // 忽略未知字段
            }
        }
    }

    let Some(data) = file_data else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::ImportFileMissing,
            "No file uploaded",
        ));
    };

    let format = match format_field.as_deref().filter(|f| !f.is_empty()) {
        Some(raw) => match TransferFormat::from_str(raw) {
            Ok(f) => f,
            Err(e) => return Ok(error_from_cardshare(&e)),
        },
        None => filename
            .as_deref()
            .and_then(TransferFormat::from_filename)
            .unwrap_or_default(),
    };

    let text = match String::from_utf8(data) {
        Ok(text) => text,
        Err(_) => {
            return Ok(error_from_cardshare(&CardshareError::import_parse(
                "Uploaded file is not valid UTF-8",
            )));
        }
    };

    info!(
        "API: importing contacts for {} ({} bytes, format {})",
        user.id,
        text.len(),
        format
    );

    match service.import_contacts(&user.id, format, &text).await {
        Ok(report) => Ok(success_response(report)),
        Err(e) => {
            error!("API: contact import failed for {}: {}", user.id, e);
            Ok(error_from_cardshare(&e))
        }
    }
}
