//! 公开卡片访问 `/card/{id}`
//!
//! 无需登录。浏览会记录一次 view，记录失败只写日志，不影响响应。

use actix_web::http::header::{REFERER, USER_AGENT};
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::api::services::v1::ErrorCode;
use crate::api::services::v1::helpers::{error_for_resource, success_response};
use crate::services::{AnalyticsService, CardService, PublicCardView, ViewContext};
use crate::utils::slugify;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ShareCardRequest {
    pub method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ShareCardResponse {
    pub share_url: String,
    pub message: String,
}

fn header_value(req: &HttpRequest, name: actix_web::http::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn view_context(req: &HttpRequest) -> ViewContext {
    ViewContext {
        ip: req.connection_info().realip_remote_addr().map(String::from),
        user_agent: header_value(req, USER_AGENT),
        referrer: header_value(req, REFERER),
        location: None,
    }
}

pub async fn get_public_card(
    req: HttpRequest,
    path: web::Path<String>,
    cards: web::Data<Arc<CardService>>,
    analytics: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    let card_id = path.into_inner();

    let card = match cards.get_public_card(&card_id).await {
        Ok(card) => card,
        Err(e) => {
            debug!("Public card {} unavailable: {}", card_id, e);
            return Ok(error_for_resource(&e, ErrorCode::CardNotFound));
        }
    };

    if let Err(e) = analytics
        .record_card_view(&card.id, view_context(&req))
        .await
    {
        warn!("Failed to record view for card {}: {}", card.id, e);
    }

    Ok(success_response(PublicCardView::from(&card)))
}

pub async fn download_vcard(
    path: web::Path<String>,
    cards: web::Data<Arc<CardService>>,
) -> ActixResult<impl Responder> {
    match cards.card_vcard(&path).await {
        Ok((card, vcard)) => {
            let stem = slugify(card.display_name());
            Ok(HttpResponse::Ok()
                .insert_header(("Content-Type", "text/vcard; charset=utf-8"))
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}.vcf\"", stem),
                ))
                .body(vcard))
        }
        Err(e) => Ok(error_for_resource(&e, ErrorCode::CardNotFound)),
    }
}

/// `POST /card/{id}/share`，body 可省略，默认 `link`
pub async fn share_card(
    path: web::Path<String>,
    body: Option<web::Json<ShareCardRequest>>,
    cards: web::Data<Arc<CardService>>,
    analytics: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    let card = match cards.get_public_card(&path).await {
        Ok(card) => card,
        Err(e) => return Ok(error_for_resource(&e, ErrorCode::CardNotFound)),
    };

    let method = body.and_then(|b| b.into_inner().method);
    if let Err(e) = analytics
        .record_card_share(&card.id, method.as_deref())
        .await
    {
        return Ok(error_for_resource(&e, ErrorCode::CardNotFound));
    }

    Ok(success_response(ShareCardResponse {
        share_url: cards.card_url(&card.id),
        message: format!(
            "Check out {}'s digital business card",
            card.display_name()
        ),
    }))
}

/// 公开卡片路由 `/card`
pub fn public_card_routes() -> actix_web::Scope {
    web::scope("/card")
        .route("/{id}/vcard", web::get().to(download_vcard))
        .route("/{id}/share", web::post().to(share_card))
        .route("/{id}", web::get().to(get_public_card))
}
