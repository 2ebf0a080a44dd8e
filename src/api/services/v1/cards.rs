//! 卡片 CRUD 及卡片级操作

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, warn};

use crate::services::sharing::QrTemplate;
use crate::services::{
    AnalyticsService, AuthUser, CardService, ContactService, CreateCardRequest, SharingService,
    UpdateCardRequest,
};

use super::error_code::ErrorCode;
use super::helpers::{created_response, error_for_resource, resource_result, success_response};
use super::types::{
    CardAnalyticsQuery, CardQrQuery, CardSignatureResponse, DeletedResponse, SignatureQuery,
};

pub async fn list_cards(
    user: AuthUser,
    service: web::Data<Arc<CardService>>,
) -> ActixResult<impl Responder> {
    Ok(resource_result(
        service.get_user_cards(&user.id).await,
        ErrorCode::CardNotFound,
    ))
}

pub async fn create_card(
    user: AuthUser,
    body: web::Json<CreateCardRequest>,
    service: web::Data<Arc<CardService>>,
) -> ActixResult<impl Responder> {
    match service.create_card(&user.id, body.into_inner()).await {
        Ok(card) => Ok(created_response(card)),
        Err(e) => {
            warn!("API: create card failed for {}: {}", user.id, e);
            Ok(error_for_resource(&e, ErrorCode::CardNotFound))
        }
    }
}

pub async fn get_card(
    user: AuthUser,
    path: web::Path<String>,
    service: web::Data<Arc<CardService>>,
) -> ActixResult<impl Responder> {
    Ok(resource_result(
        service.get_card(&user.id, &path).await,
        ErrorCode::CardNotFound,
    ))
}

pub async fn update_card(
    user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateCardRequest>,
    service: web::Data<Arc<CardService>>,
) -> ActixResult<impl Responder> {
    Ok(resource_result(
        service.update_card(&user.id, &path, body.into_inner()).await,
        ErrorCode::CardNotFound,
    ))
}

pub async fn delete_card(
    user: AuthUser,
    path: web::Path<String>,
    service: web::Data<Arc<CardService>>,
) -> ActixResult<impl Responder> {
    let card_id = path.into_inner();
    match service.delete_card(&user.id, &card_id).await {
        Ok(()) => {
            info!("API: card {} deleted by {}", card_id, user.id);
            Ok(success_response(DeletedResponse::new(card_id)))
        }
        Err(e) => Ok(error_for_resource(&e, ErrorCode::CardNotFound)),
    }
}

pub async fn toggle_card_active(
    user: AuthUser,
    path: web::Path<String>,
    service: web::Data<Arc<CardService>>,
) -> ActixResult<impl Responder> {
    Ok(resource_result(
        service.toggle_active(&user.id, &path).await,
        ErrorCode::CardNotFound,
    ))
}

pub async fn get_card_analytics(
    user: AuthUser,
    path: web::Path<String>,
    query: web::Query<CardAnalyticsQuery>,
    service: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    Ok(resource_result(
        service.get_card_analytics(&user.id, &path, query.days).await,
        ErrorCode::CardNotFound,
    ))
}

pub async fn get_card_qr(
    user: AuthUser,
    path: web::Path<String>,
    query: web::Query<CardQrQuery>,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    let query = query.into_inner();
    let template = query.template.unwrap_or(QrTemplate::Url);
    Ok(resource_result(
        service
            .qr_for_card(&user.id, &path, template, query.data)
            .await,
        ErrorCode::CardNotFound,
    ))
}

/// 把别人的公开卡片存为自己的联系人
pub async fn save_card_as_contact(
    user: AuthUser,
    path: web::Path<String>,
    service: web::Data<Arc<ContactService>>,
) -> ActixResult<impl Responder> {
    match service.save_card_as_contact(&user.id, &path).await {
        Ok(contact) => Ok(created_response(contact)),
        Err(e) => Ok(error_for_resource(&e, ErrorCode::CardNotFound)),
    }
}

pub async fn get_card_signature(
    user: AuthUser,
    path: web::Path<String>,
    query: web::Query<SignatureQuery>,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    let result = async {
        let request = service
            .prefill_signature(&user.id, &path, query.template, query.color_scheme)
            .await?;
        let html = service.render_signature(&request)?;
        Ok::<_, crate::errors::CardshareError>(CardSignatureResponse { request, html })
    }
    .await;

    Ok(resource_result(result, ErrorCode::CardNotFound))
}
