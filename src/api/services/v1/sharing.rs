//! 分享相关接口：二维码、签名、设置、社交资料与 NFC 标签

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::info;

use crate::services::sharing::{
    CreateNfcTagRequest, QrRequest, SharingSettingsRequest, SignatureRequest,
    SocialProfileRequest, UpdateSocialProfileRequest,
};
use crate::services::{AuthUser, SharingService};

use super::error_code::ErrorCode;
use super::helpers::{
    api_result, created_response, error_for_resource, resource_result, success_response,
};
use super::types::{DeletedResponse, ShareUrlQuery, SignatureResponse};

pub async fn build_qr(
    user: AuthUser,
    body: web::Json<QrRequest>,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    Ok(resource_result(
        service.build_qr(&user.id, body.into_inner()).await,
        ErrorCode::CardNotFound,
    ))
}

pub async fn render_signature(
    _user: AuthUser,
    body: web::Json<SignatureRequest>,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        service
            .render_signature(&body)
            .map(|html| SignatureResponse { html }),
    ))
}

pub async fn get_settings(
    user: AuthUser,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.get_settings(&user.id).await))
}

pub async fn save_settings(
    user: AuthUser,
    body: web::Json<SharingSettingsRequest>,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        service.save_settings(&user.id, body.into_inner()).await,
    ))
}

/// `GET /sharing/share-url?platform=&card_id=`
pub async fn get_share_url(
    user: AuthUser,
    query: web::Query<ShareUrlQuery>,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    Ok(resource_result(
        service
            .share_url(&user.id, &query.platform, &query.card_id)
            .await,
        ErrorCode::CardNotFound,
    ))
}

// ---------------- social ----------------

pub async fn list_social_profiles(
    user: AuthUser,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.list_social_profiles(&user.id).await))
}

pub async fn add_social_profile(
    user: AuthUser,
    body: web::Json<SocialProfileRequest>,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    match service.add_social_profile(&user.id, body.into_inner()).await {
        Ok(profile) => Ok(created_response(profile)),
        Err(e) => Ok(error_for_resource(&e, ErrorCode::SocialProfileNotFound)),
    }
}

pub async fn update_social_profile(
    user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateSocialProfileRequest>,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    Ok(resource_result(
        service
            .update_social_profile(&user.id, &path, body.into_inner())
            .await,
        ErrorCode::SocialProfileNotFound,
    ))
}

pub async fn delete_social_profile(
    user: AuthUser,
    path: web::Path<String>,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    match service.delete_social_profile(&user.id, &id).await {
        Ok(()) => Ok(success_response(DeletedResponse::new(id))),
        Err(e) => Ok(error_for_resource(&e, ErrorCode::SocialProfileNotFound)),
    }
}

// ---------------- nfc ----------------

pub async fn list_nfc_tags(
    user: AuthUser,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.list_nfc_tags(&user.id).await))
}

pub async fn create_nfc_tag(
    user: AuthUser,
    body: web::Json<CreateNfcTagRequest>,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    match service.create_nfc_tag(&user.id, body.into_inner()).await {
        Ok(tag) => {
            info!("API: NFC tag {} created for card {}", tag.id, tag.card_id);
            Ok(created_response(tag))
        }
        // 标签挂在卡片上，找不到的只可能是卡片
        Err(e) => Ok(error_for_resource(&e, ErrorCode::CardNotFound)),
    }
}

pub async fn delete_nfc_tag(
    user: AuthUser,
    path: web::Path<String>,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    match service.delete_nfc_tag(&user.id, &id).await {
        Ok(()) => Ok(success_response(DeletedResponse::new(id))),
        Err(e) => Ok(error_for_resource(&e, ErrorCode::NfcTagNotFound)),
    }
}

pub async fn toggle_nfc_tag(
    user: AuthUser,
    path: web::Path<String>,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    Ok(resource_result(
        service.toggle_nfc_tag(&user.id, &path).await,
        ErrorCode::NfcTagNotFound,
    ))
}

/// 记录一次写入并返回要写进标签的 NDEF 记录
pub async fn write_nfc_tag(
    user: AuthUser,
    path: web::Path<String>,
    service: web::Data<Arc<SharingService>>,
) -> ActixResult<impl Responder> {
    Ok(resource_result(
        service.record_nfc_write(&user.id, &path).await,
        ErrorCode::NfcTagNotFound,
    ))
}
