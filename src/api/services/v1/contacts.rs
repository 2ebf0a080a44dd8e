//! 联系人管理

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::info;

use crate::services::{
    AuthUser, ContactListQuery, ContactService, CreateContactRequest, UpdateContactRequest,
};

use super::error_code::ErrorCode;
use super::helpers::{created_response, error_for_resource, resource_result, success_response};
use super::types::{DeletedResponse, FavoriteResponse};

/// `GET /contacts?search=&filter=`
pub async fn list_contacts(
    user: AuthUser,
    query: web::Query<ContactListQuery>,
    service: web::Data<Arc<ContactService>>,
) -> ActixResult<impl Responder> {
    Ok(resource_result(
        service.list_contacts(&user.id, query.into_inner()).await,
        ErrorCode::ContactNotFound,
    ))
}

pub async fn create_contact(
    user: AuthUser,
    body: web::Json<CreateContactRequest>,
    service: web::Data<Arc<ContactService>>,
) -> ActixResult<impl Responder> {
    match service.create_contact(&user.id, body.into_inner()).await {
        Ok(contact) => Ok(created_response(contact)),
        Err(e) => Ok(error_for_resource(&e, ErrorCode::ContactNotFound)),
    }
}

pub async fn get_contact(
    user: AuthUser,
    path: web::Path<String>,
    service: web::Data<Arc<ContactService>>,
) -> ActixResult<impl Responder> {
    Ok(resource_result(
        service.get_contact(&user.id, &path).await,
        ErrorCode::ContactNotFound,
    ))
}

pub async fn update_contact(
    user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateContactRequest>,
    service: web::Data<Arc<ContactService>>,
) -> ActixResult<impl Responder> {
    Ok(resource_result(
        service
            .update_contact(&user.id, &path, body.into_inner())
            .await,
        ErrorCode::ContactNotFound,
    ))
}

pub async fn delete_contact(
    user: AuthUser,
    path: web::Path<String>,
    service: web::Data<Arc<ContactService>>,
) -> ActixResult<impl Responder> {
    let contact_id = path.into_inner();
    match service.delete_contact(&user.id, &contact_id).await {
        Ok(()) => {
            info!("API: contact {} deleted by {}", contact_id, user.id);
            Ok(success_response(DeletedResponse::new(contact_id)))
        }
        Err(e) => Ok(error_for_resource(&e, ErrorCode::ContactNotFound)),
    }
}

pub async fn toggle_favorite(
    user: AuthUser,
    path: web::Path<String>,
    service: web::Data<Arc<ContactService>>,
) -> ActixResult<impl Responder> {
    let contact_id = path.into_inner();
    let result = service
        .toggle_favorite(&user.id, &contact_id)
        .await
        .map(|is_favorite| FavoriteResponse {
            id: contact_id,
            is_favorite,
        });
    Ok(resource_result(result, ErrorCode::ContactNotFound))
}

pub async fn mark_contacted(
    user: AuthUser,
    path: web::Path<String>,
    service: web::Data<Arc<ContactService>>,
) -> ActixResult<impl Responder> {
    Ok(resource_result(
        service.mark_contacted(&user.id, &path).await,
        ErrorCode::ContactNotFound,
    ))
}
