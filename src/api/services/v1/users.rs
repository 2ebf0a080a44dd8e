//! `/users/me`

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::info;

use crate::services::{AuthUser, UpdateProfileRequest, UserService};

use super::helpers::api_result;

pub async fn get_current_user(
    user: AuthUser,
    service: web::Data<Arc<UserService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.get_current_user(&user).await))
}

/// 首次调用时创建用户，之后更新资料
pub async fn upsert_current_user(
    user: AuthUser,
    body: web::Json<UpdateProfileRequest>,
    service: web::Data<Arc<UserService>>,
) -> ActixResult<impl Responder> {
    info!("API: profile update for {}", user.id);
    Ok(api_result(
        service.create_or_update_user(&user, body.into_inner()).await,
    ))
}
