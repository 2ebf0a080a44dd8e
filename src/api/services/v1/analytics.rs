//! 用户级统计

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;

use crate::services::{AnalyticsService, AuthUser};

use super::helpers::api_result;
use super::types::TopCardsQuery;

pub async fn get_summary(
    user: AuthUser,
    service: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.get_user_analytics(&user.id).await))
}

pub async fn get_top_cards(
    user: AuthUser,
    query: web::Query<TopCardsQuery>,
    service: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.top_cards(&user.id, query.limit).await))
}
