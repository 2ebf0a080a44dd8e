//! API v1 路由配置
//!
//! 按资源拆分 scope；挂载处负责包上 `UserAuth`。

use actix_web::web;

use super::analytics::{get_summary, get_top_cards};
use super::cards::{
    create_card, delete_card, get_card, get_card_analytics, get_card_qr, get_card_signature,
    list_cards, save_card_as_contact, toggle_card_active, update_card,
};
use super::contacts::{
    create_contact, delete_contact, get_contact, list_contacts, mark_contacted, toggle_favorite,
    update_contact,
};
use super::sharing::{
    add_social_profile, build_qr, create_nfc_tag, delete_nfc_tag, delete_social_profile,
    get_settings, get_share_url, list_nfc_tags, list_social_profiles, render_signature,
    save_settings, toggle_nfc_tag, update_social_profile, write_nfc_tag,
};
use super::transfer::{export_contacts, import_contacts};
use super::users::{get_current_user, upsert_current_user};

/// 用户路由 `/users`
pub fn users_routes() -> actix_web::Scope {
    web::scope("/users")
        .route("/me", web::get().to(get_current_user))
        .route("/me", web::put().to(upsert_current_user))
}

/// 卡片路由 `/cards`
///
/// 包含：
/// - GET/POST /cards
/// - GET/PUT/DELETE /cards/{id}
/// - POST /cards/{id}/toggle-active
/// - GET /cards/{id}/analytics
/// - GET /cards/{id}/qr
/// - POST /cards/{id}/save-contact
/// - GET /cards/{id}/signature
pub fn cards_routes() -> actix_web::Scope {
    web::scope("/cards")
        .route("", web::get().to(list_cards))
        .route("", web::post().to(create_card))
        .route("/{id}/toggle-active", web::post().to(toggle_card_active))
        .route("/{id}/analytics", web::get().to(get_card_analytics))
        .route("/{id}/qr", web::get().to(get_card_qr))
        .route("/{id}/save-contact", web::post().to(save_card_as_contact))
        .route("/{id}/signature", web::get().to(get_card_signature))
        .route("/{id}", web::get().to(get_card))
        .route("/{id}", web::put().to(update_card))
        .route("/{id}", web::delete().to(delete_card))
}

/// 联系人路由 `/contacts`
pub fn contacts_routes() -> actix_web::Scope {
    web::scope("/contacts")
        .route("", web::get().to(list_contacts))
        .route("", web::post().to(create_contact))
        // export/import must be before /{id}
        .route("/export", web::get().to(export_contacts))
        .route("/import", web::post().to(import_contacts))
        .route("/{id}/favorite", web::post().to(toggle_favorite))
        .route("/{id}/contacted", web::post().to(mark_contacted))
        .route("/{id}", web::get().to(get_contact))
        .route("/{id}", web::put().to(update_contact))
        .route("/{id}", web::delete().to(delete_contact))
}

/// 统计路由 `/analytics`
pub fn analytics_routes() -> actix_web::Scope {
    web::scope("/analytics")
        .route("/summary", web::get().to(get_summary))
        .route("/top-cards", web::get().to(get_top_cards))
}

/// 分享路由 `/sharing`
pub fn sharing_routes() -> actix_web::Scope {
    web::scope("/sharing")
        .route("/qr", web::post().to(build_qr))
        .route("/signature", web::post().to(render_signature))
        .route("/settings", web::get().to(get_settings))
        .route("/settings", web::put().to(save_settings))
        .route("/share-url", web::get().to(get_share_url))
        .route("/social", web::get().to(list_social_profiles))
        .route("/social", web::post().to(add_social_profile))
        .route("/social/{id}", web::put().to(update_social_profile))
        .route("/social/{id}", web::delete().to(delete_social_profile))
        .route("/nfc", web::get().to(list_nfc_tags))
        .route("/nfc", web::post().to(create_nfc_tag))
        .route("/nfc/{id}/toggle", web::post().to(toggle_nfc_tag))
        .route("/nfc/{id}/write", web::post().to(write_nfc_tag))
        .route("/nfc/{id}", web::delete().to(delete_nfc_tag))
}

/// API v1 路由 `/api/v1`
///
/// 组合所有子模块路由。挂载时需 `.wrap(UserAuth)`
pub fn v1_routes() -> actix_web::Scope {
    web::scope(crate::api::constants::API_V1_PREFIX)
        .service(users_routes())
        .service(cards_routes())
        .service(contacts_routes())
        .service(analytics_routes())
        .service(sharing_routes())
}
