//! Model <-> 领域类型转换
//!
//! 计数器与 created_at 只在插入时写入，更新时一律 NotSet。

use std::str::FromStr;

use sea_orm::ActiveValue::{NotSet, Set};

use crate::storage::models::{
    CardShare, CardView, Contact, DigitalCard, NfcTag, SharingSettings, SocialProfile, SourceType,
    User,
};
use migration::entities::{
    card_share, card_view, contact, digital_card, nfc_tag, sharing_setting, social_profile, user,
};

fn counter(value: i64) -> u64 {
    value.max(0) as u64
}

/// JSON 数组字符串 -> Vec<String>，损坏的数据当作空列表
pub fn decode_string_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

pub fn encode_string_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

pub fn model_to_user(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        display_name: model.display_name,
        avatar_url: model.avatar_url,
        company: model.company,
        job_title: model.job_title,
        phone: model.phone,
        website: model.website,
        bio: model.bio,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn user_to_active_model(u: &User, is_new: bool) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(u.id.clone()),
        email: Set(u.email.clone()),
        display_name: Set(u.display_name.clone()),
        avatar_url: Set(u.avatar_url.clone()),
        company: Set(u.company.clone()),
        job_title: Set(u.job_title.clone()),
        phone: Set(u.phone.clone()),
        website: Set(u.website.clone()),
        bio: Set(u.bio.clone()),
        created_at: if is_new { Set(u.created_at) } else { NotSet },
        updated_at: Set(u.updated_at),
    }
}

pub fn model_to_card(model: digital_card::Model) -> DigitalCard {
    DigitalCard {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        template_id: model.template_id,
        is_active: model.is_active,
        is_public: model.is_public,
        full_name: model.full_name,
        job_title: model.job_title,
        company: model.company,
        email: model.email,
        phone: model.phone,
        website: model.website,
        bio: model.bio,
        profile_image_url: model.profile_image_url,
        company_logo_url: model.company_logo_url,
        linkedin_url: model.linkedin_url,
        twitter_url: model.twitter_url,
        instagram_url: model.instagram_url,
        facebook_url: model.facebook_url,
        background_color: model.background_color,
        text_color: model.text_color,
        accent_color: model.accent_color,
        font_family: model.font_family,
        view_count: counter(model.view_count),
        share_count: counter(model.share_count),
        contact_count: counter(model.contact_count),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn card_to_active_model(card: &DigitalCard, is_new: bool) -> digital_card::ActiveModel {
    digital_card::ActiveModel {
        id: Set(card.id.clone()),
        user_id: if is_new {
            Set(card.user_id.clone())
        } else {
            NotSet
        },
        name: Set(card.name.clone()),
        template_id: Set(card.template_id.clone()),
        is_active: Set(card.is_active),
        is_public: Set(card.is_public),
        full_name: Set(card.full_name.clone()),
        job_title: Set(card.job_title.clone()),
        company: Set(card.company.clone()),
        email: Set(card.email.clone()),
        phone: Set(card.phone.clone()),
        website: Set(card.website.clone()),
        bio: Set(card.bio.clone()),
        profile_image_url: Set(card.profile_image_url.clone()),
        company_logo_url: Set(card.company_logo_url.clone()),
        linkedin_url: Set(card.linkedin_url.clone()),
        twitter_url: Set(card.twitter_url.clone()),
        instagram_url: Set(card.instagram_url.clone()),
        facebook_url: Set(card.facebook_url.clone()),
        background_color: Set(card.background_color.clone()),
        text_color: Set(card.text_color.clone()),
        accent_color: Set(card.accent_color.clone()),
        font_family: Set(card.font_family.clone()),
        view_count: if is_new { Set(0) } else { NotSet },
        share_count: if is_new { Set(0) } else { NotSet },
        contact_count: if is_new { Set(0) } else { NotSet },
        created_at: if is_new { Set(card.created_at) } else { NotSet },
        updated_at: Set(card.updated_at),
    }
}

pub fn model_to_contact(model: contact::Model) -> Contact {
    Contact {
        id: model.id,
        user_id: model.user_id,
        full_name: model.full_name,
        email: model.email,
        phone: model.phone,
        company: model.company,
        job_title: model.job_title,
        website: model.website,
        notes: model.notes,
        source_type: SourceType::from_str(&model.source_type).unwrap_or_default(),
        source_card_id: model.source_card_id,
        tags: decode_string_list(&model.tags),
        is_favorite: model.is_favorite,
        last_contacted: model.last_contacted,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn contact_to_active_model(c: &Contact, is_new: bool) -> contact::ActiveModel {
    contact::ActiveModel {
        id: Set(c.id.clone()),
        user_id: if is_new { Set(c.user_id.clone()) } else { NotSet },
        full_name: Set(c.full_name.clone()),
        email: Set(c.email.clone()),
        phone: Set(c.phone.clone()),
        company: Set(c.company.clone()),
        job_title: Set(c.job_title.clone()),
        website: Set(c.website.clone()),
        notes: Set(c.notes.clone()),
        source_type: if is_new {
            Set(c.source_type.to_string())
        } else {
            NotSet
        },
        source_card_id: if is_new {
            Set(c.source_card_id.clone())
        } else {
            NotSet
        },
        tags: Set(encode_string_list(&c.tags)),
        is_favorite: Set(c.is_favorite),
        last_contacted: Set(c.last_contacted),
        created_at: if is_new { Set(c.created_at) } else { NotSet },
        updated_at: Set(c.updated_at),
    }
}

pub fn model_to_card_view(model: card_view::Model) -> CardView {
    CardView {
        id: model.id,
        card_id: model.card_id,
        viewer_ip: model.viewer_ip,
        viewer_user_agent: model.viewer_user_agent,
        viewer_location: model.viewer_location,
        referrer: model.referrer,
        viewed_at: model.viewed_at,
    }
}

pub fn model_to_card_share(model: card_share::Model) -> CardShare {
    CardShare {
        id: model.id,
        card_id: model.card_id,
        share_method: model.share_method,
        shared_at: model.shared_at,
    }
}

pub fn model_to_social_profile(model: social_profile::Model) -> SocialProfile {
    SocialProfile {
        id: model.id,
        user_id: model.user_id,
        platform: model.platform,
        username: model.username,
        url: model.url,
        is_active: model.is_active,
        created_at: model.created_at,
    }
}

pub fn social_profile_to_active_model(
    p: &SocialProfile,
    is_new: bool,
) -> social_profile::ActiveModel {
    social_profile::ActiveModel {
        id: Set(p.id.clone()),
        user_id: if is_new { Set(p.user_id.clone()) } else { NotSet },
        platform: Set(p.platform.clone()),
        username: Set(p.username.clone()),
        url: Set(p.url.clone()),
        is_active: Set(p.is_active),
        created_at: if is_new { Set(p.created_at) } else { NotSet },
    }
}

pub fn model_to_sharing_settings(model: sharing_setting::Model) -> SharingSettings {
    SharingSettings {
        user_id: model.user_id,
        auto_share: model.auto_share,
        platforms: decode_string_list(&model.platforms),
        include_qr: model.include_qr,
        custom_message: model.custom_message,
        updated_at: Some(model.updated_at),
    }
}

pub fn model_to_nfc_tag(model: nfc_tag::Model) -> NfcTag {
    NfcTag {
        id: model.id,
        user_id: model.user_id,
        card_id: model.card_id,
        name: model.name,
        card_title: model.card_title,
        card_url: model.card_url,
        is_active: model.is_active,
        write_count: counter(model.write_count),
        last_used: model.last_used,
        created_at: model.created_at,
    }
}

pub fn nfc_tag_to_active_model(tag: &NfcTag) -> nfc_tag::ActiveModel {
    nfc_tag::ActiveModel {
        id: Set(tag.id.clone()),
        user_id: Set(tag.user_id.clone()),
        card_id: Set(tag.card_id.clone()),
        name: Set(tag.name.clone()),
        card_title: Set(tag.card_title.clone()),
        card_url: Set(tag.card_url.clone()),
        is_active: Set(tag.is_active),
        write_count: Set(0),
        last_used: Set(None),
        created_at: Set(tag.created_at),
    }
}
