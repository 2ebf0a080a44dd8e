pub mod card_share;
pub mod card_view;
pub mod contact;
pub mod digital_card;
pub mod nfc_tag;
pub mod sharing_setting;
pub mod social_profile;
pub mod user;

pub use card_share::Entity as CardShareEntity;
pub use card_view::Entity as CardViewEntity;
pub use contact::Entity as ContactEntity;
pub use digital_card::Entity as DigitalCardEntity;
pub use nfc_tag::Entity as NfcTagEntity;
pub use sharing_setting::Entity as SharingSettingEntity;
pub use social_profile::Entity as SocialProfileEntity;
pub use user::Entity as UserEntity;
