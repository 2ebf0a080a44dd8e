//! Service layer for business logic
//!
//! 服务层只依赖 `SeaOrmStorage`，HTTP handler 与 CLI 共用同一套逻辑。

pub mod analytics;
pub mod card_service;
pub mod contact_service;
pub mod sharing;
pub mod transfer;
pub mod user_service;

pub use analytics::{AnalyticsService, CardEventSink, ViewContext};
pub use card_service::{CardService, CreateCardRequest, PublicCardView, UpdateCardRequest};
pub use contact_service::{
    ContactListFilter, ContactListQuery, ContactService, CreateContactRequest,
    UpdateContactRequest,
};
pub use sharing::SharingService;
pub use transfer::{ExportFile, ImportReport, TransferFormat};
pub use user_service::{AuthUser, UpdateProfileRequest, UserService};
