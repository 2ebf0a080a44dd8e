//! 已认证 API（`/api/v1`）

pub mod analytics;
pub mod cards;
pub mod contacts;
pub mod error_code;
pub mod helpers;
pub mod routes;
pub mod sharing;
pub mod transfer;
pub mod types;
pub mod users;

pub use error_code::ErrorCode;
pub use helpers::{api_result, error_from_cardshare, error_response, success_response};
pub use routes::v1_routes;
pub use types::ApiResponse;
