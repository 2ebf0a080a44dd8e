pub mod health;
pub mod public_card;
pub mod v1;

pub use health::{AppStartTime, HealthService, health_routes};
pub use public_card::public_card_routes;
pub use v1::v1_routes;
