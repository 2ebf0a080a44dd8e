mod cards;
mod config_gen;
mod contacts;
mod token;

pub use cards::list_cards;
pub use config_gen::config_generate;
pub use contacts::{export_contacts, import_contacts};
pub use token::issue_token;
