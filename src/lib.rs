//! Cardshare - digital business card service
//!
//! Users publish digital business cards behind public share links, collect
//! contacts (with CSV / JSON / vCard import and export), generate sharing
//! artifacts (QR payloads, NFC records, email signatures) and read
//! per-card analytics.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface
//!
//! # Architecture
//! - `storage`: SeaORM backend and domain models
//! - `services`: Business logic shared by the API and the CLI
//! - `api`: HTTP services, JWT auth and middleware
//! - `interfaces`: Command-line interface
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod api;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
