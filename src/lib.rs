//! # Skilldesk
//!
//! Administrative client for an organization's catalog of skill records.
//!
//! ## Features
//!
//! - **Remote source of truth:** every record lives in the catalog service;
//!   local state only mirrors what the service confirmed
//! - **Search and paging:** case-insensitive search over name, description
//!   and technology, eight skills per page
//! - **Write-through mutations:** create, edit, photo upload and delete
//! - **Session handling:** bearer credential set on login, cleared on logout

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod session;

pub use config::Config;
pub use error::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = env!("CARGO_PKG_NAME");
