//! Configuration module
//!
//! - types/: configuration types (Config, ApiConfig, BoardConfig, LogConfig)
//! - io.rs: configuration loading and saving
//! - validation.rs: configuration validation
//! - paths.rs: configuration file paths

mod io;
mod paths;
mod types;
mod validation;

pub use types::api::ApiConfig;
pub use types::{BoardConfig, Config, LogConfig, LogFormat};

pub use io::{
    apply_env_overrides, load_config, load_config_from_path, read_config_snapshot, save_config,
    ConfigSnapshot,
};
pub use paths::{config_dir, config_path, state_dir};
pub use validation::{validate_config, ConfigValidationResult, ValidationIssue};
