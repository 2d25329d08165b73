//! Configuration validation
//!
//! Validates configuration and reports issues.

use super::types::Config;

/// Result of configuration validation
#[derive(Debug, Clone)]
pub struct ConfigValidationResult {
    /// Whether the config is valid
    pub valid: bool,
    /// Validation errors (critical)
    pub errors: Vec<ValidationIssue>,
    /// Validation warnings (non-critical)
    pub warnings: Vec<ValidationIssue>,
}

impl ConfigValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        ConfigValidationResult {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error
    pub fn with_error(mut self, issue: ValidationIssue) -> Self {
        self.valid = false;
        self.errors.push(issue);
        self
    }

    /// Add a warning
    pub fn with_warning(mut self, issue: ValidationIssue) -> Self {
        self.warnings.push(issue);
        self
    }
}

/// A validation issue
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the config field
    pub path: String,
    /// Issue message
    pub message: String,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Create a new issue
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Validate the configuration
pub fn validate_config(config: &Config) -> ConfigValidationResult {
    let mut result = ConfigValidationResult::valid();

    result = validate_api_config(config, result);
    result = validate_board_config(config, result);

    result
}

fn validate_api_config(config: &Config, mut result: ConfigValidationResult) -> ConfigValidationResult {
    match url::Url::parse(&config.api.base_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result = result.with_error(
                    ValidationIssue::new(
                        "api.base_url",
                        format!("Unsupported URL scheme: {}", url.scheme()),
                    )
                    .with_suggestion("Use an http:// or https:// URL"),
                );
            } else if url.scheme() == "http" && !is_local(&url) {
                result = result.with_warning(
                    ValidationIssue::new(
                        "api.base_url",
                        "Credentials will be sent over plain HTTP",
                    )
                    .with_suggestion("Use https:// for remote catalog services"),
                );
            }
        }
        Err(e) => {
            result = result.with_error(
                ValidationIssue::new("api.base_url", format!("Invalid URL: {}", e))
                    .with_suggestion("Set SKILLDESK_API_URL or api.base_url in config"),
            );
        }
    }

    if config.api.timeout.is_zero() {
        result = result.with_error(
            ValidationIssue::new("api.timeout", "Timeout must be greater than zero")
                .with_suggestion("Use a duration such as \"30s\""),
        );
    }

    result
}

fn validate_board_config(config: &Config, mut result: ConfigValidationResult) -> ConfigValidationResult {
    if config.board.page_size == 0 {
        result = result.with_error(
            ValidationIssue::new("board.page_size", "Page size must be at least 1")
                .with_suggestion("Remove board.page_size to use the default of 8"),
        );
    }

    result
}

fn is_local(url: &url::Url) -> bool {
    matches!(url.host_str(), Some("localhost") | Some("127.0.0.1") | Some("::1") | Some("[::1]"))
}
