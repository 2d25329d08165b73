//! Catalog service connection settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the catalog service lives and how long to wait for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, e.g. `http://localhost:8080/project_skills`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/project_skills".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}
