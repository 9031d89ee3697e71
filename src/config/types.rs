use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::ReconcileMode;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Catalog API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the API; `/products` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Deadline for a whole fetch, in seconds (default: 10).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Re-filter and re-sort every page on the client (default: false).
    #[serde(default)]
    pub client_fallback: bool,
}

fn default_base_url() -> String {
    "https://api.redseam.redberryinternship.ge/api".to_string()
}

fn default_request_timeout() -> u32 {
    10
}

fn default_connect_timeout() -> u32 {
    5
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            client_fallback: false,
        }
    }
}

impl CatalogConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.request_timeout_seconds))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_seconds))
    }

    pub fn reconcile_mode(&self) -> ReconcileMode {
        if self.client_fallback {
            ReconcileMode::ClientFallback
        } else {
            ReconcileMode::TrustServer
        }
    }
}
