//! Client configuration.

use std::env;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.nationalize.io";

pub const BASE_URL_ENV: &str = "NATIONALIZE_BASE_URL";
pub const API_KEY_ENV: &str = "NATIONALIZE_API_KEY";

/// Settings fixed at client construction.
///
/// An empty `api_key` means no `apikey` parameter is sent. `base_url` is not
/// validated here; a malformed value fails the first request instead.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `NATIONALIZE_BASE_URL` and `NATIONALIZE_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Some(api_key) = lookup(API_KEY_ENV) {
            config.api_key = api_key;
        }
        config
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.has_api_key() { "<redacted>" } else { "" })
            .finish()
    }
}
