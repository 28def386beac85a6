//! Share link configuration.

use serde::{Deserialize, Serialize};

/// Public share URL settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Public origin of the frontend, e.g. `https://famli.app`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path segment under which shared views are served.
    #[serde(default = "default_path")]
    pub path: String,
}

impl ShareConfig {
    /// Builds the public URL for a share token.
    pub fn url_for(&self, token: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_matches('/'),
            token
        )
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path: default_path(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_path() -> String {
    "compartilhado".to_string()
}
