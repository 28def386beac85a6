//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Session signing and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for session token signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Session lifetime after a password login, in hours.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: u64,
    /// Session lifetime after an OAuth login, in hours.
    #[serde(default = "default_oauth_session_ttl")]
    pub oauth_session_ttl_hours: u64,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Argon2 memory cost for password and PIN hashes, in KiB.
    #[serde(default = "default_hash_memory")]
    pub hash_memory_kib: u32,
    /// Argon2 iteration count for password and PIN hashes.
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,
    /// Argon2 parallelism for password and PIN hashes.
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            session_ttl_hours: default_session_ttl(),
            oauth_session_ttl_hours: default_oauth_session_ttl(),
            cookie_name: default_cookie_name(),
            password_min_length: default_password_min(),
            hash_memory_kib: default_hash_memory(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_session_ttl() -> u64 {
    24
}

fn default_oauth_session_ttl() -> u64 {
    24 * 7
}

fn default_cookie_name() -> String {
    "famli_session".to_string()
}

fn default_password_min() -> usize {
    8
}

fn default_hash_memory() -> u32 {
    19 * 1024
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}
