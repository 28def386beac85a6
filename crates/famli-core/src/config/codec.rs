//! Sensitive-field codec configuration.

use serde::{Deserialize, Serialize};

/// Key material and Argon2id parameters for sensitive-field encryption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Operator-supplied secret the encryption key is derived from.
    #[serde(default = "default_secret")]
    pub secret: String,
    /// Base64 salt. When unset the salt is read from (or created at) `salt_path`.
    #[serde(default)]
    pub salt: Option<String>,
    /// File holding the persisted key-derivation salt.
    #[serde(default = "default_salt_path")]
    pub salt_path: String,
    /// Argon2id memory cost in KiB.
    #[serde(default = "default_memory")]
    pub memory_kib: u32,
    /// Argon2id iteration count.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Argon2id parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            salt: None,
            salt_path: default_salt_path(),
            memory_kib: default_memory(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_salt_path() -> String {
    "data/codec.salt".to_string()
}

fn default_memory() -> u32 {
    64 * 1024
}

fn default_iterations() -> u32 {
    3
}

fn default_parallelism() -> u32 {
    4
}
