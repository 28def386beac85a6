//! Argon2id key derivation for the field codec.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use famli_core::config::CodecConfig;

use crate::error::CodecError;

/// Salt length in bytes (128 bits).
pub const SALT_LENGTH: usize = 16;

/// Derived key length for AES-256 (32 bytes).
pub const KEY_LENGTH: usize = 32;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Iteration count.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for KeyParams {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl From<&CodecConfig> for KeyParams {
    fn from(config: &CodecConfig) -> Self {
        Self {
            memory_kib: config.memory_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }
}

/// Generates a fresh random salt.
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    rand::random()
}

/// Encodes a salt for persistence.
pub fn encode_salt(salt: &[u8]) -> String {
    STANDARD.encode(salt)
}

/// Decodes a persisted salt, checking its length.
pub fn decode_salt(encoded: &str) -> Result<[u8; SALT_LENGTH], CodecError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| CodecError::InvalidSalt(e.to_string()))?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        CodecError::InvalidSalt(format!(
            "expected {SALT_LENGTH} bytes, got {}",
            bytes.len()
        ))
    })
}

/// Derives a 256-bit key from `secret` and `salt` with Argon2id.
pub fn derive_key(
    secret: &[u8],
    salt: &[u8],
    params: KeyParams,
) -> Result<[u8; KEY_LENGTH], CodecError> {
    if salt.len() != SALT_LENGTH {
        return Err(CodecError::InvalidSalt(format!(
            "expected {SALT_LENGTH} bytes, got {}",
            salt.len()
        )));
    }

    let argon_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(KEY_LENGTH),
    )
    .map_err(|e| CodecError::KeyDerivation(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut key = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(secret, salt, &mut key)
        .map_err(|e| CodecError::KeyDerivation(e.to_string()))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIGHT: KeyParams = KeyParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn test_derivation_is_deterministic_for_same_salt() {
        let salt = generate_salt();
        let a = derive_key(b"secret", &salt, LIGHT).unwrap();
        let b = derive_key(b"secret", &salt, LIGHT).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_salts_give_different_keys() {
        let a = derive_key(b"secret", &generate_salt(), LIGHT).unwrap();
        let b = derive_key(b"secret", &generate_salt(), LIGHT).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_short_salt_is_rejected() {
        let err = derive_key(b"secret", &[0u8; 8], LIGHT).unwrap_err();
        assert!(matches!(err, CodecError::InvalidSalt(_)));
    }

    #[test]
    fn test_salt_encoding_round_trips() {
        let salt = generate_salt();
        assert_eq!(decode_salt(&encode_salt(&salt)).unwrap(), salt);
        assert!(decode_salt("c2hvcnQ=").is_err());
    }

    #[test]
    fn test_default_params_follow_recommended_costs() {
        let params = KeyParams::default();
        assert_eq!(params.iterations, 3);
        assert_eq!(params.memory_kib, 65536);
        assert_eq!(params.parallelism, 4);
    }
}
