//! AES-256-GCM encryption of sensitive text fields.
//!
//! Envelope format: `base64(nonce(12) ‖ ciphertext ‖ tag(16))`.

use aes_gcm::aead::{Aead, AeadCore, OsRng};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::CodecError;
use crate::key::{self, KeyParams, SALT_LENGTH};

/// Nonce length for AES-GCM (96 bits).
pub const NONCE_LENGTH: usize = 12;

/// Authentication tag length for AES-GCM.
pub const TAG_LENGTH: usize = 16;

/// Encrypts and decrypts UTF-8 fields with a key derived once at construction.
///
/// The codec is immutable after construction; share it behind an `Arc`.
#[derive(Clone)]
pub struct FieldCodec {
    cipher: Aes256Gcm,
    salt: [u8; SALT_LENGTH],
}

impl std::fmt::Debug for FieldCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCodec").finish_non_exhaustive()
    }
}

impl FieldCodec {
    /// Creates a codec with a freshly generated salt.
    ///
    /// The salt must be persisted (see [`FieldCodec::encoded_salt`]) or data
    /// encrypted by this instance can never be decrypted again.
    pub fn new(secret: &str, params: KeyParams) -> Result<Self, CodecError> {
        Self::with_salt(secret, &key::generate_salt(), params)
    }

    /// Re-creates a codec from a previously persisted salt.
    pub fn with_salt(secret: &str, salt: &[u8], params: KeyParams) -> Result<Self, CodecError> {
        let derived = key::derive_key(secret.as_bytes(), salt, params)?;
        let cipher = Aes256Gcm::new_from_slice(&derived)
            .map_err(|e| CodecError::KeyDerivation(e.to_string()))?;

        let mut stored_salt = [0u8; SALT_LENGTH];
        stored_salt.copy_from_slice(salt);

        Ok(Self {
            cipher,
            salt: stored_salt,
        })
    }

    /// Re-creates a codec from a base64 salt.
    pub fn with_encoded_salt(
        secret: &str,
        salt: &str,
        params: KeyParams,
    ) -> Result<Self, CodecError> {
        let salt = key::decode_salt(salt)?;
        Self::with_salt(secret, &salt, params)
    }

    /// The key-derivation salt.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// The key-derivation salt, base64 encoded for persistence.
    pub fn encoded_salt(&self) -> String {
        key::encode_salt(&self.salt)
    }

    /// Encrypts `plaintext` under a fresh random nonce.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CodecError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CodecError::EncryptionFailed)?;

        let mut envelope = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(envelope))
    }

    /// Decrypts an envelope produced by [`FieldCodec::encrypt`].
    ///
    /// Every failure is reported as [`CodecError::DecryptionFailed`] and no
    /// partial plaintext is ever returned.
    pub fn decrypt(&self, encoded: &str) -> Result<String, CodecError> {
        let envelope = STANDARD
            .decode(encoded)
            .map_err(|_| CodecError::DecryptionFailed)?;

        if envelope.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(CodecError::DecryptionFailed);
        }

        let (nonce, ciphertext) = envelope.split_at(NONCE_LENGTH);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CodecError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| CodecError::DecryptionFailed)
    }
}
