//! Codec error type.

use famli_core::error::{AppError, ErrorKind};
use thiserror::Error;

/// Errors produced by the sensitive-field codec.
///
/// Decryption has exactly one failure variant so callers cannot tell a bad
/// envelope from a failed authentication tag.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The salt is not the expected size or encoding.
    #[error("invalid salt: {0}")]
    InvalidSalt(String),

    /// Argon2id rejected the parameters or failed to derive a key.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// AEAD encryption failed.
    #[error("encryption failed")]
    EncryptionFailed,

    /// The ciphertext could not be decoded, authenticated, or decrypted.
    #[error("decryption failed")]
    DecryptionFailed,
}

impl From<CodecError> for AppError {
    fn from(err: CodecError) -> Self {
        AppError::with_source(ErrorKind::Internal, err.to_string(), err)
    }
}
