//! # famli-crypto
//!
//! Symmetric encryption of sensitive text fields.
//!
//! - `key`: Argon2id key derivation from an operator secret and a persisted salt
//! - `codec`: AES-256-GCM encrypt/decrypt to and from a base64 envelope

pub mod codec;
pub mod error;
pub mod key;

pub use codec::FieldCodec;
pub use error::CodecError;
pub use key::{KeyParams, SALT_LENGTH};
