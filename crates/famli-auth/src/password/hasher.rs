//! Argon2id hashing for passwords and share-link PINs.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use famli_core::config::AuthConfig;
use famli_core::error::AppError;

/// Hashes and verifies secrets into PHC strings using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    #[cfg(test)]
    verifications: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl PasswordHasher {
    /// Creates a hasher with the cost parameters from configuration.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        let params = Params::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
            None,
        )
        .map_err(|e| AppError::internal(format!("Invalid password hash parameters: {e}")))?;

        Ok(Self {
            params,
            #[cfg(test)]
            verifications: Default::default(),
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext secret with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext secret against a stored hash.
    ///
    /// Returns `Ok(true)` if it matches, `Ok(false)` if not. The cost
    /// parameters are read from the stored hash.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        #[cfg(test)]
        self.verifications
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

/// Number of `verify_password` calls made through this hasher or its clones.
#[cfg(test)]
pub(crate) fn verification_count(hasher: &PasswordHasher) -> usize {
    hasher
        .verifications
        .load(std::sync::atomic::Ordering::SeqCst)
}
