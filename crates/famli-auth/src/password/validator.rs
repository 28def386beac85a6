//! Password policy enforcement for new passwords.

use famli_core::config::AuthConfig;
use famli_core::error::AppError;

/// Maximum accepted password length, in bytes.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a new password.
    ///
    /// `user_inputs` (email, name) are penalized by the strength estimator.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if password.len() > MAX_PASSWORD_LENGTH {
            return Err(AppError::validation(format!(
                "Password must be at most {MAX_PASSWORD_LENGTH} characters long"
            )));
        }

        let estimate = zxcvbn::zxcvbn(password, user_inputs);
        if estimate.score() < zxcvbn::Score::Two {
            return Err(AppError::validation(
                "Password is too weak. Please use a stronger password.",
            ));
        }

        Ok(())
    }
}
