//! Identity provider enum.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How an account authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthProvider {
    /// Email and password.
    Email,
    /// Sign in with Google.
    Google,
    /// Sign in with Apple.
    Apple,
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Google => write!(f, "google"),
            Self::Apple => write!(f, "apple"),
        }
    }
}
