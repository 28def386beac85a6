//! Share link token generation and URLs.

use sha2::{Digest, Sha256};

use famli_core::config::ShareConfig;

/// Length of a share token in hex characters.
pub const TOKEN_LENGTH: usize = 32;

/// Generates share tokens and the public URLs that carry them.
#[derive(Debug, Clone)]
pub struct LinkService {
    config: ShareConfig,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(config: ShareConfig) -> Self {
        Self { config }
    }

    /// Generates a token from 256 bits of CSPRNG output.
    pub fn generate_token(&self) -> String {
        let seed: [u8; 32] = rand::random();
        let digest = Sha256::digest(seed);
        let mut token = hex::encode(digest);
        token.truncate(TOKEN_LENGTH);
        token
    }

    /// Whether `token` has the shape of a generated token.
    pub fn is_well_formed(token: &str) -> bool {
        token.len() == TOKEN_LENGTH && token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Public URL for `token`.
    pub fn url_for(&self, token: &str) -> String {
        self.config.url_for(token)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_tokens_are_32_lowercase_hex_chars() {
        let service = LinkService::new(ShareConfig::default());
        for _ in 0..100 {
            let token = service.generate_token();
            assert!(LinkService::is_well_formed(&token), "bad token {token}");
        }
    }

    #[test]
    fn test_tokens_do_not_repeat() {
        let service = LinkService::new(ShareConfig::default());
        let tokens: HashSet<_> = (0..1000).map(|_| service.generate_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_malformed_tokens_are_detected() {
        assert!(!LinkService::is_well_formed("abc"));
        assert!(!LinkService::is_well_formed(&"G".repeat(32)));
        assert!(!LinkService::is_well_formed(&"A".repeat(32)));
    }
}
