//! Session cookie construction.

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Duration;
use time::OffsetDateTime;

use famli_core::config::AuthConfig;

/// Builds the cookies that carry and clear the session token.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    name: String,
}

impl SessionCookies {
    /// Creates a builder for the cookie named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Creates a builder from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.cookie_name.clone())
    }

    /// The cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A cookie carrying `token` for `ttl`.
    ///
    /// `secure` should only be set when the request arrived over TLS.
    pub fn issue(&self, token: String, ttl: Duration, secure: bool) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(time::Duration::seconds(ttl.num_seconds()))
            .secure(secure)
            .build()
    }

    /// A cookie that overwrites and expires the session cookie.
    pub fn clear(&self, secure: bool) -> Cookie<'static> {
        Cookie::build((self.name.clone(), String::new()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(time::Duration::ZERO)
            .expires(OffsetDateTime::UNIX_EPOCH)
            .secure(secure)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_cookie_flags() {
        let cookie = SessionCookies::new("famli_session").issue(
            "tok".to_string(),
            Duration::hours(24),
            false,
        );
        let header = cookie.to_string();

        assert!(header.starts_with("famli_session=tok"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Max-Age=86400"));
        assert!(!header.contains("Secure"));
    }

    #[test]
    fn test_secure_flag_follows_transport() {
        let cookie = SessionCookies::new("s").issue("t".to_string(), Duration::hours(1), true);
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = SessionCookies::new("famli_session").clear(false);
        let header = cookie.to_string();

        assert!(header.starts_with("famli_session=;"));
        assert!(header.contains("Max-Age=0"));
        assert!(header.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }
}
