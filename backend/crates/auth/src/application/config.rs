//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

use crate::domain::value_object::role::Role;

/// A directory entry, hashed at startup
#[derive(Clone)]
pub struct MockAccount {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl MockAccount {
    pub fn new(email: &str, password: &str, role: Role) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            role,
        }
    }
}

impl std::fmt::Debug for MockAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAccount")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Cookie lifetime; `None` leaves it a browser-session cookie
    pub cookie_max_age: Option<Duration>,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Accounts allowed to sign in
    pub accounts: Vec<MockAccount>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "newshub_session".to_string(),
            session_secret: [0u8; 32],
            cookie_max_age: None,
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            accounts: vec![
                MockAccount::new("admin@newshub.com", "admin123", Role::Admin),
                MockAccount::new("manager@newshub.com", "manager123", Role::Manager),
            ],
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Cookie attributes for the session cookie
    pub fn cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: self.cookie_max_age.map(|age| age.as_secs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accounts() {
        let config = AuthConfig::default();
        let roles: Vec<_> = config
            .accounts
            .iter()
            .map(|a| (a.email.as_str(), a.role))
            .collect();
        assert_eq!(
            roles,
            vec![
                ("admin@newshub.com", Role::Admin),
                ("manager@newshub.com", Role::Manager)
            ]
        );
    }

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development();
        assert!(!config.cookie_secure);
        assert_ne!(config.session_secret, [0u8; 32]);
    }

    #[test]
    fn test_cookie_attributes() {
        let mut config = AuthConfig::default();
        assert_eq!(
            config.cookie().build_set_cookie("tok"),
            "newshub_session=tok; HttpOnly; Secure; SameSite=Lax; Path=/"
        );

        config.cookie_max_age = Some(Duration::from_secs(3600));
        assert!(config.cookie().build_set_cookie("tok").ends_with("Max-Age=3600"));
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let debug = format!("{:?}", AuthConfig::default());
        assert!(!debug.contains("admin123"));
    }
}
