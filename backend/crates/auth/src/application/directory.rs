//! Credential Directory
//!
//! The fixed set of accounts that may sign in. Passwords are hashed once
//! when the directory is built and only the hashes are kept.

use std::collections::HashMap;

use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::config::AuthConfig;
use crate::domain::value_object::{email::Email, role::Role};
use crate::error::{AuthError, AuthResult};

struct DirectoryEntry {
    password_hash: HashedPassword,
    role: Role,
}

pub struct CredentialDirectory {
    entries: HashMap<Email, DirectoryEntry>,
    pepper: Option<Vec<u8>>,
}

impl CredentialDirectory {
    /// Hash every configured account
    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        let mut entries = HashMap::with_capacity(config.accounts.len());

        for account in &config.accounts {
            let email = Email::new(&account.email).map_err(|e| {
                AuthError::Internal(format!("bad directory email {}: {e}", account.email))
            })?;
            let password = ClearTextPassword::new(account.password.clone()).map_err(|e| {
                AuthError::Internal(format!("bad directory password for {email}: {e}"))
            })?;

            let password_hash = password.hash(config.pepper())?;
            entries.insert(
                email,
                DirectoryEntry {
                    password_hash,
                    role: account.role,
                },
            );
        }

        tracing::info!(accounts = entries.len(), "Credential directory ready");

        Ok(Self {
            entries,
            pepper: config.password_pepper.clone(),
        })
    }

    /// Role for a matching email/password pair
    pub fn authenticate(&self, email: &Email, password: &ClearTextPassword) -> Option<Role> {
        let entry = self.entries.get(email)?;
        entry
            .password_hash
            .verify(password, self.pepper.as_deref())
            .then_some(entry.role)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
