use super::{AuthError, Result};
use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::RwLock;
use subtle::ConstantTimeEq;
use tracing::{debug, info};
use zeroize::Zeroize;

/// Source of truth for username/password checks.
///
/// Token issuance happens only after a store has accepted the credentials.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Create an account. Fails with `UserExists` if the name is taken.
    fn register(&self, username: &str, password: &str) -> Result<()>;

    /// Check a password. Unknown users yield `Ok(false)`, not an error.
    fn verify_password(&self, username: &str, password: &str) -> Result<bool>;
}

// ============================================================================
// Stored Credential
// ============================================================================

const SALT_LEN: usize = 16;

/// Internal representation of a stored password
#[derive(Debug, Clone)]
struct StoredCredential {
    /// Per-user random salt
    salt: [u8; SALT_LEN],
    /// SHA-256(salt || password) (we never store the raw password)
    password_hash: [u8; 32],
    /// When the account was created
    created_at: DateTime<Utc>,
}

/// Hash a password with its salt using SHA-256
fn hash_password(salt: &[u8; SALT_LEN], password: &str) -> [u8; 32] {
    let mut material = Vec::with_capacity(SALT_LEN + password.len());
    material.extend_from_slice(salt);
    material.extend_from_slice(password.as_bytes());

    let mut hasher = Sha256::new();
    hasher.update(&material);
    material.zeroize();

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&hasher.finalize());
    hash
}

fn handle_lock_poison<T>(e: std::sync::PoisonError<T>) -> AuthError {
    AuthError::Internal(format!("Lock poisoned: {}", e))
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local credential store with salted SHA-256 password hashes.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    /// username → StoredCredential
    users: RwLock<HashMap<String, StoredCredential>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered accounts
    pub fn user_count(&self) -> usize {
        self.users.read().map(|users| users.len()).unwrap_or(0)
    }

    /// When `username` registered, if it exists
    pub fn created_at(&self, username: &str) -> Option<DateTime<Utc>> {
        self.users
            .read()
            .ok()
            .and_then(|users| users.get(username).map(|u| u.created_at))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn register(&self, username: &str, password: &str) -> Result<()> {
        if username.trim().is_empty() {
            return Err(AuthError::InvalidInput("username must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidInput("password must not be empty".to_string()));
        }

        let mut users = self.users.write().map_err(handle_lock_poison)?;
        if users.contains_key(username) {
            return Err(AuthError::UserExists(username.to_string()));
        }

        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        users.insert(
            username.to_string(),
            StoredCredential {
                salt,
                password_hash: hash_password(&salt, password),
                created_at: Utc::now(),
            },
        );

        info!(username = %username, "Credentials stored");
        Ok(())
    }

    fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let users = self.users.read().map_err(handle_lock_poison)?;

        let Some(stored) = users.get(username) else {
            // Hash anyway so unknown users cost the same as wrong passwords
            let _ = hash_password(&[0u8; SALT_LEN], password);
            debug!(username = %username, "Unknown user");
            return Ok(false);
        };

        let candidate = hash_password(&stored.salt, password);
        Ok(stored.password_hash.ct_eq(&candidate).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_user_gets_own_salt() {
        let store = InMemoryCredentialStore::new();
        store.register("alice", "same").unwrap();
        store.register("bob", "same").unwrap();

        let users = store.users.read().unwrap();
        assert_ne!(users["alice"].salt, users["bob"].salt);
        assert_ne!(users["alice"].password_hash, users["bob"].password_hash);
    }

    #[test]
    fn test_hash_depends_on_salt_and_password() {
        let salt = [1u8; SALT_LEN];
        assert_eq!(hash_password(&salt, "pw"), hash_password(&salt, "pw"));
        assert_ne!(hash_password(&salt, "pw"), hash_password(&salt, "pw2"));
        assert_ne!(
            hash_password(&salt, "pw"),
            hash_password(&[2u8; SALT_LEN], "pw")
        );
    }
}
