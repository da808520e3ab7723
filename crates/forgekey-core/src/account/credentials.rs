//! Secure token storage.
//!
//! Tokens live outside the account database. [`KeyringTokenStore`] keeps
//! them in the platform's native credential storage:
//! - Linux: Secret Service (GNOME Keyring, `KWallet`)
//! - macOS: Keychain
//! - Windows: Credential Manager

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use keyring::Entry;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use super::AccountId;

/// Service name used for keyring entries.
const SERVICE_NAME: &str = "forgekey";

/// Credential type identifier for access tokens.
const TOKEN_CREDENTIAL: &str = "token";

/// Error type for credential operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Failed to access keyring.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type for credential operations.
pub type CredentialResult<T> = std::result::Result<T, CredentialError>;

/// Storage for per-account secret tokens.
pub trait TokenStore: Send + Sync {
    /// Retrieves the token for an account, `None` if none is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get_token(&self, account_id: AccountId) -> CredentialResult<Option<SecretString>>;

    /// Stores (or replaces) the token for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn store_token(&self, account_id: AccountId, token: &SecretString) -> CredentialResult<()>;

    /// Deletes the token for an account. Missing tokens are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn delete_token(&self, account_id: AccountId) -> CredentialResult<()>;
}

/// Generates the keyring entry key for a credential.
fn credential_key(account_id: AccountId, credential_type: &str) -> String {
    format!("{SERVICE_NAME}_{credential_type}_{}", account_id.0)
}

/// Token store backed by the system keyring.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    fn entry(account_id: AccountId) -> CredentialResult<Entry> {
        let key = credential_key(account_id, TOKEN_CREDENTIAL);
        Ok(Entry::new(SERVICE_NAME, &key)?)
    }
}

impl TokenStore for KeyringTokenStore {
    fn get_token(&self, account_id: AccountId) -> CredentialResult<Option<SecretString>> {
        match Self::entry(account_id)?.get_password() {
            Ok(token) => Ok(Some(SecretString::from(token))),
            Err(keyring::Error::NoEntry) => {
                debug!("No token found for account {account_id}");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn store_token(&self, account_id: AccountId, token: &SecretString) -> CredentialResult<()> {
        let entry = Self::entry(account_id)?;
        entry.set_password(token.expose_secret())?;
        debug!("Stored token for account {account_id}");
        Ok(())
    }

    fn delete_token(&self, account_id: AccountId) -> CredentialResult<()> {
        match Self::entry(account_id)?.delete_credential() {
            Ok(()) => {
                debug!("Deleted token for account {account_id}");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No token to delete for account {account_id}");
                Ok(())
            }
            Err(e) => {
                warn!("Failed to delete token: {e}");
                Err(e.into())
            }
        }
    }
}

/// In-process token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<AccountId, SecretString>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get_token(&self, account_id: AccountId) -> CredentialResult<Option<SecretString>> {
        let tokens = self.tokens.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tokens.get(&account_id).cloned())
    }

    fn store_token(&self, account_id: AccountId, token: &SecretString) -> CredentialResult<()> {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        tokens.insert(account_id, token.clone());
        Ok(())
    }

    fn delete_token(&self, account_id: AccountId) -> CredentialResult<()> {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        tokens.remove(&account_id);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn credential_key_format() {
        assert_eq!(
            credential_key(AccountId::new(42), TOKEN_CREDENTIAL),
            "forgekey_token_42"
        );
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        let id = AccountId::new(1);

        assert!(store.get_token(id).unwrap().is_none());

        let secret = SecretString::from("ghp_abc".to_string());
        store.store_token(id, &secret).unwrap();
        let token = store.get_token(id).unwrap().unwrap();
        assert_eq!(token.expose_secret(), "ghp_abc");

        store.delete_token(id).unwrap();
        assert!(store.get_token(id).unwrap().is_none());
    }

    #[test]
    fn memory_store_delete_missing_is_ok() {
        let store = MemoryTokenStore::new();
        store.delete_token(AccountId::new(5)).unwrap();
    }

    // These interact with the actual system keyring.
    // Run manually with `cargo test -- --ignored`
    #[test]
    #[ignore = "Interacts with system keyring"]
    fn keyring_store_and_retrieve_token() {
        let store = KeyringTokenStore;
        let id = AccountId::new(99999); // Use high ID to avoid conflicts

        let secret = SecretString::from("test_token_12345".to_string());
        store.store_token(id, &secret).unwrap();
        let token = store.get_token(id).unwrap().unwrap();
        assert_eq!(token.expose_secret(), "test_token_12345");

        store.delete_token(id).unwrap();
        assert!(store.get_token(id).unwrap().is_none());
    }
}
