//! Bearer token storage with secure keychain persistence.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use curio_core::api::TokenProvider;

use crate::error::CliError;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "curio-cli";

/// Environment override consulted before the keychain, for scripting
const TOKEN_ENV_VAR: &str = "CURIO_TOKEN";

#[derive(Clone)]
struct TokenStore {
    username: String,
}

impl TokenStore {
    fn new(profile_name: &str) -> Self {
        Self {
            username: format!("api_token:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry, CliError> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| CliError::Auth(error.to_string()))
    }

    #[cfg(not(test))]
    fn load(&self) -> Result<Option<String>, CliError> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(raw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(CliError::Auth(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load(&self) -> Result<Option<String>, CliError> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        Ok(guard.get(&self.username).cloned())
    }

    #[cfg(not(test))]
    fn save(&self, token: &str) -> Result<(), CliError> {
        self.entry()?
            .set_password(token)
            .map_err(|error| CliError::Auth(error.to_string()))
    }

    #[cfg(test)]
    fn save(&self, token: &str) -> Result<(), CliError> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        guard.insert(self.username.clone(), token.to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn clear(&self) -> Result<(), CliError> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(CliError::Auth(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear(&self) -> Result<(), CliError> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Auth(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

/// Persist a bearer token for the given profile
pub fn store_token(profile_name: &str, token: &str) -> Result<(), CliError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CliError::Auth("token must not be empty".to_string()));
    }
    TokenStore::new(profile_name).save(token)
}

/// Load the stored bearer token for the given profile
pub fn load_token(profile_name: &str) -> Result<Option<String>, CliError> {
    TokenStore::new(profile_name).load()
}

/// Remove the stored bearer token for the given profile
pub fn clear_token(profile_name: &str) -> Result<(), CliError> {
    TokenStore::new(profile_name).clear()
}

/// Token source for API calls: `CURIO_TOKEN` first, then the keychain
/// entry of the active profile.
#[derive(Clone)]
pub struct CliTokenProvider {
    profile_name: String,
}

impl CliTokenProvider {
    #[must_use]
    pub const fn new(profile_name: String) -> Self {
        Self { profile_name }
    }
}

impl TokenProvider for CliTokenProvider {
    fn bearer_token(&self) -> Option<String> {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
        load_token(&self.profile_name).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_load_clear_round_trip() {
        store_token("round-trip", "secret-token").unwrap();
        assert_eq!(
            load_token("round-trip").unwrap().as_deref(),
            Some("secret-token")
        );

        clear_token("round-trip").unwrap();
        assert_eq!(load_token("round-trip").unwrap(), None);
    }

    #[test]
    fn store_token_rejects_empty_values() {
        assert!(store_token("empty", "   ").is_err());
    }

    #[test]
    fn provider_reads_stored_token() {
        store_token("provider-test", "stored-secret").unwrap();
        let provider = CliTokenProvider::new("provider-test".to_string());
        assert_eq!(provider.bearer_token().as_deref(), Some("stored-secret"));
        clear_token("provider-test").unwrap();
    }

    #[test]
    fn provider_returns_none_without_token() {
        let provider = CliTokenProvider::new("missing-profile".to_string());
        assert_eq!(provider.bearer_token(), None);
    }
}
