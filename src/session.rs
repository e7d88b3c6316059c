//! Access token persistence: OS keyring for real sessions, memory for tests.

use keyring::{Entry, Error as KeyringError};
use std::sync::{Arc, Mutex};

const KEYRING_SERVICE: &str = "dev.issuehub.client";
const KEYRING_ACCOUNT: &str = "session";

/// Storage for the access token that survives between runs.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, String>;
    fn save(&self, token: &str) -> Result<(), String>;
    fn clear(&self) -> Result<(), String>;
}

/// Keeps the access token in the platform keyring.
#[derive(Clone)]
pub struct KeyringTokenStore {
    service: String,
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new(KEYRING_SERVICE)
    }
}

impl KeyringTokenStore {
    pub fn new(service: impl Into<String>) -> Self {
        let service = service.into();
        let service = if service.trim().is_empty() {
            KEYRING_SERVICE.to_string()
        } else {
            service
        };
        Self { service }
    }

    fn entry(&self) -> Result<Entry, String> {
        Entry::new(&self.service, KEYRING_ACCOUNT)
            .map_err(|err| format!("Failed to open keyring entry: {err}"))
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<String>, String> {
        match self.entry()?.get_password() {
            Ok(secret) => Ok(normalize_token(&secret)),
            Err(KeyringError::NoEntry) => Ok(None),
            Err(err) => Err(format!("Failed to read session from keyring: {err}")),
        }
    }

    fn save(&self, token: &str) -> Result<(), String> {
        let token = normalize_token(token).ok_or("Access token must not be empty")?;
        self.entry()?
            .set_password(&token)
            .map_err(|err| format!("Failed to store session in keyring: {err}"))
    }

    fn clear(&self) -> Result<(), String> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(KeyringError::NoEntry) => Ok(()),
            Err(err) => Err(format!("Failed to delete session from keyring: {err}")),
        }
    }
}

/// Process-local token store.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, String> {
        let guard = self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(guard.as_deref().and_then(normalize_token))
    }

    fn save(&self, token: &str) -> Result<(), String> {
        let token = normalize_token(token).ok_or("Access token must not be empty")?;
        *self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token);
        Ok(())
    }

    fn clear(&self) -> Result<(), String> {
        *self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

fn normalize_token(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
