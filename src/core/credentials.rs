//! Gateway credential storage.
//!
//! Credentials live in the system keyring under service `commdash`, one entry
//! per fixed key. `COMMDASH_VOICE_USER_ID` / `COMMDASH_VOICE_PASSWORD` take
//! precedence when set, for hosts without a keyring.

use std::sync::Mutex;

use crate::error::{CommdashError, Result};

/// Keyring service name.
pub const KEYRING_SERVICE: &str = "commdash";
/// Storage key for the gateway user id.
pub const USER_ID_KEY: &str = "UNIFY_VOICE_USER_ID";
/// Storage key for the gateway password.
pub const PASSWORD_KEY: &str = "UNIFY_VOICE_PASSWORD";

/// Environment override for the user id.
pub const ENV_USER_ID: &str = "COMMDASH_VOICE_USER_ID";
/// Environment override for the password.
pub const ENV_PASSWORD: &str = "COMMDASH_VOICE_PASSWORD";

/// Gateway user id and password.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct GatewayCredentials {
    pub user_id: String,
    pub password: String,
}

impl GatewayCredentials {
    #[must_use]
    pub fn new(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            password: password.into(),
        }
    }

    /// Whether both halves are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.user_id.is_empty() && !self.password.is_empty()
    }

    /// Password with everything but its length hidden.
    #[must_use]
    pub fn masked_password(&self) -> String {
        if self.password.is_empty() {
            "(not set)".to_string()
        } else {
            "*".repeat(self.password.chars().count().min(12))
        }
    }
}

/// Displayable view of stored credentials; never holds the password.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
    pub user_id: String,
    pub password: String,
    pub configured: bool,
}

impl From<&GatewayCredentials> for CredentialSummary {
    fn from(credentials: &GatewayCredentials) -> Self {
        Self {
            user_id: credentials.user_id.clone(),
            password: credentials.masked_password(),
            configured: credentials.is_complete(),
        }
    }
}

impl std::fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Persistent key-value storage for gateway credentials.
pub trait CredentialStore {
    /// Load credentials. Missing entries read as empty strings.
    ///
    /// # Errors
    ///
    /// Returns `Credential` if the backing store is unreadable.
    fn load(&self) -> Result<GatewayCredentials>;

    /// Persist credentials.
    ///
    /// # Errors
    ///
    /// Returns `Credential` if the backing store rejects the write.
    fn save(&self, credentials: &GatewayCredentials) -> Result<()>;

    /// Remove stored credentials. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Credential` if the backing store rejects the delete.
    fn clear(&self) -> Result<()>;
}

// =============================================================================
// Keyring
// =============================================================================

/// System keyring store.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringStore;

impl KeyringStore {
    fn entry(key: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(KEYRING_SERVICE, key)
            .map_err(|e| CommdashError::Credential(format!("keyring error: {e}")))
    }

    fn read(key: &str, env_var: &str) -> Result<String> {
        if let Some(value) = std::env::var(env_var).ok().filter(|v| !v.is_empty()) {
            tracing::debug!(key, "Using credential from environment");
            return Ok(value);
        }

        match Self::entry(key)?.get_password() {
            Ok(value) => Ok(value),
            Err(keyring::Error::NoEntry) => Ok(String::new()),
            Err(e) => Err(CommdashError::Credential(format!("failed to read {key}: {e}"))),
        }
    }

    fn delete(key: &str) -> Result<()> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CommdashError::Credential(format!("failed to delete {key}: {e}"))),
        }
    }
}

impl CredentialStore for KeyringStore {
    fn load(&self) -> Result<GatewayCredentials> {
        Ok(GatewayCredentials {
            user_id: Self::read(USER_ID_KEY, ENV_USER_ID)?,
            password: Self::read(PASSWORD_KEY, ENV_PASSWORD)?,
        })
    }

    fn save(&self, credentials: &GatewayCredentials) -> Result<()> {
        for (key, value) in [
            (USER_ID_KEY, &credentials.user_id),
            (PASSWORD_KEY, &credentials.password),
        ] {
            Self::entry(key)?
                .set_password(value)
                .map_err(|e| CommdashError::Credential(format!("failed to store {key}: {e}")))?;
        }
        tracing::debug!("Gateway credentials stored in keyring");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        Self::delete(USER_ID_KEY)?;
        Self::delete(PASSWORD_KEY)
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Process-local store, used by tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<GatewayCredentials>,
}

impl MemoryStore {
    #[must_use]
    pub fn with(credentials: GatewayCredentials) -> Self {
        Self {
            inner: Mutex::new(credentials),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, GatewayCredentials>> {
        self.inner
            .lock()
            .map_err(|_| CommdashError::Credential("credential store poisoned".to_string()))
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<GatewayCredentials> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, credentials: &GatewayCredentials) -> Result<()> {
        *self.lock()? = credentials.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = GatewayCredentials::default();
        Ok(())
    }
}
