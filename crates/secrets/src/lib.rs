//! Two-tier credential read: an optional biometric-gated helper first, the
//! platform keystore second. Every read goes all the way to the backend —
//! there is no in-memory cache, so credential rotation in the backend takes
//! effect on the very next request.

mod biometric;
mod keystore;

use agentauth_types::{AgentAuthError, Result, SecretStore};
use async_trait::async_trait;
use secrecy::SecretString;
use std::path::PathBuf;

/// [`SecretStore`] backed by the biometric helper (if present) and the
/// platform keystore.
pub struct KeystoreAdapter {
    helper_path: Option<PathBuf>,
}

impl KeystoreAdapter {
    /// Probes for the biometric helper once and builds the adapter around
    /// whatever it finds.
    #[must_use]
    pub fn new() -> Self {
        let helper_path = biometric::discover();
        if let Some(path) = &helper_path {
            tracing::info!(helper = %path.display(), "biometric helper detected");
        }
        Self { helper_path }
    }
}

impl Default for KeystoreAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretStore for KeystoreAdapter {
    async fn read(&self, id: &str) -> Result<SecretString> {
        if let Some(helper) = &self.helper_path {
            if let Some(secret) = biometric::read(helper, id).await {
                return Ok(secret);
            }
        }

        keystore::read(id).await
    }
}

/// In-memory [`SecretStore`] test double: no subprocess, no keyring, just a
/// map. Used by the proxy crate's router tests.
///
/// Holds the credential as a plain `String` rather than a [`SecretString`]
/// internally — `secrecy` deliberately does not implement `Clone` for its
/// wrapper types, so a fresh `SecretString` is minted on every [`Self::read`]
/// instead of cloning one out of the map.
#[derive(Default)]
pub struct InMemorySecretStore {
    entries: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

impl InMemorySecretStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the credential stored under `id`.
    pub fn set(&self, id: impl Into<String>, secret: impl Into<String>) {
        self.entries.lock().unwrap().insert(id.into(), secret.into());
    }

    /// Removes any credential stored under `id`.
    pub fn remove(&self, id: &str) {
        self.entries.lock().unwrap().remove(id);
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn read(&self, id: &str) -> Result<SecretString> {
        self.entries
            .lock()
            .unwrap()
            .get(id)
            .map(|s| SecretString::from(s.clone()))
            .ok_or_else(|| AgentAuthError::CredentialNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[tokio::test]
    async fn test_in_memory_store_returns_set_credential() {
        let store = InMemorySecretStore::new();
        store.set("openai", "sk-test-123");
        let secret = store.read("openai").await.unwrap();
        assert_eq!(secret.expose_secret(), "sk-test-123");
    }

    #[tokio::test]
    async fn test_in_memory_store_missing_credential_errors() {
        let store = InMemorySecretStore::new();
        let err = store.read("openai").await.unwrap_err();
        assert!(matches!(err, AgentAuthError::CredentialNotFound(id) if id == "openai"));
    }

    #[tokio::test]
    async fn test_in_memory_store_rotation_takes_effect_immediately() {
        let store = InMemorySecretStore::new();
        store.set("anthropic", "old-key");
        store.set("anthropic", "new-key");
        let secret = store.read("anthropic").await.unwrap();
        assert_eq!(secret.expose_secret(), "new-key");
    }

    #[tokio::test]
    async fn test_in_memory_store_remove_then_read_errors() {
        let store = InMemorySecretStore::new();
        store.set("groq", "k");
        store.remove("groq");
        assert!(store.read("groq").await.is_err());
    }

    #[tokio::test]
    async fn test_in_memory_store_arbitrary_non_provider_id() {
        // The git-credential endpoint reads ids that are never LLM providers.
        let store = InMemorySecretStore::new();
        store.set("github", "ghp_abc123");
        let secret = store.read("github").await.unwrap();
        assert_eq!(secret.expose_secret(), "ghp_abc123");
    }
}
