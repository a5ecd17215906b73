//! Secret-store trait and the credential wrapper it returns.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::Result;

/// Reads a named credential from a platform-protected secret store.
///
/// Keyed by an arbitrary string id, not just the registered LLM
/// [`crate::ProviderId`]s — the git-credential endpoint reads ids such as
/// `github` that never appear in the provider registry. Implementations
/// must not cache across calls — re-reading on every proxied request is
/// what lets credential rotation take effect without a restart. The
/// returned value is wrapped in [`SecretString`] so it never
/// prints in `Debug`/`Display` output and is zeroized when the holder
/// drops.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Look up the credential stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AgentAuthError::CredentialNotFound`] if no backend
    /// has a value stored, or
    /// [`crate::AgentAuthError::SecretStoreUnavailable`] if every backend
    /// failed or timed out.
    async fn read(&self, id: &str) -> Result<SecretString>;
}
