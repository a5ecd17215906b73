//! Tier 2: the platform secret service / keychain / credential manager,
//! reached through the `keyring` crate.

use agentauth_types::{AgentAuthError, Result};
use secrecy::SecretString;
use std::time::Duration;

/// Bounds how long a single keyring lookup may block.
const KEYSTORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Reads the credential stored under `id` from the platform keystore.
///
/// Runs the blocking `keyring` call on the blocking pool and bounds it with
/// a timeout so a wedged secret-service daemon cannot hang a request
/// indefinitely.
pub async fn read(id: &str) -> Result<SecretString> {
    let id = id.to_string();
    let lookup = tokio::task::spawn_blocking(move || read_blocking(&id));

    match tokio::time::timeout(KEYSTORE_TIMEOUT, lookup).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(AgentAuthError::SecretStoreUnavailable(join_err.to_string())),
        Err(_) => Err(AgentAuthError::SecretStoreUnavailable(
            "keystore lookup timed out".to_string(),
        )),
    }
}

fn read_blocking(id: &str) -> Result<SecretString> {
    let service = format!("thesystem/{id}");
    let entry = keyring::Entry::new(&service, id)
        .map_err(|e| AgentAuthError::SecretStoreUnavailable(e.to_string()))?;

    match entry.get_password() {
        Ok(password) => Ok(SecretString::from(password)),
        Err(keyring::Error::NoEntry) => Err(AgentAuthError::CredentialNotFound(id.to_string())),
        Err(e) => Err(AgentAuthError::SecretStoreUnavailable(e.to_string())),
    }
}
