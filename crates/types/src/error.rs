//! Unified error type for the agentauth workspace.

use thiserror::Error;

/// Enumerates all error kinds that can occur across agentauth crates.
///
/// Every proxied-request error path funnels through one of these variants so
/// that the HTTP layer has a single place to map errors onto the status
/// codes and body shapes the error-handling design calls for.
#[derive(Debug, Error)]
pub enum AgentAuthError {
    /// The source address did not match any allowlist entry.
    #[error("source not in allowlist")]
    Denied,

    /// No route or provider matched the request path.
    #[error("not found")]
    NotFound,

    /// No credential is stored under the given secret-store id. Not
    /// restricted to registered LLM providers — the credential endpoint
    /// serves arbitrary ids such as `github` for the git credential helper.
    #[error("no credential stored for id: {0}")]
    CredentialNotFound(String),

    /// The secret store (biometric helper or platform keystore) could not be
    /// reached within the bounded timeout, or returned an unexpected error.
    #[error("secret store unavailable: {0}")]
    SecretStoreUnavailable(String),

    /// The upstream provider could not be reached, timed out, or the
    /// connection failed mid-stream.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The request body exceeded the local size cap before credential
    /// exposure.
    #[error("request body exceeds size limit")]
    BodyTooLarge,

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal error with no secret material embedded in the message.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, AgentAuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_denied() {
        assert_eq!(
            AgentAuthError::Denied.to_string(),
            "source not in allowlist"
        );
    }

    #[test]
    fn test_error_display_credential_not_found() {
        let err = AgentAuthError::CredentialNotFound("anthropic".to_string());
        assert!(err.to_string().contains("anthropic"));
    }

    #[test]
    fn test_error_display_upstream() {
        let err = AgentAuthError::Upstream("connection reset".into());
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid {{{").unwrap_err();
        let err: AgentAuthError = json_err.into();
        assert!(matches!(err, AgentAuthError::Serialization(_)));
    }
}
