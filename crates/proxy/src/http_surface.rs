//! The three fixed routes: health, provider listing, and the
//! git-credential endpoint. Registered ahead of the proxy engine's
//! catch-all dispatch.

use agentauth_registry::provider_ids;
use agentauth_types::AgentAuthError;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /agentauth/health` — liveness plus a registry snapshot.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let backends: Vec<&'static str> = provider_ids().iter().map(|id| id.as_str()).collect();
    Json(json!({
        "status": "ok",
        "backends": backends,
        "port": state.port,
    }))
}

/// `GET /agentauth/providers` — the registered provider ids.
pub async fn providers() -> Json<serde_json::Value> {
    let ids: Vec<&'static str> = provider_ids().iter().map(|id| id.as_str()).collect();
    Json(serde_json::Value::Array(
        ids.into_iter().map(|id| json!(id)).collect(),
    ))
}

/// `GET /agentauth/credential/<id>` — used by the git credential helper.
///
/// Not restricted to registered LLM providers: `id` is looked up directly
/// in the secret store, so ids like `github` that never appear in
/// `agentauth-registry` work the same way. This is the only route that
/// returns a raw secret in the response body; it is gated solely by the
/// allowlist the caller already passed to reach this handler.
///
/// A missing credential is this route's own `404` JSON shape, distinct from
/// every other error the secret store can return (keystore unreachable or
/// timed out), which falls through to [`ApiError`]'s `502` mapping instead.
pub async fn credential(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.secrets.read(&id).await {
        Ok(secret) => {
            use secrecy::ExposeSecret as _;
            Json(json!({ "token": secret.expose_secret() })).into_response()
        }
        Err(AgentAuthError::CredentialNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "no_credential",
                "message": format!("no credential stored for id: {id}"),
            })),
        )
            .into_response(),
        Err(err) => ApiError(err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentauth_allowlist::Allowlist;
    use agentauth_secrets::InMemorySecretStore;
    use axum::http::StatusCode as HttpStatus;
    use std::sync::Arc as StdArc;

    fn make_state() -> StdArc<AppState> {
        AppState::new(Allowlist::default(), StdArc::new(InMemorySecretStore::new()), 9999)
    }

    #[tokio::test]
    async fn test_health_reports_port_and_backends() {
        let state = make_state();
        let Json(body) = health(State(state)).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["port"], 9999);
        assert!(body["backends"].as_array().unwrap().contains(&json!("anthropic")));
    }

    #[tokio::test]
    async fn test_providers_lists_all_registered_ids() {
        let Json(body) = providers().await;
        let arr = body.as_array().unwrap();
        assert!(arr.contains(&json!("openai")));
        assert!(arr.contains(&json!("xai")));
        assert!(arr.contains(&json!("grok")));
    }

    #[tokio::test]
    async fn test_credential_hit_returns_token() {
        let inner = InMemorySecretStore::new();
        inner.set("github", "ghp_test123");
        let state = AppState::new(Allowlist::default(), StdArc::new(inner), 9999);
        let resp = credential(State(state), Path("github".to_string())).await;
        assert_eq!(resp.status(), HttpStatus::OK);
    }

    #[tokio::test]
    async fn test_credential_miss_returns_404_json() {
        let state = make_state();
        let resp = credential(State(state), Path("github".to_string())).await;
        assert_eq!(resp.status(), HttpStatus::NOT_FOUND);
    }

    struct UnavailableSecretStore;

    #[async_trait::async_trait]
    impl agentauth_types::SecretStore for UnavailableSecretStore {
        async fn read(&self, _id: &str) -> agentauth_types::Result<secrecy::SecretString> {
            Err(AgentAuthError::SecretStoreUnavailable("timeout".to_string()))
        }
    }

    #[tokio::test]
    async fn test_credential_keystore_unavailable_returns_502() {
        let state = AppState::new(Allowlist::default(), StdArc::new(UnavailableSecretStore), 9999);
        let resp = credential(State(state), Path("github".to_string())).await;
        assert_eq!(resp.status(), HttpStatus::BAD_GATEWAY);
    }
}
