//! Builds the full axum router: the three fixed routes, the registry-backed
//! catch-all dispatch, and the allowlist admission layer wrapping all of it.

use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::admission;
use crate::engine;
use crate::http_surface;
use crate::state::AppState;

/// Builds the router. The caller is responsible for serving it with
/// `axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())`
/// so the admission middleware can see the real peer address.
#[must_use]
pub fn make_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/agentauth/health", get(http_surface::health))
        .route("/agentauth/providers", get(http_surface::providers))
        .route("/agentauth/credential/{id}", get(http_surface::credential))
        .fallback(engine::dispatch)
        .layer(middleware::from_fn_with_state(state.clone(), admission::guard))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentauth_allowlist::Allowlist;
    use agentauth_secrets::InMemorySecretStore;
    use axum::body::Body;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt as _;
    use serde_json::Value;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use tower::ServiceExt as _;

    fn make_state() -> Arc<AppState> {
        AppState::new(
            Allowlist::default(),
            Arc::new(InMemorySecretStore::new()),
            9999,
        )
    }

    fn app(state: Arc<AppState>) -> Router {
        make_router(state).layer(MockConnectInfo(SocketAddr::new(
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            54321,
        )))
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_ok() {
        let resp = app(make_state())
            .oneshot(
                Request::builder()
                    .uri("/agentauth/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["port"], 9999);
    }

    #[tokio::test]
    async fn test_providers_ok() {
        let resp = app(make_state())
            .oneshot(
                Request::builder()
                    .uri("/agentauth/providers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert!(json.as_array().unwrap().iter().any(|v| v == "google"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let resp = app(make_state())
            .oneshot(
                Request::builder()
                    .uri("/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_credential_miss_is_404_json() {
        let resp = app(make_state())
            .oneshot(
                Request::builder()
                    .uri("/agentauth/credential/github")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "no_credential");
    }

    #[tokio::test]
    async fn test_credential_hit_returns_token() {
        let store = InMemorySecretStore::new();
        store.set("github", "ghp_abc123");
        let state = AppState::new(Allowlist::default(), Arc::new(store), 9999);
        let resp = app(state)
            .oneshot(
                Request::builder()
                    .uri("/agentauth/credential/github")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["token"], "ghp_abc123");
    }

    #[tokio::test]
    async fn test_missing_credential_for_proxy_route_is_502() {
        // No fake upstream is reachable from this test and no credential is
        // stored, so the engine fails at the credential-lookup step, before
        // ever attempting an upstream connect.
        let resp = app(make_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mistral/v1/chat/completions")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"model":"x"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_unregistered_provider_segment_is_404() {
        let resp = app(make_state())
            .oneshot(
                Request::builder()
                    .uri("/bedrock/v1/messages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
