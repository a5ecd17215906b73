//! The allowlist admission check.
//!
//! Runs ahead of every route, fixed or proxied, so no handler — present or
//! future — can be reached by an address outside the allowlist. Implemented
//! as a single axum middleware layered over the whole router rather than a
//! check duplicated in each handler.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse as _, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::ApiError;
use crate::logger;
use crate::state::AppState;
use agentauth_types::AgentAuthError;

/// Rejects any connection whose source address is not in the allowlist
/// before it reaches a handler.
pub async fn guard(
    State(state): State<Arc<AppState>>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let ip = remote.ip();
    if !state.allowlist.is_allowed(ip) {
        logger::log_denied(ip, request.method().as_str(), request.uri().path());
        return ApiError(AgentAuthError::Denied).into_response();
    }
    next.run(request).await
}
