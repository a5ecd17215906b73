//! Maps [`AgentAuthError`] onto the HTTP status codes and plain-text bodies
//! the error-handling design calls for.
//!
//! Error bodies here are deliberately short, fixed strings — never the
//! `Display` of the underlying error — so that a change elsewhere in the
//! error path can't accidentally leak header or body content into a
//! response. The one exception is the 413 cap message, which is also a
//! fixed string.

use agentauth_types::AgentAuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Wrapper around [`AgentAuthError`] that implements [`IntoResponse`].
pub struct ApiError(pub AgentAuthError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            AgentAuthError::Denied => (StatusCode::FORBIDDEN, "forbidden"),
            AgentAuthError::NotFound => (StatusCode::NOT_FOUND, "not found"),
            AgentAuthError::BodyTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "payload too large"),
            AgentAuthError::CredentialNotFound(_)
            | AgentAuthError::SecretStoreUnavailable(_)
            | AgentAuthError::Upstream(_) => (StatusCode::BAD_GATEWAY, "bad gateway"),
            AgentAuthError::Serialization(_) | AgentAuthError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        };
        (status, body).into_response()
    }
}

impl From<AgentAuthError> for ApiError {
    fn from(e: AgentAuthError) -> Self {
        Self(e)
    }
}
