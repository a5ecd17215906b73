//! Shared application state passed to every route handler.

use agentauth_allowlist::Allowlist;
use agentauth_types::SecretStore;
use std::sync::Arc;
use std::time::Duration;

/// Per-request upstream deadline. Long enough for the slowest expected
/// streaming completion; health and provider-list calls finish in
/// milliseconds regardless.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(600);

/// Shared state handed to every axum handler.
pub struct AppState {
    /// The admission boundary — checked before any other request-path work.
    pub allowlist: Allowlist,
    /// Read-only credential source, queried exactly once per proxied
    /// request.
    pub secrets: Arc<dyn SecretStore>,
    /// Client used for every upstream call. Redirects are not followed —
    /// `3xx` responses pass through to the caller verbatim.
    pub http: reqwest::Client,
    /// The port this process is bound to, echoed by the health endpoint.
    pub port: u16,
}

impl AppState {
    /// Builds application state around the given allowlist, secret store,
    /// and listener port.
    #[must_use]
    pub fn new(allowlist: Allowlist, secrets: Arc<dyn SecretStore>, port: u16) -> Arc<Self> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .expect("reqwest client configuration is valid");
        Arc::new(Self {
            allowlist,
            secrets,
            http,
            port,
        })
    }
}
