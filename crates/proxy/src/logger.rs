//! Request logger: one line per terminal event — admitted, denied, or
//! errored — carried as the `message` field of ordinary `tracing` events.
//!
//! Never renders a request or response body. `model` is extracted
//! best-effort from the captured request body — a JSON decode failure or a
//! missing field logs `-`, never the raw body.

use serde_json::Value;
use std::net::IpAddr;
use std::time::Duration;

/// Best-effort `model` extraction for the logger.
///
/// Returns `None` on anything but a top-level string `model` field — the
/// logger renders that as `-`. Never returns or logs the rest of the body.
#[must_use]
pub fn extract_model(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value.get("model")?.as_str().map(str::to_string)
}

/// Logs an admitted, dispatched request that reached a terminal status.
pub fn log_admitted(
    remote: IpAddr,
    method: &str,
    path: &str,
    model: Option<&str>,
    status: u16,
    duration: Duration,
) {
    let model = model.unwrap_or("-");
    tracing::info!(
        "{remote} {method} {path} model={model} status={status} {}ms",
        duration.as_millis()
    );
}

/// Logs a connection rejected by the allowlist, before any other work.
pub fn log_denied(remote: IpAddr, method: &str, path: &str) {
    tracing::warn!("DENIED {remote} {method} {path}");
}

/// Logs a request that terminated in an error path.
///
/// `message` must be a short, fixed string — never header or body content.
pub fn log_error(remote: IpAddr, method: &str, path: &str, message: &str) {
    tracing::error!("ERROR {remote} {method} {path} — {message}");
}
