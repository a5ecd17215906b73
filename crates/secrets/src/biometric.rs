//! Tier 1: the optional biometric-gated keystore helper.
//!
//! If a sibling helper executable exists on disk, it is invoked for every
//! lookup. Any failure — missing binary, non-zero exit, empty output, or a
//! timeout — is treated as "not stored here" and falls through to the plain
//! keystore. The distinction is never surfaced to callers of
//! [`crate::KeystoreAdapter::read`].

use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

/// Bounds how long a single helper invocation may run.
const HELPER_TIMEOUT: Duration = Duration::from_secs(5);

/// Filename of the sibling helper, searched for next to the running binary.
const HELPER_BINARY_NAME: &str = "thesystem-biometric-helper";

/// Locates the biometric helper next to the current executable, if present.
#[must_use]
pub fn discover() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let dir = exe.parent()?;
    let candidate = dir.join(HELPER_BINARY_NAME);
    candidate.is_file().then_some(candidate)
}

/// Invokes the helper with `(get, "thesystem/<id>", <id>)` and returns its
/// trimmed stdout as a credential, or `None` on any failure.
pub async fn read(helper_path: &Path, id: &str) -> Option<SecretString> {
    let service = format!("thesystem/{id}");
    let invocation = tokio::process::Command::new(helper_path)
        .arg("get")
        .arg(&service)
        .arg(id)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output();

    let output = match tokio::time::timeout(HELPER_TIMEOUT, invocation).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            tracing::warn!(id, error = %e, "biometric helper failed to spawn");
            return None;
        }
        Err(_) => {
            tracing::warn!(id, "biometric helper timed out");
            return None;
        }
    };

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8(output.stdout).ok()?;
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return None;
    }

    Some(SecretString::from(trimmed.to_string()))
}
