//! Environment-only configuration.
//!
//! There is no config file: the orchestrator that launches a sandbox sets
//! these two variables once at VM boot and never changes them for the
//! lifetime of the process, so there is nothing here to hot-reload.

use figment::Figment;
use figment::providers::Env;
use serde::Deserialize;

/// The listener port, absent an override.
pub const DEFAULT_PORT: u16 = 9999;

/// The bind address, absent an override. Deliberately permissive — the
/// allowlist, not the bind address, is this process's trust boundary.
pub const DEFAULT_BIND: &str = "0.0.0.0";

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// The proxy's runtime configuration, resolved from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

/// Error resolving configuration from the environment.
#[derive(Debug, thiserror::Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(String);

impl Config {
    /// Reads `AGENTAUTH_PORT` and `AGENTAUTH_BIND`, falling back to
    /// [`DEFAULT_PORT`] / [`DEFAULT_BIND`] when either is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Figment::new()
            .merge(Env::prefixed("AGENTAUTH_"))
            .extract()
            .map_err(|e| ConfigError(e.to_string()))
    }
}
