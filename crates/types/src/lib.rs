//! Core types and traits for the agentauth workspace.
//!
//! This crate defines the shared abstractions used across all layers of the
//! credential-gating reverse proxy: the error type, provider identifiers and
//! auth-injection styles, and the `SecretStore` trait each secret-store
//! backend implements.

pub mod error;
pub mod provider;
pub mod secret;

pub use error::{AgentAuthError, Result};
pub use provider::{AuthStyle, ProviderId};
pub use secret::SecretStore;
