//! The provider registry: a compile-time table mapping provider id to
//! upstream base URL, auth-injection style, and header handling.
//!
//! This is deliberately not configuration. Per the design note that a
//! misconfigured registry is a trust-boundary bug, not a user setting: new
//! providers are added by editing [`REGISTRY`] and redeploying, never by
//! loading a file at startup.

use agentauth_types::{AuthStyle, ProviderId};
use serde_json::Value;

/// A provider's fixed, immutable description.
pub struct ProviderDescriptor {
    /// URL path prefix and secret-store account name.
    pub id: ProviderId,
    /// Absolute origin (scheme + host, no trailing path).
    pub upstream_base: &'static str,
    /// How the credential is presented to the upstream.
    pub auth_style: AuthStyle,
    /// Request header names copied verbatim onto the upstream call, beyond
    /// the always-copied `content-type`.
    pub passthrough_headers: &'static [&'static str],
    /// Header applied when the caller omits it.
    pub default_headers: &'static [(&'static str, &'static str)],
    /// Optional request-body transform, applied before the upstream call.
    pub sanitizer: Option<fn(&mut Value)>,
}

/// Strips a `context_management` field from an Anthropic request body.
///
/// Compatibility shim for upstreams that reject accounts lacking the
/// corresponding preview entitlement. No-op if the field is absent or the
/// body is not a JSON object.
pub fn strip_anthropic_context_management(body: &mut Value) {
    if let Value::Object(map) = body {
        map.remove("context_management");
    }
}

/// The fixed provider table, scanned in this definition order.
pub const REGISTRY: &[ProviderDescriptor] = &[
    ProviderDescriptor {
        id: ProviderId::Anthropic,
        upstream_base: "https://api.anthropic.com",
        auth_style: AuthStyle::XApiKey,
        passthrough_headers: &["anthropic-version", "anthropic-beta"],
        default_headers: &[("anthropic-version", "2023-06-01")],
        sanitizer: Some(strip_anthropic_context_management),
    },
    ProviderDescriptor {
        id: ProviderId::Openai,
        upstream_base: "https://api.openai.com",
        auth_style: AuthStyle::Bearer,
        passthrough_headers: &[],
        default_headers: &[],
        sanitizer: None,
    },
    ProviderDescriptor {
        id: ProviderId::Xai,
        upstream_base: "https://api.x.ai",
        auth_style: AuthStyle::Bearer,
        passthrough_headers: &[],
        default_headers: &[],
        sanitizer: None,
    },
    ProviderDescriptor {
        id: ProviderId::Grok,
        upstream_base: "https://api.x.ai",
        auth_style: AuthStyle::Bearer,
        passthrough_headers: &[],
        default_headers: &[],
        sanitizer: None,
    },
    ProviderDescriptor {
        id: ProviderId::Google,
        upstream_base: "https://generativelanguage.googleapis.com",
        auth_style: AuthStyle::XGoogApiKey,
        passthrough_headers: &[],
        default_headers: &[],
        sanitizer: None,
    },
    ProviderDescriptor {
        id: ProviderId::Mistral,
        upstream_base: "https://api.mistral.ai",
        auth_style: AuthStyle::Bearer,
        passthrough_headers: &[],
        default_headers: &[],
        sanitizer: None,
    },
    ProviderDescriptor {
        id: ProviderId::Groq,
        upstream_base: "https://api.groq.com",
        auth_style: AuthStyle::Bearer,
        passthrough_headers: &[],
        default_headers: &[],
        sanitizer: None,
    },
    ProviderDescriptor {
        id: ProviderId::Deepseek,
        upstream_base: "https://api.deepseek.com",
        auth_style: AuthStyle::Bearer,
        passthrough_headers: &[],
        default_headers: &[],
        sanitizer: None,
    },
];

/// Looks up the registered descriptor for `id`.
#[must_use]
pub fn descriptor(id: ProviderId) -> Option<&'static ProviderDescriptor> {
    REGISTRY.iter().find(|d| d.id == id)
}

/// Matches a URL path's first segment against the registry, in definition
/// order. Returns `None` on no match (the caller responds `404`).
#[must_use]
pub fn match_path_segment(segment: &str) -> Option<&'static ProviderDescriptor> {
    REGISTRY.iter().find(|d| d.id.as_str() == segment)
}

/// Returns the ids of every registered provider, in definition order — used
/// by the health endpoint's `backends` field and the `/agentauth/providers`
/// listing.
#[must_use]
pub fn provider_ids() -> Vec<ProviderId> {
    REGISTRY.iter().map(|d| d.id).collect()
}
