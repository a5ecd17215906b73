//! Provider identifiers and auth-injection styles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a supported upstream LLM provider.
///
/// Closed set, no dynamic registration: adding a provider is a source edit
/// plus a secret-store entry. `Xai` and `Grok` are kept as distinct variants
/// even though both point at the same upstream, so neither URL path nor
/// secret-store account silently disappears if a caller is already using it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Anthropic,
    Openai,
    Xai,
    Grok,
    Google,
    Mistral,
    Groq,
    Deepseek,
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProviderId {
    /// The lowercase token used both as the URL path prefix and as the
    /// secret-store account name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::Openai => "openai",
            Self::Xai => "xai",
            Self::Grok => "grok",
            Self::Google => "google",
            Self::Mistral => "mistral",
            Self::Groq => "groq",
            Self::Deepseek => "deepseek",
        }
    }

    /// Returns all known provider variants, in registry definition order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::Anthropic,
            Self::Openai,
            Self::Xai,
            Self::Grok,
            Self::Google,
            Self::Mistral,
            Self::Groq,
            Self::Deepseek,
        ]
    }

    /// Parses a URL path's first segment into a [`ProviderId`].
    ///
    /// Case-sensitive exact match only — no prefix ambiguity, no aliasing:
    /// the provider id in the URL must match a registered provider exactly.
    #[must_use]
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.as_str() == segment)
    }
}

/// The header-injection style used to present the credential to upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`.
    Bearer,
    /// `x-api-key: <key>`.
    XApiKey,
    /// `x-goog-api-key: <key>`.
    XGoogApiKey,
}
