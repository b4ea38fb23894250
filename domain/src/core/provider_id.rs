//! Provider identifier value object

use serde::{Deserialize, Serialize};

/// Stable, unique name of a natural-language backend (Value Object)
///
/// Used as the aggregation key, so two providers on the same panel must
/// never share an id. The display name is what callers see as the key of
/// the per-provider mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub const GEMINI: &'static str = "Gemini";
    pub const CHATGPT: &'static str = "ChatGPT";
    pub const PERPLEXITY: &'static str = "Perplexity";
    pub const LOCAL: &'static str = "Local";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn gemini() -> Self {
        Self::new(Self::GEMINI)
    }

    pub fn chatgpt() -> Self {
        Self::new(Self::CHATGPT)
    }

    pub fn perplexity() -> Self {
        Self::new(Self::PERPLEXITY)
    }

    pub fn local() -> Self {
        Self::new(Self::LOCAL)
    }

    /// Providers consulted when no panel is configured
    pub fn default_panel() -> Vec<ProviderId> {
        vec![Self::gemini(), Self::chatgpt(), Self::perplexity()]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(s: &str) -> Self {
        ProviderId::new(s)
    }
}

impl From<String> for ProviderId {
    fn from(s: String) -> Self {
        ProviderId::new(s)
    }
}
