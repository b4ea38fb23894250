//! Provider configuration from TOML (`[providers.*]`, `[[fallback]]`)
//!
//! Every field is optional; unset fields fall back to the provider's
//! preset (see [`ProviderKind::preset`](crate::providers::ProviderKind::preset)).
//!
//! ```toml
//! [providers.openai]
//! api_key_env = "OPENAI_API_KEY"
//! model = "gpt-4o-mini"
//!
//! [[fallback]]
//! provider = "chatgpt"
//! on = ["rate_limited"]
//! to = "local"
//! ```

use serde::{Deserialize, Serialize};

/// Connection settings for one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Direct API key (not recommended - use env var instead).
    pub api_key: Option<String>,
    /// Environment variable name for the API key.
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// Display name, used as the response key. Must be unique on the panel.
    pub label: Option<String>,
}

/// `[providers]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub gemini: FileProviderConfig,
    pub openai: FileProviderConfig,
    pub perplexity: FileProviderConfig,
    pub local: FileProviderConfig,
}

/// One `[[fallback]]` rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFallbackRule {
    /// Provider whose failure triggers the rule
    pub provider: String,
    /// Failure kinds the rule applies to
    pub on: Vec<String>,
    /// Provider that takes over the slot
    pub to: String,
}

impl FileFallbackRule {
    /// ChatGPT quota exhaustion is served by the local model
    pub fn defaults() -> Vec<Self> {
        vec![Self {
            provider: "chatgpt".to_string(),
            on: vec!["rate_limited".to_string()],
            to: "local".to_string(),
        }]
    }
}
