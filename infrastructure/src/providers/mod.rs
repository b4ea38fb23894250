//! Provider adapters and the registry that builds them from configuration.

pub mod gemini;
pub mod http;
pub mod local;
pub mod openai;
pub mod registry;

pub use gemini::GeminiClient;
pub use http::HttpTransport;
pub use local::OllamaClient;
pub use openai::ChatCompletionsClient;
pub use registry::{PanelSetup, ProviderRegistry, RegistryError};

use crate::config::{FileProviderConfig, FileProvidersConfig};
use panel_domain::{DomainError, ProviderId};

/// The backends this crate has adapters for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
    Perplexity,
    Local,
}

/// Built-in connection defaults for a [`ProviderKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderPreset {
    pub label: &'static str,
    pub api_key_env: Option<&'static str>,
    pub base_url: &'static str,
    pub model: &'static str,
}

/// Provider settings after merging config over the preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub kind: ProviderKind,
    pub label: String,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
}

impl ResolvedProvider {
    /// API key from config, else from the named environment variable.
    ///
    /// Blank values count as missing.
    pub fn api_key(&self, env: &dyn Fn(&str) -> Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| self.api_key_env.as_deref().and_then(env))
            .filter(|key| !key.trim().is_empty())
    }

    pub fn id(&self) -> ProviderId {
        ProviderId::new(self.label.clone())
    }
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Gemini,
        ProviderKind::OpenAi,
        ProviderKind::Perplexity,
        ProviderKind::Local,
    ];

    /// Providers asked when `[panel] providers` is unset
    pub fn default_panel() -> Vec<ProviderKind> {
        vec![
            ProviderKind::Gemini,
            ProviderKind::OpenAi,
            ProviderKind::Perplexity,
        ]
    }

    /// Config section name
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Perplexity => "perplexity",
            ProviderKind::Local => "local",
        }
    }

    pub fn preset(&self) -> ProviderPreset {
        match self {
            ProviderKind::Gemini => ProviderPreset {
                label: ProviderId::GEMINI,
                api_key_env: Some("GEMINI_API_KEY"),
                base_url: "https://generativelanguage.googleapis.com/v1beta",
                model: "gemini-1.5-flash",
            },
            ProviderKind::OpenAi => ProviderPreset {
                label: ProviderId::CHATGPT,
                api_key_env: Some("OPENAI_API_KEY"),
                base_url: "https://api.openai.com/v1",
                model: "gpt-4o-mini",
            },
            ProviderKind::Perplexity => ProviderPreset {
                label: ProviderId::PERPLEXITY,
                api_key_env: Some("PERPLEXITY_API_KEY"),
                base_url: "https://api.perplexity.ai",
                model: "sonar",
            },
            ProviderKind::Local => ProviderPreset {
                label: ProviderId::LOCAL,
                api_key_env: None,
                base_url: "http://localhost:11434",
                model: "llama3.2",
            },
        }
    }

    fn settings<'a>(&self, config: &'a FileProvidersConfig) -> &'a FileProviderConfig {
        match self {
            ProviderKind::Gemini => &config.gemini,
            ProviderKind::OpenAi => &config.openai,
            ProviderKind::Perplexity => &config.perplexity,
            ProviderKind::Local => &config.local,
        }
    }

    /// Merge the `[providers.<kind>]` section over the preset
    pub fn resolve(&self, config: &FileProvidersConfig) -> ResolvedProvider {
        let preset = self.preset();
        let settings = self.settings(config);
        ResolvedProvider {
            kind: *self,
            label: settings
                .label
                .clone()
                .unwrap_or_else(|| preset.label.to_string()),
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| preset.base_url.to_string()),
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| preset.model.to_string()),
            api_key: settings.api_key.clone(),
            api_key_env: settings
                .api_key_env
                .clone()
                .or_else(|| preset.api_key_env.map(str::to_string)),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" | "chatgpt" | "gpt" => Ok(ProviderKind::OpenAi),
            "perplexity" | "pplx" => Ok(ProviderKind::Perplexity),
            "local" | "ollama" => Ok(ProviderKind::Local),
            _ => Err(DomainError::UnknownProvider(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("ChatGPT".parse::<ProviderKind>(), Ok(ProviderKind::OpenAi));
        assert_eq!("ollama".parse::<ProviderKind>(), Ok(ProviderKind::Local));
        assert_eq!(
            "claude".parse::<ProviderKind>(),
            Err(DomainError::UnknownProvider("claude".to_string()))
        );
    }

    #[test]
    fn test_resolve_overrides_preset() {
        let mut config = FileProvidersConfig::default();
        config.perplexity.model = Some("sonar-pro".to_string());

        let resolved = ProviderKind::Perplexity.resolve(&config);
        assert_eq!(resolved.model, "sonar-pro");
        assert_eq!(resolved.label, "Perplexity");
        assert_eq!(resolved.base_url, "https://api.perplexity.ai");
        assert_eq!(resolved.api_key_env.as_deref(), Some("PERPLEXITY_API_KEY"));
    }

    #[test]
    fn test_api_key_prefers_config_then_env() {
        let mut config = FileProvidersConfig::default();
        let env = |name: &str| (name == "OPENAI_API_KEY").then(|| "from-env".to_string());

        let resolved = ProviderKind::OpenAi.resolve(&config);
        assert_eq!(resolved.api_key(&env).as_deref(), Some("from-env"));

        config.openai.api_key = Some("from-config".to_string());
        let resolved = ProviderKind::OpenAi.resolve(&config);
        assert_eq!(resolved.api_key(&env).as_deref(), Some("from-config"));

        let resolved = ProviderKind::Gemini.resolve(&config);
        assert_eq!(resolved.api_key(&env), None);
    }

    #[test]
    fn test_blank_key_is_missing() {
        let mut config = FileProvidersConfig::default();
        config.gemini.api_key = Some("  ".to_string());
        let resolved = ProviderKind::Gemini.resolve(&config);
        assert_eq!(resolved.api_key(&|_| None), None);
    }
}
