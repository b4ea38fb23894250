//! Provider registry: turns configuration into a ready-to-run panel.
//!
//! Clients are built once per provider kind and shared, so the local model
//! serving as a fallback and as the summarizer is one instance.

use super::gemini::GeminiClient;
use super::http::HttpTransport;
use super::local::OllamaClient;
use super::openai::ChatCompletionsClient;
use super::{ProviderKind, ResolvedProvider};
use crate::config::FileConfig;
use panel_application::{
    DispatchConfig, FallbackTable, ProviderClient, ProviderPanel, SummaryParams,
};
use panel_domain::{DomainError, FailureKind};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while building providers from configuration
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("{provider}: no API key (set `api_key` in [providers.{section}] or the {env} environment variable)")]
    MissingCredentials {
        provider: String,
        section: &'static str,
        env: String,
    },

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("could not create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Everything the use cases need for one configuration
pub struct PanelSetup {
    pub panel: ProviderPanel,
    pub fallback: FallbackTable,
    /// Summarization backend, `None` when disabled or unavailable
    pub summarizer: Option<Arc<dyn ProviderClient>>,
    pub dispatch: DispatchConfig,
    pub summary: SummaryParams,
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Builds and caches provider clients from a [`FileConfig`]
pub struct ProviderRegistry {
    config: FileConfig,
    transport: HttpTransport,
    env: EnvLookup,
    clients: Mutex<HashMap<ProviderKind, Arc<dyn ProviderClient>>>,
}

impl ProviderRegistry {
    /// Registry reading API keys from the process environment
    pub fn new(config: FileConfig) -> Result<Self, RegistryError> {
        Self::with_env(config, |name| std::env::var(name).ok())
    }

    /// Registry with a custom environment lookup
    pub fn with_env(
        config: FileConfig,
        env: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Result<Self, RegistryError> {
        Ok(Self {
            config,
            transport: HttpTransport::new()?,
            env: Box::new(env),
            clients: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &FileConfig {
        &self.config
    }

    /// Client for a provider kind, built on first use.
    pub fn client(&self, kind: ProviderKind) -> Result<Arc<dyn ProviderClient>, RegistryError> {
        if let Some(client) = self.cached(kind) {
            return Ok(client);
        }

        let resolved = kind.resolve(&self.config.providers);
        let client = self.build(&resolved)?;
        debug!(
            "Built {} client '{}' ({} @ {})",
            kind, resolved.label, resolved.model, resolved.base_url
        );

        if let Ok(mut clients) = self.clients.lock() {
            clients.insert(kind, Arc::clone(&client));
        }
        Ok(client)
    }

    fn cached(&self, kind: ProviderKind) -> Option<Arc<dyn ProviderClient>> {
        self.clients
            .lock()
            .ok()
            .and_then(|clients| clients.get(&kind).cloned())
    }

    fn build(&self, resolved: &ResolvedProvider) -> Result<Arc<dyn ProviderClient>, RegistryError> {
        let transport = self.transport.clone();
        let id = resolved.id();
        let api_key = || {
            resolved
                .api_key(&*self.env)
                .ok_or_else(|| RegistryError::MissingCredentials {
                    provider: resolved.label.clone(),
                    section: resolved.kind.as_str(),
                    env: resolved
                        .api_key_env
                        .clone()
                        .unwrap_or_else(|| "<unset>".to_string()),
                })
        };

        let client: Arc<dyn ProviderClient> = match resolved.kind {
            ProviderKind::Gemini => Arc::new(GeminiClient::new(
                id,
                transport,
                &resolved.base_url,
                &resolved.model,
                api_key()?,
            )),
            ProviderKind::OpenAi | ProviderKind::Perplexity => {
                Arc::new(ChatCompletionsClient::new(
                    id,
                    transport,
                    &resolved.base_url,
                    resolved.model.clone(),
                    api_key()?,
                ))
            }
            ProviderKind::Local => Arc::new(OllamaClient::new(
                id,
                transport,
                &resolved.base_url,
                resolved.model.clone(),
            )),
        };
        Ok(client)
    }

    /// The ordered provider panel.
    ///
    /// With an explicit `[panel] providers` list every entry must be
    /// buildable. With the default panel, providers lacking credentials are
    /// skipped with a warning.
    pub fn panel(&self) -> Result<ProviderPanel, RegistryError> {
        let (kinds, explicit) = match &self.config.panel.providers {
            Some(names) => (
                names
                    .iter()
                    .map(|name| name.parse::<ProviderKind>())
                    .collect::<Result<Vec<_>, _>>()?,
                true,
            ),
            None => (ProviderKind::default_panel(), false),
        };

        let mut clients = Vec::with_capacity(kinds.len());
        for kind in kinds {
            match self.client(kind) {
                Ok(client) => clients.push(client),
                Err(err @ RegistryError::MissingCredentials { .. }) if !explicit => {
                    warn!("Skipping provider: {}", err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(ProviderPanel::new(clients)?)
    }

    /// The fallback table from `[[fallback]]` rules.
    ///
    /// A rule whose target cannot be built is dropped with a warning.
    pub fn fallback_table(&self) -> Result<FallbackTable, RegistryError> {
        let mut table = FallbackTable::new();
        for rule in &self.config.fallback {
            let from = rule.provider.parse::<ProviderKind>()?;
            let to = rule.to.parse::<ProviderKind>()?;
            let on = rule
                .on
                .iter()
                .map(|kind| kind.parse::<FailureKind>())
                .collect::<Result<Vec<_>, _>>()?;

            match self.client(to) {
                Ok(client) => {
                    let label = from.resolve(&self.config.providers).label;
                    table = table.with_rule(label, on, client);
                }
                Err(err @ RegistryError::MissingCredentials { .. }) => {
                    warn!("Ignoring fallback {} -> {}: {}", from, to, err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(table)
    }

    /// The summarization backend, if enabled and buildable.
    pub fn summarizer(&self) -> Result<Option<Arc<dyn ProviderClient>>, RegistryError> {
        if !self.config.summary.enabled {
            return Ok(None);
        }
        let kind = self.config.summary.provider.parse::<ProviderKind>()?;
        match self.client(kind) {
            Ok(client) => Ok(Some(client)),
            Err(err @ RegistryError::MissingCredentials { .. }) => {
                warn!("Summary disabled: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Build everything at once
    pub fn setup(&self) -> Result<PanelSetup, RegistryError> {
        Ok(PanelSetup {
            panel: self.panel()?,
            fallback: self.fallback_table()?,
            summarizer: self.summarizer()?,
            dispatch: self.config.panel.to_dispatch_config(),
            summary: self.config.summary.to_summary_params(),
        })
    }
}
