//! Fallback policy: which client takes over a failed slot.

use crate::ports::provider_client::ProviderClient;
use panel_domain::{FailureKind, ProviderId};
use std::sync::Arc;

/// Maps a classified provider failure to an alternative client.
///
/// Implementations must be pure lookups: the same `(provider, kind)` always
/// yields the same answer and the lookup has no side effects.
pub trait FallbackPolicy: Send + Sync {
    fn fallback_for(
        &self,
        provider: &ProviderId,
        kind: FailureKind,
    ) -> Option<Arc<dyn ProviderClient>>;
}

/// Policy with no fallbacks
pub struct NoFallback;

impl FallbackPolicy for NoFallback {
    fn fallback_for(
        &self,
        _provider: &ProviderId,
        _kind: FailureKind,
    ) -> Option<Arc<dyn ProviderClient>> {
        None
    }
}

/// One row of the fallback table
#[derive(Clone)]
pub struct FallbackRule {
    pub provider: ProviderId,
    pub on: Vec<FailureKind>,
    pub client: Arc<dyn ProviderClient>,
}

/// Configuration-driven fallback table.
///
/// Rules are checked in insertion order and the first match wins. A rule
/// pointing a provider at itself never matches.
#[derive(Clone, Default)]
pub struct FallbackTable {
    rules: Vec<FallbackRule>,
}

impl FallbackTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(
        mut self,
        provider: impl Into<ProviderId>,
        on: Vec<FailureKind>,
        client: Arc<dyn ProviderClient>,
    ) -> Self {
        self.rules.push(FallbackRule {
            provider: provider.into(),
            on,
            client,
        });
        self
    }

    pub fn rules(&self) -> &[FallbackRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FallbackPolicy for FallbackTable {
    fn fallback_for(
        &self,
        provider: &ProviderId,
        kind: FailureKind,
    ) -> Option<Arc<dyn ProviderClient>> {
        self.rules
            .iter()
            .find(|rule| {
                rule.provider == *provider && rule.on.contains(&kind) && rule.client.id() != provider
            })
            .map(|rule| Arc::clone(&rule.client))
    }
}

impl std::fmt::Debug for FallbackTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| {
                format!("{} {:?} -> {}", r.provider, r.on, r.client.id())
            }))
            .finish()
    }
}
