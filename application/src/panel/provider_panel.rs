//! Ordered, duplicate-free set of provider clients.

use crate::ports::provider_client::ProviderClient;
use panel_domain::{DomainError, ProviderId};
use std::collections::HashSet;
use std::sync::Arc;

/// The providers consulted for each request, in configured order.
///
/// The order here is the key order of every [`AggregateResult`] built from
/// this panel. Construction rejects an empty panel and duplicate ids, so
/// aggregation keys are always unique.
///
/// [`AggregateResult`]: panel_domain::AggregateResult
#[derive(Clone)]
pub struct ProviderPanel {
    clients: Vec<Arc<dyn ProviderClient>>,
}

impl ProviderPanel {
    pub fn new(clients: Vec<Arc<dyn ProviderClient>>) -> Result<Self, DomainError> {
        if clients.is_empty() {
            return Err(DomainError::NoProviders);
        }
        let mut seen = HashSet::new();
        for client in &clients {
            if !seen.insert(client.id().clone()) {
                return Err(DomainError::DuplicateProvider(client.id().to_string()));
            }
        }
        Ok(Self { clients })
    }

    /// Restrict and reorder the panel to the named providers.
    ///
    /// An empty selection keeps the whole panel. Names match
    /// case-insensitively.
    pub fn select(&self, names: &[String]) -> Result<Self, DomainError> {
        if names.is_empty() {
            return Ok(self.clone());
        }
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let client = self
                .clients
                .iter()
                .find(|c| c.id().as_str().eq_ignore_ascii_case(name))
                .ok_or_else(|| DomainError::UnknownProvider(name.clone()))?;
            selected.push(Arc::clone(client));
        }
        Self::new(selected)
    }

    pub fn ids(&self) -> Vec<ProviderId> {
        self.clients.iter().map(|c| c.id().clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ProviderClient>> {
        self.clients.iter()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl std::fmt::Debug for ProviderPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.clients.iter().map(|c| c.id().as_str()))
            .finish()
    }
}
