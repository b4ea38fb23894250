//! Aggregation of settled provider slots.
//!
//! The orchestrator settles every slot (success, exhausted retries, or a
//! fallback outcome) before handing them to [`ResponseAggregator::collect`].
//! The aggregator orders entries by the configured panel, never by
//! completion order, and replaces every failure with a plain-text sentinel
//! so downstream stages only ever see text.

use crate::core::provider_id::ProviderId;
use crate::provider::failure::FailureKind;
use crate::provider::result::ProviderResult;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Sentinel text standing in for a provider that produced no usable text.
pub fn failure_sentinel(provider: &ProviderId, kind: FailureKind) -> String {
    format!("⚠ {} unavailable: {}", provider, kind)
}

/// Final outcome of one provider slot, as reported by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledSlot {
    /// Position of the provider in the configured panel
    pub index: usize,
    pub provider: ProviderId,
    pub result: ProviderResult,
    /// Attempts made against the primary provider
    pub attempts: u32,
    /// Fallback provider consulted for this slot, whether or not it answered
    pub fallback: Option<ProviderId>,
}

impl SettledSlot {
    pub fn new(index: usize, provider: ProviderId, result: ProviderResult, attempts: u32) -> Self {
        Self {
            index,
            provider,
            result,
            attempts,
            fallback: None,
        }
    }

    /// Replace the outcome with the fallback provider's outcome
    pub fn with_fallback(mut self, fallback: ProviderId, result: ProviderResult) -> Self {
        self.fallback = Some(fallback);
        self.result = result;
        self
    }

    /// The fallback that actually answered for this slot
    pub fn served_by(&self) -> Option<&ProviderId> {
        self.fallback.as_ref().filter(|_| self.result.is_success())
    }
}

/// One provider's entry in the aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateEntry {
    provider: ProviderId,
    result: ProviderResult,
    text: String,
    attempts: u32,
    served_by: Option<ProviderId>,
}

impl AggregateEntry {
    fn from_slot(slot: SettledSlot) -> Self {
        let text = match &slot.result {
            ProviderResult::Success { text } => text.clone(),
            ProviderResult::Failure(f) => failure_sentinel(&slot.provider, f.kind),
        };
        let served_by = slot.served_by().cloned();
        Self {
            provider: slot.provider,
            result: slot.result,
            text,
            attempts: slot.attempts,
            served_by,
        }
    }

    fn unsettled(provider: ProviderId) -> Self {
        let result = ProviderResult::failure(
            FailureKind::Unavailable,
            "provider task ended without a result",
        );
        Self::from_slot(SettledSlot::new(0, provider, result, 0))
    }

    pub fn provider(&self) -> &ProviderId {
        &self.provider
    }

    pub fn result(&self) -> &ProviderResult {
        &self.result
    }

    /// Response text, or the failure sentinel
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn served_by(&self) -> Option<&ProviderId> {
        self.served_by.as_ref()
    }
}

/// Per-provider results keyed by provider, in configured panel order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregateResult {
    entries: Vec<AggregateEntry>,
}

impl AggregateResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregateEntry> {
        self.entries.iter()
    }

    pub fn get(&self, provider: &str) -> Option<&AggregateEntry> {
        self.entries.iter().find(|e| e.provider.as_str() == provider)
    }

    /// Text (or sentinel) for a provider
    pub fn text_of(&self, provider: &str) -> Option<&str> {
        self.get(provider).map(|e| e.text())
    }

    pub fn providers(&self) -> impl Iterator<Item = &ProviderId> {
        self.entries.iter().map(|e| &e.provider)
    }

    pub fn successful(&self) -> impl Iterator<Item = &AggregateEntry> {
        self.entries.iter().filter(|e| e.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &AggregateEntry> {
        self.entries.iter().filter(|e| !e.is_success())
    }

    /// `(provider, fallback)` pairs for slots filled by a fallback provider
    pub fn fallbacks(&self) -> impl Iterator<Item = (&ProviderId, &ProviderId)> {
        self.entries
            .iter()
            .filter_map(|e| e.served_by.as_ref().map(|f| (&e.provider, f)))
    }
}

/// Serializes as `{provider: text}` in panel order.
impl Serialize for AggregateResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.provider.as_str(), &entry.text)?;
        }
        map.end()
    }
}

/// Builds an [`AggregateResult`] from settled slots
#[derive(Debug, Clone)]
pub struct ResponseAggregator {
    configured: Vec<ProviderId>,
}

impl ResponseAggregator {
    pub fn new(configured: Vec<ProviderId>) -> Self {
        Self { configured }
    }

    /// Collect settled slots into configured order.
    ///
    /// Slots whose index or provider does not match the configured panel
    /// are ignored, and a configured provider with no slot gets an
    /// `Unavailable` entry, so the result always has exactly one entry per
    /// configured provider.
    pub fn collect(&self, slots: impl IntoIterator<Item = SettledSlot>) -> AggregateResult {
        let mut by_index: Vec<Option<SettledSlot>> =
            (0..self.configured.len()).map(|_| None).collect();

        for slot in slots {
            let matches_panel = self
                .configured
                .get(slot.index)
                .is_some_and(|p| *p == slot.provider);
            if matches_panel && by_index[slot.index].is_none() {
                let index = slot.index;
                by_index[index] = Some(slot);
            }
        }

        let entries = self
            .configured
            .iter()
            .zip(by_index)
            .map(|(provider, slot)| match slot {
                Some(slot) => AggregateEntry::from_slot(slot),
                None => AggregateEntry::unsettled(provider.clone()),
            })
            .collect();

        AggregateResult { entries }
    }
}
