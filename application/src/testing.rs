//! Scripted provider clients for use case tests.

use crate::ports::provider_client::ProviderClient;
use async_trait::async_trait;
use panel_domain::{ProviderId, ProviderRequest, ProviderResult};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Client that replays queued outcomes, then repeats a default one.
pub(crate) struct ScriptedClient {
    id: ProviderId,
    queued: Mutex<VecDeque<ProviderResult>>,
    default: ProviderResult,
    delay: Duration,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(id: &str, default: ProviderResult) -> Self {
        Self {
            id: ProviderId::new(id),
            queued: Mutex::new(VecDeque::new()),
            default,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue an outcome returned before the default
    pub fn then(self, result: ProviderResult) -> Self {
        self.queued.lock().unwrap().push_back(result);
        self
    }

    /// Simulated latency of every call
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderClient for ScriptedClient {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    async fn call(&self, request: &ProviderRequest) -> ProviderResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt().to_string());
        let result = self
            .queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        result
    }
}

/// Client whose call panics, standing in for a buggy adapter.
pub(crate) struct PanickingClient {
    id: ProviderId,
}

impl PanickingClient {
    pub fn shared(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: ProviderId::new(id),
        })
    }
}

#[async_trait]
impl ProviderClient for PanickingClient {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    async fn call(&self, _request: &ProviderRequest) -> ProviderResult {
        panic!("adapter bug")
    }
}

/// Conversation logger that keeps every event in memory.
#[derive(Default)]
pub(crate) struct RecordingLogger {
    events: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingLogger {
    pub fn event_types(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(t, _)| t.clone())
            .collect()
    }

    pub fn payloads(&self, event_type: &str) -> Vec<serde_json::Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == event_type)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

impl crate::ports::conversation_logger::ConversationLogger for RecordingLogger {
    fn log(&self, event: crate::ports::conversation_logger::ConversationEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.event_type.to_string(), event.payload));
    }
}
