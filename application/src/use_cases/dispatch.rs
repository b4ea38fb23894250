//! Dispatch use case
//!
//! Fans one prompt out to every provider on the panel and joins the
//! settled slots into an [`AggregateResult`].

use crate::config::DispatchConfig;
use crate::panel::{FallbackPolicy, ProviderPanel};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::provider_client::ProviderClient;
use crate::use_cases::shared::{guarded_call, is_cancelled};
use panel_domain::{
    AggregateResult, FailureKind, Prompt, ProviderFailure, ProviderRequest, ProviderResult,
    ResponseAggregator, RetryPolicy, SettledSlot, Stage,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can end a dispatch early
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Dispatch cancelled")]
    Cancelled,
}

/// Runs one request against every provider concurrently.
///
/// Each slot gets its own task, retry budget and timeout, so a slow or
/// failing provider never holds up its siblings. Provider faults are
/// captured as [`ProviderResult::Failure`]; the only error a dispatch
/// returns is [`DispatchError::Cancelled`].
pub struct Orchestrator {
    fallback: Arc<dyn FallbackPolicy>,
    retry: RetryPolicy,
    call_timeout: Duration,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Orchestrator {
    pub fn new(config: &DispatchConfig, fallback: Arc<dyn FallbackPolicy>) -> Self {
        Self {
            fallback,
            retry: config.retry,
            call_timeout: config.call_timeout,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Dispatch without progress reporting or cancellation
    pub async fn dispatch(&self, prompt: &Prompt, panel: &ProviderPanel) -> AggregateResult {
        // Without a token the only error variant cannot occur.
        self.dispatch_with_progress(prompt, panel, &NoProgress, None)
            .await
            .unwrap_or_default()
    }

    /// Dispatch with progress callbacks and cooperative cancellation.
    ///
    /// When `cancellation` fires, every in-flight slot task is aborted and
    /// `Cancelled` is returned. Dropping the returned future has the same
    /// effect, since the slot tasks live in a [`JoinSet`] owned by it.
    pub async fn dispatch_with_progress(
        &self,
        prompt: &Prompt,
        panel: &ProviderPanel,
        progress: &dyn ProgressNotifier,
        cancellation: Option<&CancellationToken>,
    ) -> Result<AggregateResult, DispatchError> {
        if is_cancelled(cancellation) {
            return Err(DispatchError::Cancelled);
        }

        let ids = panel.ids();
        info!("Dispatching to {} providers", ids.len());
        progress.on_stage_start(Stage::Dispatch, ids.len());
        self.conversation_logger.log(ConversationEvent::new(
            "dispatch_started",
            json!({
                "providers": ids.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
                "prompt_chars": prompt.content().chars().count(),
            }),
        ));

        let request = Arc::new(ProviderRequest::for_prompt(prompt, self.call_timeout));
        let mut join_set = JoinSet::new();
        let mut task_slots = HashMap::new();

        for (index, client) in panel.iter().enumerate() {
            let handle = join_set.spawn(Self::run_slot(
                index,
                Arc::clone(client),
                Arc::clone(&request),
                self.retry,
                Arc::clone(&self.fallback),
            ));
            task_slots.insert(handle.id(), (index, client.id().clone()));
        }

        let mut settled = Vec::with_capacity(ids.len());
        loop {
            let joined = match cancellation {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            join_set.abort_all();
                            info!("Dispatch cancelled, aborted in-flight provider calls");
                            return Err(DispatchError::Cancelled);
                        }
                        joined = join_set.join_next() => joined,
                    }
                }
                None => join_set.join_next().await,
            };
            let Some(joined) = joined else { break };

            let slot = match joined {
                Ok(slot) => slot,
                Err(e) => {
                    warn!("Provider task failed: {}", e);
                    let Some((index, provider)) = task_slots.get(&e.id()).cloned() else {
                        continue;
                    };
                    SettledSlot::new(
                        index,
                        provider,
                        ProviderResult::failure(
                            FailureKind::Unavailable,
                            format!("provider task failed: {}", e),
                        ),
                        1,
                    )
                }
            };

            progress.on_slot_settled(&slot);
            self.log_settled(&slot);
            settled.push(slot);
        }

        let aggregate = ResponseAggregator::new(ids).collect(settled);
        info!(
            "Dispatch complete: {}/{} providers answered",
            aggregate.successful().count(),
            aggregate.len()
        );
        progress.on_stage_complete(Stage::Dispatch);
        Ok(aggregate)
    }

    /// Drive one slot to settlement: retries, then at most one fallback call.
    async fn run_slot(
        index: usize,
        client: Arc<dyn ProviderClient>,
        request: Arc<ProviderRequest>,
        retry: RetryPolicy,
        fallback: Arc<dyn FallbackPolicy>,
    ) -> SettledSlot {
        let mut budget = retry.budget();
        let result = loop {
            let result = guarded_call(client.as_ref(), &request).await;
            let Some(kind) = result.failure_kind() else {
                break result;
            };
            match budget.next_delay(kind) {
                Some(delay) => {
                    debug!(
                        "{} failed with {}, retry {} in {:?}",
                        client.id(),
                        kind,
                        budget.retries(),
                        delay
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                None => break result,
            }
        };

        let slot = SettledSlot::new(index, client.id().clone(), result, budget.attempts());
        let Some(kind) = slot.result.failure_kind() else {
            return slot;
        };
        let Some(alternative) = fallback.fallback_for(client.id(), kind) else {
            return slot;
        };

        info!(
            "{} failed with {}, falling back to {}",
            client.id(),
            kind,
            alternative.id()
        );
        let outcome = match guarded_call(alternative.as_ref(), &request).await {
            ProviderResult::Failure(f) => ProviderResult::Failure(ProviderFailure::new(
                f.kind,
                format!("fallback {} failed: {}", alternative.id(), f.detail),
            )),
            success => success,
        };
        slot.with_fallback(alternative.id().clone(), outcome)
    }

    fn log_settled(&self, slot: &SettledSlot) {
        let failure = slot.result.failure_detail();
        self.conversation_logger.log(ConversationEvent::new(
            "provider_settled",
            json!({
                "provider": slot.provider.as_str(),
                "status": if slot.result.is_success() { "success" } else { "failure" },
                "kind": failure.map(|f| f.kind.as_str()),
                "detail": failure.map(|f| f.detail.as_str()),
                "attempts": slot.attempts,
            }),
        ));
        if let Some(fallback) = &slot.fallback {
            self.conversation_logger.log(ConversationEvent::new(
                "fallback_used",
                json!({
                    "provider": slot.provider.as_str(),
                    "fallback": fallback.as_str(),
                    "success": slot.result.is_success(),
                }),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{FallbackTable, NoFallback};
    use crate::testing::{PanickingClient, RecordingLogger, ScriptedClient};
    use panel_domain::Backoff;

    fn orchestrator(retry: RetryPolicy, fallback: Arc<dyn FallbackPolicy>) -> Orchestrator {
        let config = DispatchConfig::default()
            .with_retry(retry)
            .with_call_timeout(Duration::from_secs(2));
        Orchestrator::new(&config, fallback)
    }

    fn prompt() -> Prompt {
        Prompt::try_new("What is the capital of France?").unwrap()
    }

    fn panel(clients: Vec<Arc<dyn ProviderClient>>) -> ProviderPanel {
        ProviderPanel::new(clients).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_entry_per_provider_in_panel_order() {
        let gemini = ScriptedClient::new("Gemini", ProviderResult::success("a"))
            .delay(Duration::from_millis(300))
            .shared();
        let chatgpt = ScriptedClient::new("ChatGPT", ProviderResult::success("b"))
            .delay(Duration::from_millis(10))
            .shared();
        let perplexity = ScriptedClient::new("Perplexity", ProviderResult::success("c"))
            .delay(Duration::from_millis(100))
            .shared();

        let result = orchestrator(RetryPolicy::none(), Arc::new(NoFallback))
            .dispatch(&prompt(), &panel(vec![gemini, chatgpt, perplexity]))
            .await;

        assert_eq!(result.len(), 3);
        let order: Vec<&str> = result.providers().map(|p| p.as_str()).collect();
        assert_eq!(order, vec!["Gemini", "ChatGPT", "Perplexity"]);
        assert_eq!(result.text_of("Perplexity"), Some("c"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_without_fallback_yields_sentinel() {
        let gemini = ScriptedClient::new("Gemini", ProviderResult::success("a")).shared();
        let perplexity = ScriptedClient::new("Perplexity", ProviderResult::success("late"))
            .delay(Duration::from_secs(30))
            .shared();
        let retry = RetryPolicy::new(3, Backoff::Fixed(Duration::from_millis(100)));

        let result = orchestrator(retry, Arc::new(NoFallback))
            .dispatch(&prompt(), &panel(vec![gemini.clone(), perplexity.clone()]))
            .await;

        assert_eq!(result.text_of("Gemini"), Some("a"));
        let entry = result.get("Perplexity").unwrap();
        assert_eq!(entry.text(), "⚠ Perplexity unavailable: Timeout");
        assert_eq!(entry.attempts(), 4);
        assert_eq!(perplexity.calls(), 4);
        assert_eq!(gemini.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_uses_fallback_without_retry() {
        let chatgpt = ScriptedClient::new(
            "ChatGPT",
            ProviderResult::failure(FailureKind::RateLimited, "insufficient_quota"),
        )
        .shared();
        let local = ScriptedClient::new("Local", ProviderResult::success("Paris.")).shared();
        let table = FallbackTable::new().with_rule(
            "ChatGPT",
            vec![FailureKind::RateLimited],
            local.clone(),
        );

        let result = orchestrator(RetryPolicy::default(), Arc::new(table))
            .dispatch(&prompt(), &panel(vec![chatgpt.clone()]))
            .await;

        assert_eq!(result.text_of("ChatGPT"), Some("Paris."));
        assert_eq!(
            result.get("ChatGPT").unwrap().served_by().map(|p| p.as_str()),
            Some("Local")
        );
        assert_eq!(chatgpt.calls(), 1);
        assert_eq!(local.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fallback_is_not_retried() {
        let chatgpt = ScriptedClient::new(
            "ChatGPT",
            ProviderResult::failure(FailureKind::RateLimited, "429"),
        )
        .shared();
        let local = ScriptedClient::new(
            "Local",
            ProviderResult::failure(FailureKind::Unavailable, "connection refused"),
        )
        .shared();
        let table = FallbackTable::new().with_rule(
            "ChatGPT",
            vec![FailureKind::RateLimited],
            local.clone(),
        );

        let result = orchestrator(RetryPolicy::default(), Arc::new(table))
            .dispatch(&prompt(), &panel(vec![chatgpt]))
            .await;

        let entry = result.get("ChatGPT").unwrap();
        assert_eq!(entry.text(), "⚠ ChatGPT unavailable: Unavailable");
        let detail = entry.result().failure_detail().unwrap();
        assert!(detail.detail.contains("fallback Local failed"));
        assert!(entry.served_by().is_none());
        assert_eq!(result.fallbacks().count(), 0);
        assert_eq!(local.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unauthorized_uses_fallback_without_retry() {
        let gemini = ScriptedClient::new(
            "Gemini",
            ProviderResult::failure(FailureKind::Unauthorized, "HTTP 403"),
        )
        .shared();
        let local = ScriptedClient::new("Local", ProviderResult::success("L")).shared();
        let table = FallbackTable::new().with_rule(
            "Gemini",
            vec![FailureKind::Unauthorized],
            local.clone(),
        );

        let result = orchestrator(RetryPolicy::default(), Arc::new(table))
            .dispatch(&prompt(), &panel(vec![gemini.clone()]))
            .await;

        let entry = result.get("Gemini").unwrap();
        assert_eq!(entry.text(), "L");
        assert_eq!(entry.served_by().map(|p| p.as_str()), Some("Local"));
        assert_eq!(entry.attempts(), 1);
        assert_eq!(gemini.calls(), 1);
        assert_eq!(local.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_fall_back() {
        let perplexity = ScriptedClient::new(
            "Perplexity",
            ProviderResult::failure(FailureKind::Unavailable, "HTTP 502"),
        )
        .shared();
        let local = ScriptedClient::new("Local", ProviderResult::success("L")).shared();
        let table = FallbackTable::new().with_rule(
            "Perplexity",
            vec![FailureKind::Unavailable],
            local.clone(),
        );
        let retry = RetryPolicy::new(2, Backoff::Fixed(Duration::from_millis(100)));

        let result = orchestrator(retry, Arc::new(table))
            .dispatch(&prompt(), &panel(vec![perplexity.clone()]))
            .await;

        let entry = result.get("Perplexity").unwrap();
        assert_eq!(entry.text(), "L");
        assert_eq!(entry.served_by().map(|p| p.as_str()), Some("Local"));
        assert_eq!(entry.attempts(), 3);
        assert_eq!(perplexity.calls(), 3);
        assert_eq!(local.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_recovers_on_retry() {
        let gemini = ScriptedClient::new("Gemini", ProviderResult::success("Paris."))
            .then(ProviderResult::failure(FailureKind::Unavailable, "HTTP 503"))
            .shared();

        let result = orchestrator(RetryPolicy::default(), Arc::new(NoFallback))
            .dispatch(&prompt(), &panel(vec![gemini.clone()]))
            .await;

        let entry = result.get("Gemini").unwrap();
        assert!(entry.is_success());
        assert_eq!(entry.attempts(), 2);
        assert_eq!(gemini.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_response_retried_once() {
        let gemini = ScriptedClient::new(
            "Gemini",
            ProviderResult::failure(FailureKind::MalformedResponse, "missing candidates"),
        )
        .shared();

        let result = orchestrator(RetryPolicy::default(), Arc::new(NoFallback))
            .dispatch(&prompt(), &panel(vec![gemini.clone()]))
            .await;

        assert_eq!(gemini.calls(), 2);
        assert_eq!(
            result.text_of("Gemini"),
            Some("⚠ Gemini unavailable: MalformedResponse")
        );
    }

    #[tokio::test]
    async fn test_every_provider_sees_identical_prompt() {
        let clients: Vec<Arc<ScriptedClient>> = ["Gemini", "ChatGPT", "Perplexity"]
            .iter()
            .map(|name| ScriptedClient::new(name, ProviderResult::success("ok")).shared())
            .collect();
        let dyn_clients = clients
            .iter()
            .map(|c| Arc::clone(c) as Arc<dyn ProviderClient>)
            .collect();

        orchestrator(RetryPolicy::none(), Arc::new(NoFallback))
            .dispatch(&prompt(), &panel(dyn_clients))
            .await;

        for client in &clients {
            assert_eq!(client.prompts(), vec!["What is the capital of France?"]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_wall_time_bounded_by_slowest_slot() {
        let fast = ScriptedClient::new("Gemini", ProviderResult::success("a"))
            .delay(Duration::from_millis(100))
            .shared();
        let faster = ScriptedClient::new("ChatGPT", ProviderResult::success("b"))
            .delay(Duration::from_millis(50))
            .shared();
        let hung = ScriptedClient::new("Perplexity", ProviderResult::success("c"))
            .delay(Duration::from_millis(5000))
            .shared();

        let start = tokio::time::Instant::now();
        let result = orchestrator(RetryPolicy::none(), Arc::new(NoFallback))
            .dispatch(&prompt(), &panel(vec![fast, faster, hung]))
            .await;
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(2000));
        assert!(elapsed < Duration::from_millis(2150), "took {:?}", elapsed);
        assert_eq!(result.successful().count(), 2);
        assert_eq!(
            result.text_of("Perplexity"),
            Some("⚠ Perplexity unavailable: Timeout")
        );
    }

    #[tokio::test]
    async fn test_panicking_provider_is_contained() {
        let gemini = ScriptedClient::new("Gemini", ProviderResult::success("a")).shared();
        let broken = PanickingClient::shared("ChatGPT");

        let result = orchestrator(RetryPolicy::none(), Arc::new(NoFallback))
            .dispatch(&prompt(), &panel(vec![gemini, broken]))
            .await;

        assert_eq!(result.len(), 2);
        assert_eq!(result.text_of("Gemini"), Some("a"));
        assert_eq!(
            result.text_of("ChatGPT"),
            Some("⚠ ChatGPT unavailable: Unavailable")
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_start_makes_no_calls() {
        let gemini = ScriptedClient::new("Gemini", ProviderResult::success("a")).shared();
        let token = CancellationToken::new();
        token.cancel();

        let result = orchestrator(RetryPolicy::none(), Arc::new(NoFallback))
            .dispatch_with_progress(
                &prompt(),
                &panel(vec![gemini.clone()]),
                &NoProgress,
                Some(&token),
            )
            .await;

        assert_eq!(result, Err(DispatchError::Cancelled));
        assert_eq!(gemini.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_aborts_in_flight_calls() {
        let slow = ScriptedClient::new("Gemini", ProviderResult::success("a"))
            .delay(Duration::from_secs(60))
            .shared();
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let config = DispatchConfig::default()
            .with_retry(RetryPolicy::none())
            .with_call_timeout(Duration::from_secs(120));
        let start = tokio::time::Instant::now();
        let result = Orchestrator::new(&config, Arc::new(NoFallback))
            .dispatch_with_progress(&prompt(), &panel(vec![slow]), &NoProgress, Some(&token))
            .await;

        assert_eq!(result, Err(DispatchError::Cancelled));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_conversation_events_logged() {
        let chatgpt = ScriptedClient::new(
            "ChatGPT",
            ProviderResult::failure(FailureKind::RateLimited, "429"),
        )
        .shared();
        let local = ScriptedClient::new("Local", ProviderResult::success("Paris.")).shared();
        let table =
            FallbackTable::new().with_rule("ChatGPT", vec![FailureKind::RateLimited], local);
        let logger = Arc::new(RecordingLogger::default());

        orchestrator(RetryPolicy::none(), Arc::new(table))
            .with_conversation_logger(logger.clone())
            .dispatch(&prompt(), &panel(vec![chatgpt]))
            .await;

        assert_eq!(
            logger.event_types(),
            vec!["dispatch_started", "provider_settled", "fallback_used"]
        );
        let settled = logger.payloads("provider_settled");
        assert_eq!(settled[0]["provider"], "ChatGPT");
        assert_eq!(settled[0]["status"], "success");
    }
}
