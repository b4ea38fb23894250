//! Summary stage
//!
//! Turns an [`AggregateResult`] into one synthesized answer through a
//! designated summarization backend. Input that does not fit the backend is
//! reduced map-then-combine; when that still does not fit, it is truncated
//! and the loss is logged.

use crate::config::SummaryParams;
use crate::ports::provider_client::ProviderClient;
use crate::use_cases::shared::guarded_call;
use futures::future::join_all;
use panel_domain::core::string::{char_len, truncate};
use panel_domain::{
    AggregateResult, PromptTemplate, ProviderFailure, ProviderId, ProviderRequest,
    ProviderResult, SummaryInput, SummaryResult, chunk_sections,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Second-stage synthesis over the aggregated provider text
pub struct Summarizer {
    client: Arc<dyn ProviderClient>,
    params: SummaryParams,
}

impl Summarizer {
    pub fn new(client: Arc<dyn ProviderClient>, params: SummaryParams) -> Self {
        Self { client, params }
    }

    /// Backend that writes the summary
    pub fn provider(&self) -> &ProviderId {
        self.client.id()
    }

    pub fn params(&self) -> &SummaryParams {
        &self.params
    }

    /// Single-prompt form of the summarizer input.
    ///
    /// Deterministic: the same aggregate always yields the same text.
    pub fn build_prompt(aggregate: &AggregateResult) -> String {
        PromptTemplate::summary_prompt(&PromptTemplate::sections(aggregate).concat())
    }

    pub async fn summarize(&self, aggregate: &AggregateResult) -> SummaryResult {
        if aggregate.successful().next().is_none() {
            info!("No provider answered, skipping summary call");
            return SummaryResult::Failure(ProviderFailure::unavailable(
                "no provider produced a response to summarize",
            ));
        }

        let limit = self.params.max_input_chars;
        let prompt = Self::build_prompt(aggregate);
        if char_len(&prompt) <= limit {
            debug!("Summarizing {} chars in one call", char_len(&prompt));
            return match self.call(prompt).await {
                Ok(text) => SummaryResult::success(text, SummaryInput::Direct),
                Err(failure) => SummaryResult::Failure(failure),
            };
        }

        info!(
            "Summary input of {} chars exceeds limit of {}, reducing",
            char_len(&prompt),
            limit
        );
        match self.reduce(PromptTemplate::sections(aggregate)).await {
            Ok((text, input)) => SummaryResult::success(text, input),
            Err(failure) => SummaryResult::Failure(failure),
        }
    }

    /// Map-reduce over oversized input, truncating as a last resort.
    async fn reduce(
        &self,
        sections: Vec<String>,
    ) -> Result<(String, SummaryInput), ProviderFailure> {
        let limit = self.params.max_input_chars;
        let mut pieces = sections;
        let mut first_chunks = 0;
        let mut rounds = 0;

        while rounds < self.params.max_reduce_rounds {
            // Budget for the worst case part numbering, so no chunk prompt overflows.
            let budget = limit.saturating_sub(PromptTemplate::chunk_overhead(usize::MAX));
            if budget == 0 {
                break;
            }
            let chunks = chunk_sections(&pieces, budget);
            if rounds == 0 {
                first_chunks = chunks.len();
            }
            rounds += 1;
            debug!("Reduce round {}: {} chunks", rounds, chunks.len());

            pieces = self.map_chunks(&chunks).await?;

            let combined = PromptTemplate::combine_prompt(&pieces);
            if char_len(&combined) <= limit {
                let text = self.call(combined).await?;
                return Ok((
                    text,
                    SummaryInput::Reduced {
                        chunks: first_chunks,
                        rounds,
                    },
                ));
            }
        }

        let prompt = if rounds == 0 {
            PromptTemplate::summary_prompt(&pieces.concat())
        } else {
            PromptTemplate::combine_prompt(&pieces)
        };
        warn!(
            "Summary input truncated from {} to {} chars; some provider text is lost",
            char_len(&prompt),
            limit
        );
        let text = self.call(truncate(&prompt, limit)).await?;
        Ok((text, SummaryInput::Truncated))
    }

    /// Summarize every chunk concurrently, keeping chunk order.
    async fn map_chunks(&self, chunks: &[String]) -> Result<Vec<String>, ProviderFailure> {
        let total = chunks.len();
        let calls = chunks.iter().enumerate().map(|(i, chunk)| {
            self.call(PromptTemplate::chunk_prompt(chunk, i + 1, total))
        });
        join_all(calls).await.into_iter().collect()
    }

    async fn call(&self, prompt: String) -> Result<String, ProviderFailure> {
        let request = ProviderRequest::new(prompt, self.params.timeout);
        match guarded_call(self.client.as_ref(), &request).await {
            ProviderResult::Success { text } => Ok(text),
            ProviderResult::Failure(failure) => {
                warn!("Summary call to {} failed: {}", self.client.id(), failure);
                Err(failure)
            }
        }
    }
}
