//! Orchestration value objects - immutable result types for a panel run.
//!
//! - [`SummaryResult`] - outcome of the second-stage synthesis call
//! - [`SummaryInput`] - how the aggregated text was fed to the summarizer
//! - [`FinalResponse`] - per-provider map plus summary, returned to callers

use super::aggregate::AggregateResult;
use crate::provider::failure::{FailureKind, ProviderFailure};
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

/// Sentinel text for a failed summary
pub fn summary_sentinel(kind: FailureKind) -> String {
    format!("⚠ Summary unavailable: {}", kind)
}

/// How the aggregated text reached the summarization backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryInput {
    /// Sent as a single prompt
    Direct,
    /// Chunked, summarized per chunk, then combined
    Reduced { chunks: usize, rounds: u32 },
    /// Cut down to fit the backend's limit; some provider text was dropped
    Truncated,
}

/// Outcome of summarizing one [`AggregateResult`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryResult {
    Success { text: String, input: SummaryInput },
    Failure(ProviderFailure),
    /// Summarization was not requested for this run
    Skipped,
}

impl SummaryResult {
    pub fn success(text: impl Into<String>, input: SummaryInput) -> Self {
        SummaryResult::Success {
            text: text.into(),
            input,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SummaryResult::Success { .. })
    }

    /// Summary text, the failure sentinel, or `None` when skipped
    pub fn display_text(&self) -> Option<String> {
        match self {
            SummaryResult::Success { text, .. } => Some(text.clone()),
            SummaryResult::Failure(f) => Some(summary_sentinel(f.kind)),
            SummaryResult::Skipped => None,
        }
    }

    pub fn failure_detail(&self) -> Option<&ProviderFailure> {
        match self {
            SummaryResult::Failure(f) => Some(f),
            _ => None,
        }
    }
}

/// Complete result of one panel run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalResponse {
    aggregate: AggregateResult,
    summary: SummaryResult,
}

impl FinalResponse {
    pub fn new(aggregate: AggregateResult, summary: SummaryResult) -> Self {
        Self { aggregate, summary }
    }

    pub fn aggregate(&self) -> &AggregateResult {
        &self.aggregate
    }

    pub fn summary(&self) -> &SummaryResult {
        &self.summary
    }
}

struct FallbackMap<'a>(&'a AggregateResult);

impl Serialize for FallbackMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (provider, fallback) in self.0.fallbacks() {
            map.serialize_entry(provider.as_str(), fallback.as_str())?;
        }
        map.end()
    }
}

/// Wire shape: `{"model_responses": {..}, "summary": .., "fallbacks": {..}}`
impl Serialize for FinalResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FinalResponse", 3)?;
        state.serialize_field("model_responses", &self.aggregate)?;
        state.serialize_field("summary", &self.summary.display_text())?;
        state.serialize_field("fallbacks", &FallbackMap(&self.aggregate))?;
        state.end()
    }
}
