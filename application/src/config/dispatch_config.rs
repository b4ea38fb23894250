//! Dispatch and summary parameters - use case control.
//!
//! [`DispatchConfig`] controls the fan-out stage of
//! [`Orchestrator`](crate::use_cases::dispatch::Orchestrator) and
//! [`SummaryParams`] the second-stage
//! [`Summarizer`](crate::use_cases::summarize::Summarizer). Both are built
//! by the infrastructure config loader and are plain values here.

use panel_domain::{Backoff, RetryPolicy};
use std::time::Duration;

/// Fan-out control parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Retry policy applied to every slot independently.
    pub retry: RetryPolicy,
    /// Upper bound on a single provider call.
    pub call_timeout: Duration,
}

impl DispatchConfig {
    pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

    // ==================== Builder Methods ====================

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.retry.backoff = backoff;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            call_timeout: Self::DEFAULT_CALL_TIMEOUT,
        }
    }
}

/// Summarization control parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryParams {
    /// Upper bound on each summarization call.
    pub timeout: Duration,
    /// Largest prompt, in characters, sent to the summarization backend.
    pub max_input_chars: usize,
    /// How many combine rounds map-reduce may run before truncating.
    pub max_reduce_rounds: u32,
}

impl SummaryParams {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);
    pub const DEFAULT_MAX_INPUT_CHARS: usize = 24_000;
    pub const DEFAULT_MAX_REDUCE_ROUNDS: u32 = 2;

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_input_chars(mut self, max: usize) -> Self {
        self.max_input_chars = max;
        self
    }

    pub fn with_max_reduce_rounds(mut self, rounds: u32) -> Self {
        self.max_reduce_rounds = rounds;
        self
    }
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            max_input_chars: Self::DEFAULT_MAX_INPUT_CHARS,
            max_reduce_rounds: Self::DEFAULT_MAX_REDUCE_ROUNDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_defaults() {
        let config = DispatchConfig::default();
        assert_eq!(config.retry.max_retries, RetryPolicy::DEFAULT_MAX_RETRIES);
        assert_eq!(config.call_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_dispatch_builder() {
        let config = DispatchConfig::default()
            .with_max_retries(0)
            .with_backoff(Backoff::Fixed(Duration::from_millis(10)))
            .with_call_timeout(Duration::from_secs(5));

        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.retry.backoff, Backoff::Fixed(Duration::from_millis(10)));
        assert_eq!(config.call_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_summary_builder() {
        let params = SummaryParams::default()
            .with_max_input_chars(500)
            .with_max_reduce_rounds(0);
        assert_eq!(params.max_input_chars, 500);
        assert_eq!(params.max_reduce_rounds, 0);
        assert_eq!(params.timeout, SummaryParams::DEFAULT_TIMEOUT);
    }
}
