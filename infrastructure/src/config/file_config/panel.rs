//! Panel and summary configuration from TOML (`[panel]`, `[summary]`)
//!
//! Example configuration:
//!
//! ```toml
//! [panel]
//! providers = ["gemini", "chatgpt", "perplexity"]
//! timeout_secs = 60
//! max_retries = 3
//!
//! [panel.backoff]
//! kind = "exponential"
//! base_ms = 500
//! max_ms = 4000
//!
//! [summary]
//! provider = "chatgpt"
//! max_input_chars = 24000
//! ```

use panel_application::{DispatchConfig, SummaryParams};
use panel_domain::{Backoff, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay schedule kind between retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileBackoffKind {
    Fixed,
    #[default]
    Exponential,
}

/// `[panel.backoff]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackoffConfig {
    pub kind: FileBackoffKind,
    /// Fixed delay, or the first exponential delay
    pub base_ms: u64,
    /// Cap for exponential delays
    pub max_ms: u64,
}

impl Default for FileBackoffConfig {
    fn default() -> Self {
        Self {
            kind: FileBackoffKind::Exponential,
            base_ms: 500,
            max_ms: 4_000,
        }
    }
}

impl FileBackoffConfig {
    pub fn to_backoff(&self) -> Backoff {
        match self.kind {
            FileBackoffKind::Fixed => Backoff::Fixed(Duration::from_millis(self.base_ms)),
            FileBackoffKind::Exponential => Backoff::Exponential {
                base: Duration::from_millis(self.base_ms),
                max: Duration::from_millis(self.max_ms.max(self.base_ms)),
            },
        }
    }
}

/// `[panel]` - which providers to ask and how hard to try
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePanelConfig {
    /// Ordered provider names. When unset, the default panel is used and
    /// providers without credentials are skipped.
    pub providers: Option<Vec<String>>,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
    /// Retries after the first attempt, per provider
    pub max_retries: u32,
    pub backoff: FileBackoffConfig,
}

impl Default for FilePanelConfig {
    fn default() -> Self {
        Self {
            providers: None,
            timeout_secs: DispatchConfig::DEFAULT_CALL_TIMEOUT.as_secs(),
            max_retries: RetryPolicy::DEFAULT_MAX_RETRIES,
            backoff: FileBackoffConfig::default(),
        }
    }
}

impl FilePanelConfig {
    pub fn to_dispatch_config(&self) -> DispatchConfig {
        DispatchConfig::default()
            .with_retry(RetryPolicy::new(self.max_retries, self.backoff.to_backoff()))
            .with_call_timeout(Duration::from_secs(self.timeout_secs))
    }
}

/// `[summary]` - the second-stage synthesis backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSummaryConfig {
    pub enabled: bool,
    /// Provider name of the summarization backend
    pub provider: String,
    pub timeout_secs: u64,
    pub max_input_chars: usize,
    pub max_reduce_rounds: u32,
}

impl Default for FileSummaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: "chatgpt".to_string(),
            timeout_secs: SummaryParams::DEFAULT_TIMEOUT.as_secs(),
            max_input_chars: SummaryParams::DEFAULT_MAX_INPUT_CHARS,
            max_reduce_rounds: SummaryParams::DEFAULT_MAX_REDUCE_ROUNDS,
        }
    }
}

impl FileSummaryConfig {
    pub fn to_summary_params(&self) -> SummaryParams {
        SummaryParams::default()
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_max_input_chars(self.max_input_chars)
            .with_max_reduce_rounds(self.max_reduce_rounds)
    }
}
