//! Run Panel use case
//!
//! Orchestrates the full flow for one user request: validate, dispatch to
//! the panel, then summarize the aggregate.

use crate::panel::ProviderPanel;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::dispatch::{DispatchError, Orchestrator};
use crate::use_cases::summarize::Summarizer;
use panel_domain::{DomainError, FinalResponse, Prompt, Stage, SummaryInput, SummaryResult};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors that can occur during a panel run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunPanelError {
    #[error("{0}")]
    Validation(#[from] DomainError),

    #[error("Request cancelled")]
    Cancelled,
}

impl From<DispatchError> for RunPanelError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Cancelled => RunPanelError::Cancelled,
        }
    }
}

/// Input for the RunPanel use case
#[derive(Debug, Clone)]
pub struct RunPanelInput {
    /// Raw user text, validated before any provider is called
    pub text: String,
    /// Subset of the panel to ask, in order; empty means the whole panel
    pub providers: Vec<String>,
    /// Whether to run the summary stage
    pub summarize: bool,
}

impl RunPanelInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            providers: Vec::new(),
            summarize: true,
        }
    }

    pub fn with_providers(mut self, providers: Vec<String>) -> Self {
        self.providers = providers;
        self
    }

    pub fn without_summary(mut self) -> Self {
        self.summarize = false;
        self
    }
}

/// Use case for asking the whole panel and summarizing the answers
pub struct RunPanelUseCase {
    panel: ProviderPanel,
    orchestrator: Orchestrator,
    summarizer: Option<Summarizer>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl RunPanelUseCase {
    pub fn new(panel: ProviderPanel, orchestrator: Orchestrator) -> Self {
        Self {
            panel,
            orchestrator,
            summarizer: None,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_summarizer(mut self, summarizer: Summarizer) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn panel(&self) -> &ProviderPanel {
        &self.panel
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunPanelInput) -> Result<FinalResponse, RunPanelError> {
        self.execute_with_progress(input, &NoProgress, None).await
    }

    /// Execute the use case with progress callbacks and cancellation
    pub async fn execute_with_progress(
        &self,
        input: RunPanelInput,
        progress: &dyn ProgressNotifier,
        cancellation: Option<&CancellationToken>,
    ) -> Result<FinalResponse, RunPanelError> {
        let prompt = Prompt::try_new(input.text)?;
        let panel = self.panel.select(&input.providers)?;

        info!("Starting panel run with {} providers", panel.len());

        // Stage 1: Dispatch
        let aggregate = self
            .orchestrator
            .dispatch_with_progress(&prompt, &panel, progress, cancellation)
            .await?;

        // Stage 2: Summary
        let summary = match (&self.summarizer, input.summarize) {
            (Some(summarizer), true) => {
                progress.on_stage_start(Stage::Summary, 1);
                let summary = match cancellation {
                    Some(token) => tokio::select! {
                        biased;
                        _ = token.cancelled() => return Err(RunPanelError::Cancelled),
                        summary = summarizer.summarize(&aggregate) => summary,
                    },
                    None => summarizer.summarize(&aggregate).await,
                };
                progress.on_stage_complete(Stage::Summary);
                self.log_summary(summarizer, &summary);
                summary
            }
            _ => {
                debug!("Skipping summary stage");
                SummaryResult::Skipped
            }
        };

        Ok(FinalResponse::new(aggregate, summary))
    }

    fn log_summary(&self, summarizer: &Summarizer, summary: &SummaryResult) {
        let input = match summary {
            SummaryResult::Success { input, .. } => match input {
                SummaryInput::Direct => "direct",
                SummaryInput::Reduced { .. } => "reduced",
                SummaryInput::Truncated => "truncated",
            },
            _ => "none",
        };
        self.conversation_logger.log(ConversationEvent::new(
            "summary_completed",
            json!({
                "provider": summarizer.provider().as_str(),
                "success": summary.is_success(),
                "input": input,
                "kind": summary.failure_detail().map(|f| f.kind.as_str()),
            }),
        ));
    }
}
