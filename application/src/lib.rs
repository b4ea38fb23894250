//! Application layer for ai-panel
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod panel;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{DispatchConfig, SummaryParams};
pub use panel::{FallbackPolicy, FallbackRule, FallbackTable, NoFallback, ProviderPanel};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{NoProgress, ProgressNotifier},
    provider_client::ProviderClient,
};
pub use use_cases::dispatch::{DispatchError, Orchestrator};
pub use use_cases::run_panel::{RunPanelError, RunPanelInput, RunPanelUseCase};
pub use use_cases::summarize::Summarizer;
