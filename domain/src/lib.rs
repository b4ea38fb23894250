//! Domain layer for ai-panel
//!
//! This crate contains the value objects and pure rules of the
//! orchestration core. It has no dependencies on I/O, async runtimes,
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Provider**: one natural-language backend, named by a [`ProviderId`]
//! - **ProviderResult**: tagged outcome of one call, `Success` or a
//!   classified `Failure`
//! - **AggregateResult**: one entry per configured provider, in panel order,
//!   failures replaced by sentinel text
//! - **FinalResponse**: the aggregate plus the synthesized summary

pub mod config;
pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod provider;

// Re-export commonly used types
pub use config::OutputFormat;
pub use crate::core::{error::DomainError, prompt::Prompt, provider_id::ProviderId};
pub use orchestration::{
    aggregate::{
        AggregateEntry, AggregateResult, ResponseAggregator, SettledSlot, failure_sentinel,
    },
    entities::Stage,
    retry::{Backoff, RetryBudget, RetryPolicy},
    value_objects::{FinalResponse, SummaryInput, SummaryResult, summary_sentinel},
};
pub use prompt::{PromptTemplate, chunk_sections};
pub use provider::{
    failure::{FailureKind, ProviderFailure},
    result::{ProviderRequest, ProviderResult},
};
