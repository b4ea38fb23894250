//! Application-level configuration.
//!
//! - [`DispatchConfig`] - fan-out control (retry policy, per-call timeout)
//! - [`SummaryParams`] - summarization limits

pub mod dispatch_config;

pub use dispatch_config::{DispatchConfig, SummaryParams};
