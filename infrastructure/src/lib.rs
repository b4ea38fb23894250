//! Infrastructure layer for ai-panel
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: HTTP provider clients, the provider registry,
//! configuration file loading and the JSONL conversation logger.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, ConfigValidationError, FileConfig, FileOutputConfig, Severity,
};
pub use logging::JsonlConversationLogger;
pub use providers::{PanelSetup, ProviderKind, ProviderRegistry, RegistryError};
