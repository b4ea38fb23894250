//! The configured provider panel and its fallback policy.

pub mod fallback;
pub mod provider_panel;

pub use fallback::{FallbackPolicy, FallbackRule, FallbackTable, NoFallback};
pub use provider_panel::ProviderPanel;
