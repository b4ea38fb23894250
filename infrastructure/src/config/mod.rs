//! Configuration file loading for ai-panel
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AI_PANEL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./panel.toml` or `./.panel.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/ai-panel/config.toml`
//! 5. Fallback: `~/.config/ai-panel/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, ConfigIssueCode, ConfigValidationError, FileBackoffConfig, FileBackoffKind,
    FileConfig, FileFallbackRule, FileLoggingConfig, FileOutputConfig, FilePanelConfig,
    FileProviderConfig, FileProvidersConfig, FileServerConfig, FileSummaryConfig, Severity,
};
pub use loader::ConfigLoader;
