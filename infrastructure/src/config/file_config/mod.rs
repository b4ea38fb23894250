//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application config
//! (`DispatchConfig`, `SummaryParams`) and provider clients by the
//! [`ProviderRegistry`](crate::providers::ProviderRegistry).

mod output;
mod panel;
mod providers;

pub use output::{FileLoggingConfig, FileOutputConfig, FileServerConfig};
pub use panel::{FileBackoffConfig, FileBackoffKind, FilePanelConfig, FileSummaryConfig};
pub use providers::{FileFallbackRule, FileProviderConfig, FileProvidersConfig};

use crate::providers::ProviderKind;
use panel_domain::FailureKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    UnknownProvider { field: String, value: String },
    DuplicateProvider { value: String },
    DuplicateLabel { value: String },
    EmptyPanel,
    InvalidFailureKind { field: String, value: String },
    ZeroTimeout { field: String },
    /// A rule that can never apply
    IneffectiveFallback { provider: String },
    SmallSummaryLimit { value: usize },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    fn error(code: ConfigIssueCode, message: String) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message,
        }
    }

    fn warning(code: ConfigIssueCode, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Summary inputs below this many characters are almost always reduced
const SMALL_SUMMARY_LIMIT: usize = 2_000;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider panel and dispatch settings
    pub panel: FilePanelConfig,
    /// Summary stage settings
    pub summary: FileSummaryConfig,
    /// Per-provider connection settings
    pub providers: FileProvidersConfig,
    /// Fallback table, checked in order
    pub fallback: Vec<FileFallbackRule>,
    /// Output settings
    pub output: FileOutputConfig,
    /// HTTP server settings
    pub server: FileServerConfig,
    /// Conversation log settings
    pub logging: FileLoggingConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            panel: FilePanelConfig::default(),
            summary: FileSummaryConfig::default(),
            providers: FileProvidersConfig::default(),
            fallback: FileFallbackRule::defaults(),
            output: FileOutputConfig::default(),
            server: FileServerConfig::default(),
            logging: FileLoggingConfig::default(),
        }
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks provider names, duplicate providers and labels on the panel,
    /// fallback rules, and timeouts.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Panel providers
        if let Some(names) = &self.panel.providers {
            if names.is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyPanel,
                    "panel.providers is empty; at least one provider is required".to_string(),
                ));
            }
            let mut kinds = HashSet::new();
            let mut labels = HashSet::new();
            for name in names {
                let Some(kind) = parse_provider(&mut issues, "panel.providers", name) else {
                    continue;
                };
                if !kinds.insert(kind) {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::DuplicateProvider {
                            value: name.clone(),
                        },
                        format!("panel.providers: '{}' is listed more than once", name),
                    ));
                    continue;
                }
                let label = kind.resolve(&self.providers).label;
                if !labels.insert(label.clone()) {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::DuplicateLabel {
                            value: label.clone(),
                        },
                        format!("panel.providers: label '{}' is used by two providers", label),
                    ));
                }
            }
        }

        // 2. Timeouts
        for (field, secs) in [
            ("panel.timeout_secs", self.panel.timeout_secs),
            ("summary.timeout_secs", self.summary.timeout_secs),
        ] {
            if secs == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroTimeout {
                        field: field.to_string(),
                    },
                    format!("{} cannot be 0", field),
                ));
            }
        }

        // 3. Summary backend
        if self.summary.enabled {
            parse_provider(&mut issues, "summary.provider", &self.summary.provider);
            if self.summary.max_input_chars < SMALL_SUMMARY_LIMIT {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::SmallSummaryLimit {
                        value: self.summary.max_input_chars,
                    },
                    format!(
                        "summary.max_input_chars = {} is small; most summaries will be chunked or truncated",
                        self.summary.max_input_chars
                    ),
                ));
            }
        }

        // 4. Fallback rules
        for rule in &self.fallback {
            let from = parse_provider(&mut issues, "fallback.provider", &rule.provider);
            let to = parse_provider(&mut issues, "fallback.to", &rule.to);
            for kind in &rule.on {
                if kind.parse::<FailureKind>().is_err() {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::InvalidFailureKind {
                            field: "fallback.on".to_string(),
                            value: kind.clone(),
                        },
                        format!(
                            "fallback.on: unknown failure kind '{}' (valid: {})",
                            kind,
                            FailureKind::ALL
                                .iter()
                                .map(|k| k.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        ),
                    ));
                }
            }
            if rule.on.is_empty() || (from.is_some() && from == to) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::IneffectiveFallback {
                        provider: rule.provider.clone(),
                    },
                    format!(
                        "fallback rule for '{}' can never apply and is ignored",
                        rule.provider
                    ),
                ));
            }
        }

        issues
    }

    /// Run [`validate`](Self::validate) and fail on any error-level issue.
    ///
    /// Returns the remaining warnings.
    pub fn ensure_valid(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) = self
            .validate()
            .into_iter()
            .partition(|issue| issue.severity == Severity::Error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigValidationError::Invalid(
                errors.into_iter().map(|issue| issue.message).collect(),
            ))
        }
    }
}

fn parse_provider(issues: &mut Vec<ConfigIssue>, field: &str, name: &str) -> Option<ProviderKind> {
    match name.parse::<ProviderKind>() {
        Ok(kind) => Some(kind),
        Err(_) => {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::UnknownProvider {
                    field: field.to_string(),
                    value: name.to_string(),
                },
                format!(
                    "{}: unknown provider '{}' (valid: gemini, chatgpt, perplexity, local)",
                    field, name
                ),
            ));
            None
        }
    }
}
