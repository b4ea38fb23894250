//! Provider request and result value objects

use super::failure::{FailureKind, ProviderFailure};
use crate::core::prompt::Prompt;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outbound unit of work for one provider call.
///
/// Built once per incoming request and shared read-only by every slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    prompt: String,
    timeout: Duration,
}

impl ProviderRequest {
    /// Build a request from already-validated prompt text.
    pub fn new(prompt: impl Into<String>, timeout: Duration) -> Self {
        Self {
            prompt: prompt.into(),
            timeout,
        }
    }

    /// Build a request from a user prompt.
    pub fn for_prompt(prompt: &Prompt, timeout: Duration) -> Self {
        Self::new(prompt.content(), timeout)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Outcome of one provider call. Exactly one variant holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProviderResult {
    Success { text: String },
    Failure(ProviderFailure),
}

impl ProviderResult {
    pub fn success(text: impl Into<String>) -> Self {
        ProviderResult::Success { text: text.into() }
    }

    pub fn failure(kind: FailureKind, detail: impl Into<String>) -> Self {
        ProviderResult::Failure(ProviderFailure::new(kind, detail))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProviderResult::Success { .. })
    }

    /// The response text, if the call succeeded
    pub fn text(&self) -> Option<&str> {
        match self {
            ProviderResult::Success { text } => Some(text),
            ProviderResult::Failure(_) => None,
        }
    }

    /// The failure, if the call failed
    pub fn failure_detail(&self) -> Option<&ProviderFailure> {
        match self {
            ProviderResult::Success { .. } => None,
            ProviderResult::Failure(f) => Some(f),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure_detail().map(|f| f.kind)
    }
}

impl From<ProviderFailure> for ProviderResult {
    fn from(failure: ProviderFailure) -> Self {
        ProviderResult::Failure(failure)
    }
}

impl From<Result<String, ProviderFailure>> for ProviderResult {
    fn from(result: Result<String, ProviderFailure>) -> Self {
        match result {
            Ok(text) => ProviderResult::Success { text },
            Err(failure) => ProviderResult::Failure(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_accessors() {
        let result = ProviderResult::success("Paris.");
        assert!(result.is_success());
        assert_eq!(result.text(), Some("Paris."));
        assert!(result.failure_kind().is_none());
    }

    #[test]
    fn test_failure_accessors() {
        let result = ProviderResult::failure(FailureKind::Timeout, "after 2s");
        assert!(!result.is_success());
        assert!(result.text().is_none());
        assert_eq!(result.failure_kind(), Some(FailureKind::Timeout));
    }

    #[test]
    fn test_serialized_shape_is_tagged() {
        let json = serde_json::to_value(ProviderResult::failure(
            FailureKind::Unavailable,
            "connection refused",
        ))
        .unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "Unavailable");
        assert_eq!(json["detail"], "connection refused");

        let json = serde_json::to_value(ProviderResult::success("hi")).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["text"], "hi");
    }

    #[test]
    fn test_request_from_prompt() {
        let prompt = Prompt::try_new("Capital of France?").unwrap();
        let request = ProviderRequest::for_prompt(&prompt, Duration::from_secs(2));
        assert_eq!(request.prompt(), "Capital of France?");
        assert_eq!(request.timeout(), Duration::from_secs(2));
    }
}
