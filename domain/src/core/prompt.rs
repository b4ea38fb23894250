//! Prompt value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// User text to be answered by the panel (Value Object)
///
/// A `Prompt` is never empty or whitespace-only. Construction is the
/// validation point: once a `Prompt` exists, every provider call built
/// from it carries usable text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Prompt {
    content: String,
}

impl Prompt {
    /// Create a prompt, rejecting empty or whitespace-only text
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            Err(DomainError::EmptyPrompt)
        } else {
            Ok(Self { content })
        }
    }

    /// Get the prompt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Prompt {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Prompt::try_new(s)
    }
}

impl TryFrom<&str> for Prompt {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Prompt::try_new(s)
    }
}

impl From<Prompt> for String {
    fn from(p: Prompt) -> Self {
        p.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_creation() {
        let p = Prompt::try_new("What is the capital of France?").unwrap();
        assert_eq!(p.content(), "What is the capital of France?");
    }

    #[test]
    fn test_empty_prompt_rejected() {
        assert_eq!(Prompt::try_new(""), Err(DomainError::EmptyPrompt));
        assert_eq!(Prompt::try_new("  \n\t"), Err(DomainError::EmptyPrompt));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<Prompt, _> = serde_json::from_str("\"hello\"");
        assert!(ok.is_ok());

        let err: Result<Prompt, _> = serde_json::from_str("\"   \"");
        assert!(err.is_err());
    }
}
