//! Failure classification for provider calls

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a provider call did not produce usable text.
///
/// Retry and fallback decisions key on this classification, so adapters
/// must map their backend's errors onto exactly one of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The call did not complete within its timeout
    Timeout,
    /// Quota or rate exhaustion reported by the backend
    RateLimited,
    /// Credentials missing, invalid or forbidden
    Unauthorized,
    /// Connection failure or non-2xx server response
    Unavailable,
    /// A response arrived but did not contain the expected text
    MalformedResponse,
}

impl FailureKind {
    pub const ALL: [FailureKind; 5] = [
        FailureKind::Timeout,
        FailureKind::RateLimited,
        FailureKind::Unauthorized,
        FailureKind::Unavailable,
        FailureKind::MalformedResponse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "Timeout",
            FailureKind::RateLimited => "RateLimited",
            FailureKind::Unauthorized => "Unauthorized",
            FailureKind::Unavailable => "Unavailable",
            FailureKind::MalformedResponse => "MalformedResponse",
        }
    }

    /// Transient kinds may succeed if the same call is simply repeated.
    pub fn is_transient(&self) -> bool {
        matches!(self, FailureKind::Timeout | FailureKind::Unavailable)
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FailureKind {
    type Err = DomainError;

    /// Accepts `RateLimited`, `rate_limited`, `rate-limited` and so on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "timeout" => Ok(FailureKind::Timeout),
            "ratelimited" | "ratelimit" | "quota" => Ok(FailureKind::RateLimited),
            "unauthorized" | "forbidden" => Ok(FailureKind::Unauthorized),
            "unavailable" => Ok(FailureKind::Unavailable),
            "malformedresponse" | "malformed" => Ok(FailureKind::MalformedResponse),
            _ => Err(DomainError::InvalidFailureKind(s.to_string())),
        }
    }
}

/// A classified provider failure
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {detail}")]
pub struct ProviderFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl ProviderFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, detail)
    }

    pub fn rate_limited(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::RateLimited, detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Unauthorized, detail)
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Unavailable, detail)
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::MalformedResponse, detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_variant_name() {
        assert_eq!(FailureKind::Unavailable.to_string(), "Unavailable");
        assert_eq!(FailureKind::RateLimited.to_string(), "RateLimited");
    }

    #[test]
    fn test_parse_accepts_config_spellings() {
        assert_eq!("rate_limited".parse::<FailureKind>(), Ok(FailureKind::RateLimited));
        assert_eq!("RateLimited".parse::<FailureKind>(), Ok(FailureKind::RateLimited));
        assert_eq!("rate-limited".parse::<FailureKind>(), Ok(FailureKind::RateLimited));
        assert_eq!("malformed".parse::<FailureKind>(), Ok(FailureKind::MalformedResponse));
        assert!("exploded".parse::<FailureKind>().is_err());
    }

    #[test]
    fn test_parse_roundtrips_every_kind() {
        for kind in FailureKind::ALL {
            assert_eq!(kind.as_str().parse::<FailureKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_transient_kinds() {
        assert!(FailureKind::Timeout.is_transient());
        assert!(FailureKind::Unavailable.is_transient());
        assert!(!FailureKind::RateLimited.is_transient());
        assert!(!FailureKind::Unauthorized.is_transient());
        assert!(!FailureKind::MalformedResponse.is_transient());
    }

    #[test]
    fn test_failure_display() {
        let failure = ProviderFailure::rate_limited("HTTP 429");
        assert_eq!(failure.to_string(), "RateLimited: HTTP 429");
    }
}
