//! Retry policy for provider slots.
//!
//! [`RetryPolicy`] is injected into the orchestrator; each slot tracks its
//! own consumption with a [`RetryBudget`]. Only transient kinds are retried
//! against the same provider. `MalformedResponse` gets a single extra
//! attempt, and `RateLimited` / `Unauthorized` are handed to the fallback
//! policy without retrying.

use crate::provider::failure::FailureKind;
use std::time::Duration;

/// Delay schedule between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// The same delay before every retry
    Fixed(Duration),
    /// `base * 2^(retry - 1)`, capped at `max`
    Exponential { base: Duration, max: Duration },
}

impl Backoff {
    /// No delay between attempts
    pub fn none() -> Self {
        Backoff::Fixed(Duration::ZERO)
    }

    /// Delay before the given retry (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base, max } => {
                let factor = 2u32.saturating_pow(retry.saturating_sub(1));
                base.saturating_mul(factor).min(max)
            }
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Exponential {
            base: Duration::from_millis(500),
            max: Duration::from_secs(4),
        }
    }
}

/// Bounded retry policy applied to every slot independently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum retries after the first attempt
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    /// Extra attempts granted after a `MalformedResponse`
    pub const MALFORMED_RETRY_LIMIT: u32 = 1;

    pub fn new(max_retries: u32, backoff: Backoff) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Single attempt, never retried
    pub fn none() -> Self {
        Self::new(0, Backoff::none())
    }

    /// Start tracking retries for one slot
    pub fn budget(&self) -> RetryBudget {
        RetryBudget {
            policy: *self,
            retries: 0,
            malformed_retries: 0,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETRIES, Backoff::default())
    }
}

/// Per-slot retry accounting
#[derive(Debug, Clone)]
pub struct RetryBudget {
    policy: RetryPolicy,
    retries: u32,
    malformed_retries: u32,
}

impl RetryBudget {
    /// Record a failed attempt and decide whether to retry.
    ///
    /// Returns the delay to wait before the next attempt, or `None` when
    /// the slot must stop retrying.
    pub fn next_delay(&mut self, kind: FailureKind) -> Option<Duration> {
        if self.retries >= self.policy.max_retries {
            return None;
        }
        let allowed = match kind {
            FailureKind::Timeout | FailureKind::Unavailable => true,
            FailureKind::MalformedResponse => {
                self.malformed_retries < RetryPolicy::MALFORMED_RETRY_LIMIT
            }
            FailureKind::RateLimited | FailureKind::Unauthorized => false,
        };
        if !allowed {
            return None;
        }
        if kind == FailureKind::MalformedResponse {
            self.malformed_retries += 1;
        }
        self.retries += 1;
        Some(self.policy.backoff.delay_for(self.retries))
    }

    /// Retries consumed so far
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Attempts made so far, counting the first one
    pub fn attempts(&self) -> u32 {
        self.retries + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_backoff() {
        let backoff = Backoff::Fixed(Duration::from_millis(250));
        assert_eq!(backoff.delay_for(1), Duration::from_millis(250));
        assert_eq!(backoff.delay_for(5), Duration::from_millis(250));
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_millis(350),
        };
        assert_eq!(backoff.delay_for(1), Duration::from_millis(100));
        assert_eq!(backoff.delay_for(2), Duration::from_millis(200));
        assert_eq!(backoff.delay_for(3), Duration::from_millis(350));
        assert_eq!(backoff.delay_for(40), Duration::from_millis(350));
    }

    #[test]
    fn test_transient_failures_retry_up_to_limit() {
        let mut budget = RetryPolicy::new(3, Backoff::none()).budget();
        assert!(budget.next_delay(FailureKind::Timeout).is_some());
        assert!(budget.next_delay(FailureKind::Unavailable).is_some());
        assert!(budget.next_delay(FailureKind::Timeout).is_some());
        assert!(budget.next_delay(FailureKind::Timeout).is_none());
        assert_eq!(budget.attempts(), 4);
    }

    #[test]
    fn test_rate_limited_and_unauthorized_never_retry() {
        let mut budget = RetryPolicy::default().budget();
        assert!(budget.next_delay(FailureKind::RateLimited).is_none());
        assert!(budget.next_delay(FailureKind::Unauthorized).is_none());
        assert_eq!(budget.retries(), 0);
    }

    #[test]
    fn test_malformed_retried_once() {
        let mut budget = RetryPolicy::default().budget();
        assert!(budget.next_delay(FailureKind::MalformedResponse).is_some());
        assert!(budget.next_delay(FailureKind::MalformedResponse).is_none());
        // A transient failure can still use the remaining budget
        assert!(budget.next_delay(FailureKind::Timeout).is_some());
    }

    #[test]
    fn test_no_retry_policy() {
        let mut budget = RetryPolicy::none().budget();
        assert!(budget.next_delay(FailureKind::Timeout).is_none());
        assert_eq!(budget.attempts(), 1);
    }
}
