//! Shared utilities for use cases.
//!
//! Contains cancellation checking and the timeout-guarded provider call
//! used by both the dispatch and summary stages.

use crate::ports::provider_client::ProviderClient;
use panel_domain::{ProviderFailure, ProviderRequest, ProviderResult};
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
pub(crate) fn is_cancelled(token: Option<&CancellationToken>) -> bool {
    token.is_some_and(|t| t.is_cancelled())
}

/// Call a provider, bounded by the request timeout.
///
/// Adapters are expected to honor the timeout themselves; this guard makes
/// sure a misbehaving one still returns `Timeout` instead of hanging the
/// slot. A success with blank text is reported as `MalformedResponse`.
pub(crate) async fn guarded_call(
    client: &dyn ProviderClient,
    request: &ProviderRequest,
) -> ProviderResult {
    match tokio::time::timeout(request.timeout(), client.call(request)).await {
        Ok(ProviderResult::Success { text }) if text.trim().is_empty() => {
            ProviderResult::Failure(ProviderFailure::malformed("response text is empty"))
        }
        Ok(result) => result,
        Err(_) => ProviderResult::Failure(ProviderFailure::timeout(format!(
            "no response within {}ms",
            request.timeout().as_millis()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;
    use panel_domain::FailureKind;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_guarded_call_times_out() {
        let client = ScriptedClient::new("Slow", ProviderResult::success("late"))
            .delay(Duration::from_secs(10));
        let request = ProviderRequest::new("q", Duration::from_millis(200));

        let result = guarded_call(&client, &request).await;
        assert_eq!(result.failure_kind(), Some(FailureKind::Timeout));
    }

    #[tokio::test]
    async fn test_blank_success_is_malformed() {
        let client = ScriptedClient::new("Blank", ProviderResult::success("  \n"));
        let request = ProviderRequest::new("q", Duration::from_secs(1));

        let result = guarded_call(&client, &request).await;
        assert_eq!(result.failure_kind(), Some(FailureKind::MalformedResponse));
    }

    #[test]
    fn test_is_cancelled() {
        let token = CancellationToken::new();
        assert!(!is_cancelled(None));
        assert!(!is_cancelled(Some(&token)));
        token.cancel();
        assert!(is_cancelled(Some(&token)));
    }
}
