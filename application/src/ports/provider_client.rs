//! Provider client port
//!
//! Defines the single capability every natural-language backend exposes
//! to the orchestration core.

use async_trait::async_trait;
use panel_domain::{ProviderId, ProviderRequest, ProviderResult};

/// One natural-language backend.
///
/// Implementations (adapters) live in the infrastructure layer. A call
/// makes exactly one outbound request, never retries, and returns once
/// the request's timeout elapses. Every failure is returned as a
/// classified [`ProviderResult::Failure`], never as a panic or error.
///
/// Clients are shared across concurrent requests behind `Arc` and must
/// not keep per-call state.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Stable name of this backend, used as its aggregation key
    fn id(&self) -> &ProviderId;

    /// Turn a prompt into text or a classified failure
    async fn call(&self, request: &ProviderRequest) -> ProviderResult;
}
