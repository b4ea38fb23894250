//! Shared HTTP transport for provider adapters.
//!
//! Sends one JSON request and maps every way it can go wrong onto a
//! [`FailureKind`]. Adapters only build the request and pick the text out
//! of the response body.

use panel_domain::core::string::truncate;
use panel_domain::{FailureKind, ProviderFailure};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Error payload markers that mean quota or rate exhaustion
const RATE_LIMIT_MARKERS: [&str; 4] = [
    "insufficient_quota",
    "resource_exhausted",
    "rate_limit",
    "quota exceeded",
];

/// Longest slice of an error body kept in a failure detail
const DETAIL_BODY_CHARS: usize = 200;

/// Thin wrapper over a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("ai-panel/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Send a request and decode the JSON body of a 2xx response.
    pub async fn send_json(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<Value, ProviderFailure> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderFailure::malformed(format!("response is not JSON: {}", e))
        })
    }
}

/// Map a non-2xx status and its body to a failure.
pub fn classify_status(status: StatusCode, body: &str) -> ProviderFailure {
    let lowered = body.to_lowercase();
    let kind = if status == StatusCode::TOO_MANY_REQUESTS
        || RATE_LIMIT_MARKERS.iter().any(|m| lowered.contains(m))
    {
        FailureKind::RateLimited
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        FailureKind::Unauthorized
    } else {
        FailureKind::Unavailable
    };
    ProviderFailure::new(
        kind,
        format!(
            "HTTP {}: {}",
            status.as_u16(),
            truncate(body.trim(), DETAIL_BODY_CHARS)
        ),
    )
}

fn classify_transport_error(err: reqwest::Error) -> ProviderFailure {
    if err.is_timeout() {
        ProviderFailure::timeout(err.to_string())
    } else if err.is_connect() {
        ProviderFailure::unavailable(format!("connection failed: {}", err))
    } else {
        ProviderFailure::unavailable(err.to_string())
    }
}

/// Pull the response text out of a decoded body by JSON pointer.
///
/// A missing field, a non-string value, or blank text is a
/// `MalformedResponse`.
pub fn extract_text(body: &Value, pointer: &str) -> Result<String, ProviderFailure> {
    match body.pointer(pointer).and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        Some(_) => Err(ProviderFailure::malformed("response text is empty")),
        None => Err(ProviderFailure::malformed(format!(
            "response has no text at {}",
            pointer
        ))),
    }
}
