//! Google Gemini adapter (`generateContent`)

use super::http::{HttpTransport, extract_text};
use async_trait::async_trait;
use panel_application::ProviderClient;
use panel_domain::{ProviderId, ProviderRequest, ProviderResult};
use serde_json::{Value, json};

const TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

/// Gemini REST client. The API key travels as the `key` query parameter.
pub struct GeminiClient {
    id: ProviderId,
    transport: HttpTransport,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        id: ProviderId,
        transport: HttpTransport,
        base_url: &str,
        model: &str,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            id,
            transport,
            endpoint: format!(
                "{}/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body(prompt: &str) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        })
    }
}

#[async_trait]
impl ProviderClient for GeminiClient {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    async fn call(&self, request: &ProviderRequest) -> ProviderResult {
        let http = self
            .transport
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(request.prompt()));

        self.transport
            .send_json(http, request.timeout())
            .await
            .and_then(|body| extract_text(&body, TEXT_POINTER))
            .into()
    }
}
