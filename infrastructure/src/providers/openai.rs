//! OpenAI-compatible chat completions adapter.
//!
//! Serves both ChatGPT and Perplexity, which speak the same wire format at
//! different endpoints.

use super::http::{HttpTransport, extract_text};
use async_trait::async_trait;
use panel_application::ProviderClient;
use panel_domain::{ProviderId, ProviderRequest, ProviderResult};
use serde_json::{Value, json};

const TEXT_POINTER: &str = "/choices/0/message/content";

/// Chat completions client with Bearer authentication
pub struct ChatCompletionsClient {
    id: ProviderId,
    transport: HttpTransport,
    endpoint: String,
    model: String,
    api_key: String,
}

impl ChatCompletionsClient {
    pub fn new(
        id: ProviderId,
        transport: HttpTransport,
        base_url: &str,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            id,
            transport,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        })
    }
}

#[async_trait]
impl ProviderClient for ChatCompletionsClient {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    async fn call(&self, request: &ProviderRequest) -> ProviderResult {
        let http = self
            .transport
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request.prompt()));

        self.transport
            .send_json(http, request.timeout())
            .await
            .and_then(|body| extract_text(&body, TEXT_POINTER))
            .into()
    }
}
