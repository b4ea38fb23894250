//! Locally hosted model adapter (Ollama `/api/generate`)

use super::http::{HttpTransport, extract_text};
use async_trait::async_trait;
use panel_application::ProviderClient;
use panel_domain::{ProviderId, ProviderRequest, ProviderResult};
use serde_json::{Value, json};

const TEXT_POINTER: &str = "/response";

/// Ollama client; no authentication, streaming disabled
pub struct OllamaClient {
    id: ProviderId,
    transport: HttpTransport,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(
        id: ProviderId,
        transport: HttpTransport,
        base_url: &str,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id,
            transport,
            endpoint: format!("{}/api/generate", base_url.trim_end_matches('/')),
            model: model.into(),
        }
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        })
    }
}

#[async_trait]
impl ProviderClient for OllamaClient {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    async fn call(&self, request: &ProviderRequest) -> ProviderResult {
        let http = self
            .transport
            .post(&self.endpoint)
            .json(&self.request_body(request.prompt()));

        self.transport
            .send_json(http, request.timeout())
            .await
            .and_then(|body| extract_text(&body, TEXT_POINTER))
            .into()
    }
}
