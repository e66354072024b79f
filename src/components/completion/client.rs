use super::models::{Response, ResponseRequest};
use crate::config::Config;
use crate::error::{completion_error, AppResult};
use async_trait::async_trait;
use reqwest::Client;

/// The completion endpoint, implemented over HTTP in production and scripted
/// in tests
#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn create_response(&self, request: ResponseRequest) -> AppResult<Response>;
}

/// HTTP client for an OpenAI-style responses endpoint
pub struct HttpCompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpCompletionClient {
    pub fn new(config: &Config, client: Client) -> Self {
        let endpoint = format!(
            "{}/responses",
            config.completion_base_url.trim_end_matches('/')
        );
        Self {
            client,
            endpoint,
            api_key: config.openai_api_key.clone(),
        }
    }
}

#[async_trait]
impl CompletionApi for HttpCompletionClient {
    async fn create_response(&self, request: ResponseRequest) -> AppResult<Response> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| completion_error(&format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(completion_error(&format!(
                "Completion request failed: HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json::<Response>()
            .await
            .map_err(|e| completion_error(&format!("Failed to parse completion response: {}", e)))
    }
}
