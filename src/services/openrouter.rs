// src/services/openrouter.rs
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

#[derive(Debug, thiserror::Error)]
pub enum OpenRouterError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Connection settings for the OpenRouter chat-completion API, read from the
/// environment once at startup.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl OpenRouterConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "deepseek/deepseek-r1:free".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u32,
}

/// Client for the OpenRouter chat-completion endpoint
#[derive(Debug)]
pub struct OpenRouterService {
    config: OpenRouterConfig,
    client: Client,
}

impl OpenRouterService {
    pub fn new(config: OpenRouterConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(180))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    /// Run a single chat completion and return the assistant's message content.
    ///
    /// Exactly one synchronous round trip: any transport failure or non-2xx
    /// status fails the whole request. No retries, no backoff.
    pub async fn complete(&self, prompt: &str) -> Result<String, OpenRouterError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.3,
            max_tokens: 1000,
        };

        debug!(model = %self.config.model, "Sending chat completion request");

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("HTTP-Referer", "http://localhost:3002")
            .header("X-Title", "Resume Builder")
            .json(&request)
            .send()
            .await
            .map_err(|e| OpenRouterError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Chat completion request failed");
            return Err(OpenRouterError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| OpenRouterError::InvalidResponse(e.to_string()))?;

        if let Some(usage) = &completion.usage {
            info!(
                model = %self.config.model,
                tokens_used = usage.total_tokens,
                "Chat completion finished"
            );
        }

        completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| OpenRouterError::InvalidResponse("No choices in response".to_string()))
    }
}
