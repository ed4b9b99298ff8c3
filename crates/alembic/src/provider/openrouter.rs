//! OpenRouter chat API provider implementation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AlembicError, Result};
use crate::plan::PreprocessingPlan;
use crate::summary::DatasetSummary;

use super::prompts;
use super::provider::{parse_plan_response, PlanProvider, ProviderConfig};

/// OpenRouter API endpoint.
const API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Plan provider backed by the OpenRouter chat API.
pub struct OpenRouterProvider {
    client: Client,
    api_key: String,
    config: ProviderConfig,
}

impl OpenRouterProvider {
    /// Create a new provider with the given API key and default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ProviderConfig::default())
    }

    /// Create a new provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AlembicError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create from the `OPENROUTER_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY").map_err(|_| {
            AlembicError::Config("OPENROUTER_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| AlembicError::Config(format!("invalid API key: {}", e)))?,
        );
        Ok(headers)
    }

    /// Send a chat completion request and return the assistant text.
    fn send_message(&self, user_prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                {
                    "role": "system",
                    "content": prompts::system_prompt()
                },
                {
                    "role": "user",
                    "content": user_prompt
                }
            ]
        });

        let response = self
            .client
            .post(API_URL)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| AlembicError::Provider(format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(AlembicError::Provider(format!(
                "OpenRouter API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: ChatResponse = response
            .json()
            .map_err(|e| AlembicError::Provider(format!("failed to parse API response: {}", e)))?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AlembicError::Provider("no response from OpenRouter".to_string()))
    }
}

impl PlanProvider for OpenRouterProvider {
    fn propose(&self, summary: &DatasetSummary) -> Result<PreprocessingPlan> {
        let prompt = prompts::plan_prompt(summary)?;
        let response = self.send_message(&prompt)?;
        parse_plan_response(&response)
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "openrouter"
    }
}

/// Chat completion response structure.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}
