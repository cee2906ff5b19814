use crate::config::Settings;
use crate::models::*;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

const EMPTY_ANSWER: &str = "No response generated";

/// A hosted chat-completion model, picked per call.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String>;
}

/// Client for Groq's OpenAI-compatible chat completions endpoint.
pub struct ChatGroq {
    client: Client,
    api_key: String,
    base_url: String,
    temperature: Option<f32>,
}

impl ChatGroq {
    /// Sampling is left to the provider's defaults unless `with_temperature` is used.
    pub fn new(api_key: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.groq_api_key, &settings.groq_base_url)
    }
}

#[async_trait]
impl ChatModel for ChatGroq {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            temperature: self.temperature,
        };

        log::debug!("Sending {} messages to Groq model {}", messages.len(), model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow::anyhow!("Groq API error ({}): {}", status, error_text));
        }

        let completion: ChatCompletionResponse = response.json().await?;

        let answer = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_else(|| EMPTY_ANSWER.to_string());

        Ok(answer)
    }
}
