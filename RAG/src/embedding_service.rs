use crate::config::Settings;
use crate::models::*;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Turns text into a vector that can be compared against the index.
#[async_trait]
pub trait Embeddings: Send + Sync {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}

/// Sentence-transformer embeddings served by the Hugging Face inference API.
pub struct HuggingFaceEmbeddings {
    client: Client,
    base_url: String,
    model: String,
    token: Option<String>,
}

impl HuggingFaceEmbeddings {
    pub fn new(base_url: &str, model: &str, token: Option<String>) -> Result<Self> {
        if model.trim().is_empty() {
            return Err(anyhow::anyhow!("embedding model name is empty"));
        }

        log::info!("Initializing Hugging Face embeddings with model {}", model);

        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            token,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.hf_inference_url,
            &settings.embedding_model,
            settings.huggingface_token.clone(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}/pipeline/feature-extraction", self.base_url, self.model)
    }
}

#[async_trait]
impl Embeddings for HuggingFaceEmbeddings {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let request = FeatureExtractionRequest {
            inputs: text,
            options: FeatureExtractionOptions { wait_for_model: true },
        };

        let mut builder = self.client.post(self.endpoint()).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow::anyhow!("Hugging Face API error ({}): {}", status, error_text));
        }

        let embedding = match response.json::<FeatureExtractionResponse>().await? {
            FeatureExtractionResponse::Pooled(vector) => vector,
            FeatureExtractionResponse::PerToken(tokens) => mean_pool(&tokens),
        };

        if embedding.is_empty() {
            return Err(anyhow::anyhow!("Hugging Face API returned an empty embedding"));
        }

        log::debug!("Embedded query into {} dimensions", embedding.len());
        Ok(embedding)
    }
}

/// Averages per-token vectors into one sentence vector.
pub fn mean_pool(tokens: &[Vec<f32>]) -> Vec<f32> {
    let dims = tokens.iter().map(|t| t.len()).max().unwrap_or(0);
    if dims == 0 {
        return Vec::new();
    }

    let mut pooled = vec![0.0; dims];
    for token in tokens {
        for (slot, value) in pooled.iter_mut().zip(token.iter()) {
            *slot += value;
        }
    }

    let count = tokens.len() as f32;
    for value in pooled.iter_mut() {
        *value /= count;
    }

    pooled
}
