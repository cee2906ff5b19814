use crate::config::Settings;
use crate::embedding_service::Embeddings;
use crate::models::*;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

const PINECONE_API_VERSION: &str = "2024-07";
const TEXT_KEY: &str = "text";

/// Anything that can hand back the documents most relevant to a query.
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>>;
}

/// Client for an existing Pinecone index. Query vectors come from `embeddings`.
pub struct PineconeVectorStore {
    client: Client,
    api_key: String,
    index_name: String,
    host: String,
    embeddings: Arc<dyn Embeddings>,
}

impl PineconeVectorStore {
    /// Binds to an index that is already populated, resolving its data-plane host
    /// unless one is configured.
    pub async fn from_existing_index(settings: &Settings, embeddings: Arc<dyn Embeddings>) -> Result<Self> {
        let client = Client::new();

        let host = match &settings.index_host {
            Some(host) => host.clone(),
            None => {
                describe_index(
                    &client,
                    &settings.pinecone_control_url,
                    &settings.pinecone_api_key,
                    &settings.index_name,
                )
                .await?
                .host
            }
        };

        log::info!("Connected to Pinecone index {} at {}", settings.index_name, host);

        Ok(Self {
            client,
            api_key: settings.pinecone_api_key.clone(),
            index_name: settings.index_name.clone(),
            host: normalize_host(&host),
            embeddings,
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        let vector = self.embeddings.embed_query(query).await?;

        let request = PineconeQueryRequest {
            vector,
            top_k: k,
            include_metadata: true,
            namespace: None,
        };

        let response = self
            .client
            .post(format!("{}/query", self.host))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow::anyhow!("Pinecone query error ({}): {}", status, error_text));
        }

        let query_response: PineconeQueryResponse = response.json().await?;
        let documents: Vec<Document> = query_response
            .matches
            .into_iter()
            .filter_map(match_to_document)
            .collect();

        log::info!("Found {} relevant documents", documents.len());
        Ok(documents)
    }

    pub fn as_retriever(self: Arc<Self>, k: usize) -> Result<VectorStoreRetriever> {
        if k == 0 {
            return Err(anyhow::anyhow!("retriever k must be at least 1"));
        }
        Ok(VectorStoreRetriever { store: self, k })
    }
}

async fn describe_index(client: &Client, control_url: &str, api_key: &str, index_name: &str) -> Result<IndexDescription> {
    let url = format!("{}/indexes/{}", control_url.trim_end_matches('/'), index_name);

    let response = client
        .get(&url)
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await?;
        return Err(anyhow::anyhow!(
            "describe index '{}' failed ({}): {}",
            index_name,
            status,
            error_text
        ));
    }

    let description: IndexDescription = response.json().await?;
    if description.host.trim().is_empty() {
        return Err(anyhow::anyhow!("index '{}' has no host yet", index_name));
    }
    Ok(description)
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

fn match_to_document(m: PineconeMatch) -> Option<Document> {
    let mut metadata = m.metadata.unwrap_or_default();
    let page_content = match metadata.remove(TEXT_KEY) {
        Some(serde_json::Value::String(text)) => text,
        _ => {
            log::warn!("Skipping match {} without '{}' metadata", m.id, TEXT_KEY);
            return None;
        }
    };

    Some(Document {
        id: m.id,
        page_content,
        metadata,
        score: m.score,
    })
}

/// Similarity-search retriever returning the top `k` documents.
pub struct VectorStoreRetriever {
    store: Arc<PineconeVectorStore>,
    k: usize,
}

impl VectorStoreRetriever {
    pub fn k(&self) -> usize {
        self.k
    }
}

#[async_trait]
impl DocumentRetriever for VectorStoreRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>> {
        self.store.similarity_search(query, self.k).await
    }
}
