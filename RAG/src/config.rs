use crate::error::{ChatbotError, ChatbotResult};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_INDEX_NAME: &str = "medical-chatbot";
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_TOP_K: usize = 3;

/// Hosted chat models offered in the model picker. The first one is the default.
pub const AVAILABLE_MODELS: &[&str] = &[
    "llama3-8b-8192",
    "mixtral-8x7b-32768",
    "grok-beta",
    "grok-4-0709",
];

#[derive(Debug, Clone)]
pub struct Settings {
    pub groq_api_key: String,
    pub pinecone_api_key: String,
    pub huggingface_token: Option<String>,
    pub index_name: String,
    pub index_host: Option<String>,
    pub pinecone_control_url: String,
    pub groq_base_url: String,
    pub hf_inference_url: String,
    pub embedding_model: String,
    pub top_k: usize,
    pub export_dir: PathBuf,
    pub bind_addr: String,
}

impl Settings {
    /// Reads settings from the process environment, after loading `.env` if present.
    pub fn from_env() -> ChatbotResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ChatbotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let (groq_api_key, pinecone_api_key) = match (get("GROQ_API_KEY"), get("PINECONE_API_KEY")) {
            (Some(groq), Some(pinecone)) => (groq, pinecone),
            _ => return Err(ChatbotError::MissingApiKeys),
        };

        let top_k = match get("RETRIEVER_TOP_K") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(0) | Err(_) => {
                    return Err(ChatbotError::Config(format!(
                        "RETRIEVER_TOP_K must be a positive integer, got '{}'",
                        raw
                    )))
                }
                Ok(k) => k,
            },
            None => DEFAULT_TOP_K,
        };

        Ok(Self {
            groq_api_key,
            pinecone_api_key,
            huggingface_token: get("HUGGINGFACEHUB_API_TOKEN"),
            index_name: get("PINECONE_INDEX_NAME").unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string()),
            index_host: get("PINECONE_INDEX_HOST"),
            pinecone_control_url: trim_url(get("PINECONE_CONTROL_URL"), "https://api.pinecone.io"),
            groq_base_url: trim_url(get("GROQ_BASE_URL"), "https://api.groq.com/openai/v1"),
            hf_inference_url: trim_url(get("HF_INFERENCE_URL"), "https://router.huggingface.co/hf-inference"),
            embedding_model: get("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            top_k,
            export_dir: get("CHAT_EXPORT_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
        })
    }
}

fn trim_url(value: Option<String>, default: &str) -> String {
    value
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

pub fn default_model() -> &'static str {
    AVAILABLE_MODELS[0]
}

pub fn is_available_model(model: &str) -> bool {
    AVAILABLE_MODELS.contains(&model)
}
