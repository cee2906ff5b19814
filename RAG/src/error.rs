use thiserror::Error;

/// Failures surfaced to the person using the chatbot.
#[derive(Debug, Error)]
pub enum ChatbotError {
    #[error("Error: Missing GROQ_API_KEY or PINECONE_API_KEY in .env file. Please configure them.")]
    MissingApiKeys,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Error loading embeddings: {0}")]
    Embeddings(anyhow::Error),

    #[error("Error connecting to Pinecone index: {0}. Check PINECONE_API_KEY and index name.")]
    IndexConnection(anyhow::Error),

    #[error("Unknown model '{0}'")]
    UnknownModel(String),

    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error("Error processing query: {0}")]
    Query(anyhow::Error),

    #[error("Error exporting chat history: {0}")]
    Export(#[from] std::io::Error),
}

impl ChatbotError {
    /// True when the caller sent something unusable, as opposed to an upstream failure.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ChatbotError::UnknownModel(_) | ChatbotError::EmptyQuestion)
    }
}

pub type ChatbotResult<T> = std::result::Result<T, ChatbotError>;
