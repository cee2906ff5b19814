use crate::chain::{ChainInput, ChainOutput, RetrievalChain, StuffDocumentsChain};
use crate::config::{self, Settings};
use crate::embedding_service::{Embeddings, HuggingFaceEmbeddings};
use crate::error::{ChatbotError, ChatbotResult};
use crate::groq_service::{ChatGroq, ChatModel};
use crate::memory::ChatHistory;
use crate::models::ConversationEntry;
use crate::prompt::ChatPromptTemplate;
use crate::vector_store::{DocumentRetriever, PineconeVectorStore};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The retrieval chain plus the running conversation.
pub struct Chatbot {
    chain: RetrievalChain,
    history: RwLock<ChatHistory>,
    export_dir: PathBuf,
}

impl Chatbot {
    pub fn new(retriever: Arc<dyn DocumentRetriever>, llm: Arc<dyn ChatModel>, export_dir: PathBuf) -> Self {
        let combine_documents = StuffDocumentsChain::new(llm, ChatPromptTemplate::default());
        Self {
            chain: RetrievalChain::new(retriever, combine_documents),
            history: RwLock::new(ChatHistory::new()),
            export_dir,
        }
    }

    /// Connects the embedding model, the vector index and the chat client.
    pub async fn from_settings(settings: &Settings) -> ChatbotResult<Self> {
        log::info!("Initializing chatbot...");

        let embeddings: Arc<dyn Embeddings> =
            Arc::new(HuggingFaceEmbeddings::from_settings(settings).map_err(ChatbotError::Embeddings)?);
        // A bad model name or token should stop start-up, not the first question.
        embeddings
            .embed_query("ping")
            .await
            .map_err(ChatbotError::Embeddings)?;

        let store = PineconeVectorStore::from_existing_index(settings, embeddings)
            .await
            .map_err(ChatbotError::IndexConnection)?;
        let retriever = Arc::new(store)
            .as_retriever(settings.top_k)
            .map_err(|e| ChatbotError::Config(e.to_string()))?;

        let llm = Arc::new(ChatGroq::from_settings(settings));

        log::info!("Chatbot initialized with top-{} similarity retrieval", settings.top_k);
        Ok(Self::new(Arc::new(retriever), llm, settings.export_dir.clone()))
    }

    pub fn models(&self) -> &'static [&'static str] {
        config::AVAILABLE_MODELS
    }

    /// Answers `question` with `model` and records the exchange. The log is left
    /// untouched when anything fails.
    pub async fn ask(&self, question: &str, model: &str) -> ChatbotResult<ChainOutput> {
        if !config::is_available_model(model) {
            return Err(ChatbotError::UnknownModel(model.to_string()));
        }
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatbotError::EmptyQuestion);
        }

        let (generation, chat_history) = {
            let history = self.history.read().await;
            (history.generation(), history.to_memory().messages().to_vec())
        };

        let output = self
            .chain
            .invoke(
                model,
                ChainInput {
                    input: question.to_string(),
                    chat_history,
                },
            )
            .await
            .map_err(|e| {
                log::error!("Query failed: {:#}", e);
                ChatbotError::Query(e)
            })?;

        let mut history = self.history.write().await;
        if history.generation() == generation {
            history.push_exchange(question, &output.answer);
        } else {
            log::info!("[{}] Conversation was cleared while answering; not recording", output.request_id);
        }
        Ok(output)
    }

    pub async fn history(&self) -> Vec<ConversationEntry> {
        self.history.read().await.entries().to_vec()
    }

    pub async fn clear(&self) {
        self.history.write().await.clear();
        log::info!("Conversation cleared");
    }

    /// Writes the log to a timestamped file; `None` when there is nothing to write.
    pub async fn export(&self) -> ChatbotResult<Option<PathBuf>> {
        let snapshot = self.history.read().await.clone();
        Ok(snapshot.export_json(&self.export_dir, Local::now()).await?)
    }
}
