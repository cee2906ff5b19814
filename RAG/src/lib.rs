pub mod chain;
pub mod chatbot;
pub mod config;
pub mod embedding_service;
pub mod error;
pub mod groq_service;
pub mod memory;
pub mod models;
pub mod prompt;
pub mod vector_store;

pub use chain::{ChainInput, ChainOutput, RetrievalChain, StuffDocumentsChain};
pub use chatbot::Chatbot;
pub use config::{Settings, AVAILABLE_MODELS};
pub use embedding_service::{Embeddings, HuggingFaceEmbeddings};
pub use error::{ChatbotError, ChatbotResult};
pub use groq_service::{ChatGroq, ChatModel};
pub use memory::{ChatHistory, ConversationBufferMemory};
pub use models::*;
pub use prompt::ChatPromptTemplate;
pub use vector_store::{DocumentRetriever, PineconeVectorStore, VectorStoreRetriever};
