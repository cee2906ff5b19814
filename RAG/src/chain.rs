use crate::groq_service::ChatModel;
use crate::models::*;
use crate::prompt::{format_documents, ChatPromptTemplate};
use crate::vector_store::DocumentRetriever;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ChainInput {
    pub input: String,
    pub chat_history: Vec<ChatMessage>,
}

#[derive(Debug, Clone)]
pub struct ChainOutput {
    pub request_id: String,
    pub input: String,
    pub answer: String,
    pub context: Vec<Document>,
    pub processing_time_ms: u128,
}

/// Answers a question from documents by stuffing them all into the prompt.
pub struct StuffDocumentsChain {
    llm: Arc<dyn ChatModel>,
    prompt: ChatPromptTemplate,
}

impl StuffDocumentsChain {
    pub fn new(llm: Arc<dyn ChatModel>, prompt: ChatPromptTemplate) -> Self {
        Self { llm, prompt }
    }

    pub async fn invoke(&self, model: &str, input: &ChainInput, documents: &[Document]) -> Result<String> {
        let mut variables = HashMap::new();
        variables.insert("context", format_documents(documents));
        variables.insert("input", input.input.clone());

        let messages = self.prompt.format_messages(&variables, &input.chat_history)?;
        self.llm.chat(model, &messages).await
    }
}

/// Retrieve, then generate.
pub struct RetrievalChain {
    retriever: Arc<dyn DocumentRetriever>,
    combine_documents: StuffDocumentsChain,
}

impl RetrievalChain {
    pub fn new(retriever: Arc<dyn DocumentRetriever>, combine_documents: StuffDocumentsChain) -> Self {
        Self {
            retriever,
            combine_documents,
        }
    }

    pub async fn invoke(&self, model: &str, input: ChainInput) -> Result<ChainOutput> {
        let start_time = std::time::Instant::now();
        let request_id = Uuid::new_v4().to_string();

        if input.input.trim().is_empty() {
            return Err(anyhow::anyhow!("input must not be empty"));
        }

        log::info!("[{}] Retrieving context for question with {} history messages", request_id, input.chat_history.len());
        let context = self.retriever.retrieve(&input.input).await?;

        log::info!("[{}] Generating answer with {} from {} documents", request_id, model, context.len());
        let answer = self.combine_documents.invoke(model, &input, &context).await?;

        let processing_time_ms = start_time.elapsed().as_millis();
        log::info!("[{}] Answered in {} ms", request_id, processing_time_ms);

        Ok(ChainOutput {
            request_id,
            input: input.input,
            answer,
            context,
            processing_time_ms,
        })
    }
}
