use crate::models::{ChatMessage, ConversationEntry, Speaker};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Messages replayed into the prompt on every turn.
#[derive(Debug, Clone, Default)]
pub struct ConversationBufferMemory {
    messages: Vec<ChatMessage>,
}

impl ConversationBufferMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user_message(&mut self, content: &str) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn add_ai_message(&mut self, content: &str) {
        self.messages.push(ChatMessage::assistant(content));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// The displayed conversation, kept for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    entries: Vec<ConversationEntry>,
    generation: u64,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_exchange(&mut self, question: &str, answer: &str) {
        self.entries.push(ConversationEntry(Speaker::User, question.to_string()));
        self.entries.push(ConversationEntry(Speaker::Bot, answer.to_string()));
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation += 1;
    }

    /// Bumped on every `clear`, so a caller can tell whether the log it read is still current.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn to_memory(&self) -> ConversationBufferMemory {
        let mut memory = ConversationBufferMemory::new();
        for entry in &self.entries {
            match entry.speaker() {
                Speaker::User => memory.add_user_message(entry.message()),
                Speaker::Bot => memory.add_ai_message(entry.message()),
            }
        }
        memory
    }

    /// Writes `chat_history_<timestamp>.json` into `dir`. Nothing is written for an empty log.
    pub async fn export_json(&self, dir: &Path, now: DateTime<Local>) -> std::io::Result<Option<PathBuf>> {
        if self.entries.is_empty() {
            return Ok(None);
        }

        let filename = format!("chat_history_{}.json", now.format("%Y%m%d_%H%M%S"));
        let path = dir.join(filename);

        let mut buf = Vec::new();
        {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
            self.entries.serialize(&mut serializer)?;
        }

        fs::create_dir_all(dir).await?;
        fs::write(&path, buf).await?;

        log::info!("Exported {} conversation entries to {}", self.entries.len(), path.display());
        Ok(Some(path))
    }
}
