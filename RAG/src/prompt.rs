use crate::models::{ChatMessage, Document};
use anyhow::Result;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

pub const SYSTEM_PROMPT: &str = "You are a medical assistant for question-answering tasks. \
Use the following pieces of retrieved context to answer the question. \
If you don't know the answer, say that you don't know. \
Use three sentences maximum and keep the answer concise.\n\n{context}";

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap())
}

/// System template, then the replayed history, then the human turn.
#[derive(Debug, Clone)]
pub struct ChatPromptTemplate {
    system: String,
    human: String,
}

impl Default for ChatPromptTemplate {
    fn default() -> Self {
        Self::new(SYSTEM_PROMPT, "{input}")
    }
}

impl ChatPromptTemplate {
    pub fn new(system: &str, human: &str) -> Self {
        Self {
            system: system.to_string(),
            human: human.to_string(),
        }
    }

    /// Names of the `{variables}` the template expects.
    pub fn input_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for text in [&self.system, &self.human] {
            for caps in placeholder().captures_iter(text) {
                let name = caps[1].to_string();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn format_messages(&self, variables: &HashMap<&str, String>, history: &[ChatMessage]) -> Result<Vec<ChatMessage>> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(render(&self.system, variables)?));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(render(&self.human, variables)?));
        Ok(messages)
    }
}

fn render(template: &str, variables: &HashMap<&str, String>) -> Result<String> {
    if let Some(missing) = placeholder()
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .find(|name| !variables.contains_key(name.as_str()))
    {
        return Err(anyhow::anyhow!("missing prompt variable '{}'", missing));
    }

    // Single pass, so substituted values are never re-expanded.
    let rendered = placeholder().replace_all(template, |caps: &Captures| variables[&caps[1]].clone());
    Ok(rendered.into_owned())
}

/// "Stuff" strategy: every document goes into the context verbatim.
pub fn format_documents(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| doc.page_content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
