use medbot_rag::ChainOutput;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

const SNIPPET_GRAPHEMES: usize = 200;

#[derive(Debug, Deserialize, Serialize)]
pub struct RagResponse {
    pub request_id: String,
    pub model: String,
    pub answer: String,
    pub context_snippets: Vec<String>,
    pub processing_time_ms: u128,
}

impl RagResponse {
    pub fn from_output(output: ChainOutput, model: &str) -> Self {
        Self {
            request_id: output.request_id,
            model: model.to_string(),
            answer: output.answer,
            context_snippets: output.context.iter().map(|doc| snippet(&doc.page_content)).collect(),
            processing_time_ms: output.processing_time_ms,
        }
    }
}

/// Cuts on grapheme boundaries so multi-byte text never splits mid-character.
pub fn snippet(text: &str) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(SNIPPET_GRAPHEMES).collect();
    if graphemes.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
