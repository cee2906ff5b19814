use serde::Deserialize;

/// JSON body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatPayload {
    pub question: String,
    pub model: Option<String>,
}

/// Form fields posted by the question box.
#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
    pub model: Option<String>,
}

/// Sidebar buttons only carry the currently selected model.
#[derive(Debug, Default, Deserialize)]
pub struct SidebarForm {
    pub model: Option<String>,
}
