use medbot_rag::ConversationEntry;
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; display: flex; min-height: 100vh; }
aside { width: 260px; padding: 1.5rem; background: #f0f2f6; }
main { flex: 1; padding: 1.5rem 3rem; }
.error { background: #ffe0e0; color: #7d1d1d; padding: .75rem; border-radius: 4px; }
.success { background: #dff5e1; color: #1d5d2a; padding: .75rem; border-radius: 4px; }
.info { background: #e0ecff; color: #1d3b7d; padding: .75rem; border-radius: 4px; }
aside button, aside select { width: 100%; margin-top: .5rem; }
input[type=text] { width: 70%; }
footer { margin-top: 2rem; color: #666; }
"#;

/// What a single render of the chat page shows.
#[derive(Debug, Default)]
pub struct PageView<'a> {
    pub models: &'a [&'a str],
    pub selected_model: &'a str,
    pub history: &'a [ConversationEntry],
    pub latest_answer: Option<&'a str>,
    pub error: Option<String>,
    pub sidebar_success: Option<String>,
    pub sidebar_info: Option<String>,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn model_hidden_field(model: &str) -> String {
    format!(r#"<input type="hidden" name="model" value="{}">"#, escape_html(model))
}

pub fn render_page(view: &PageView<'_>) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Medical Chatbot</title>
<style>{}</style>
</head>
<body>
"#,
        STYLE
    );

    // Sidebar
    html.push_str("<aside>\n<h2>Settings</h2>\n");
    html.push_str(r#"<label for="model">Select Model</label>"#);
    html.push_str("\n<select id=\"model\" name=\"model\" form=\"ask\">\n");
    for model in view.models {
        let selected = if *model == view.selected_model { " selected" } else { "" };
        let _ = writeln!(
            html,
            r#"<option value="{0}"{1}>{0}</option>"#,
            escape_html(model),
            selected
        );
    }
    html.push_str("</select>\n");
    let _ = writeln!(
        html,
        r#"<form method="post" action="/export">{}<button type="submit">Export Chat History</button></form>"#,
        model_hidden_field(view.selected_model)
    );
    let _ = writeln!(
        html,
        r#"<form method="post" action="/clear">{}<button type="submit">Clear Chat</button></form>"#,
        model_hidden_field(view.selected_model)
    );
    if let Some(message) = &view.sidebar_success {
        let _ = writeln!(html, r#"<p class="success">{}</p>"#, escape_html(message));
    }
    if let Some(message) = &view.sidebar_info {
        let _ = writeln!(html, r#"<p class="info">{}</p>"#, escape_html(message));
    }
    html.push_str("</aside>\n");

    // Main column
    html.push_str("<main>\n<h1>Medical Chatbot</h1>\n");
    if let Some(error) = &view.error {
        let _ = writeln!(html, r#"<p class="error">{}</p>"#, escape_html(error));
    }
    html.push_str(
        r#"<form id="ask" method="post" action="/ask">
<label for="question">Ask a medical question:</label><br>
<input type="text" id="question" name="question" autofocus>
<button type="submit">Send</button>
</form>
"#,
    );

    if let Some(answer) = view.latest_answer {
        let _ = writeln!(html, r#"<p class="latest"><strong>Bot:</strong> {}</p>"#, escape_html(answer));
    }

    html.push_str("<h3>Conversation</h3>\n<div class=\"conversation\">\n");
    for entry in view.history {
        let _ = writeln!(
            html,
            "<p><strong>{}:</strong> {}</p>",
            entry.speaker(),
            escape_html(entry.message())
        );
    }
    html.push_str("</div>\n");

    html.push_str(
        "<footer><hr>Powered by Rust | Consult a healthcare professional for medical advice.</footer>\n",
    );
    html.push_str("</main>\n</body>\n</html>\n");
    html
}
