//! Message rendering for HTML and plain-text front-ends
//!
//! The HTML helpers ([`message_html`], [`with_line_breaks`]) are for
//! front-ends that draw messages as markup; the terminal CLI uses
//! [`message_text`].

use super::message::{ChatMessage, Sender};

/// Placeholder text while an answer is pending
pub const PROCESSING_TEXT: &str = "Processing...";

/// Used when the completion succeeds without usable content
pub const FALLBACK_ANSWER: &str =
    "I couldn't generate a response. Check the files or the question and try again.";

/// Prefix of every user-visible failure in the chat window
pub const ERROR_PREFIX: &str = "An error occurred: ";

const LOADING_DOTS: &str =
    r#"<span class="loading-dots"><span>.</span><span>.</span><span>.</span></span>"#;

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

/// Escape, then turn newlines into `<br>`
pub fn with_line_breaks(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

/// "Attachments: a.pdf, b.png"
pub fn attachment_summary(names: &[String]) -> String {
    format!("Attachments: {}", names.join(", "))
}

/// Inner HTML of a message bubble
pub fn message_html(message: &ChatMessage) -> String {
    if message.is_processing() {
        return format!("<p>{}{}</p>", escape_html(&message.text), LOADING_DOTS);
    }

    let mut body = with_line_breaks(&message.text);
    if message.sender == Sender::User && !message.attachments.is_empty() {
        body.push_str(&format!(
            r#"<br><br><small class="italic">{}</small>"#,
            escape_html(&attachment_summary(&message.attachments))
        ));
    }
    format!("<p>{}</p>", body)
}

/// Plain-text rendering for terminals
pub fn message_text(message: &ChatMessage) -> String {
    let mut text = message.text.clone();
    if message.sender == Sender::User && !message.attachments.is_empty() {
        if !text.is_empty() {
            text.push_str("\n\n");
        }
        text.push_str(&attachment_summary(&message.attachments));
    }
    text
}
