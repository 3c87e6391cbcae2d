//! Terminal implementations of the UI capability traits

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Password};
use parking_lot::Mutex;

use genebra_core::chat::render::message_text;
use genebra_core::chat::{AttachmentEntry, ChatMessage, Sender};
use genebra_core::ui::{ChatView, LoginView, Navigator, Page};

/// Remembers where the last handler asked to go
#[derive(Default)]
pub struct TerminalNavigator {
    target: Mutex<Option<Page>>,
}

impl TerminalNavigator {
    /// Take the pending navigation, if any
    pub fn take(&self) -> Option<Page> {
        self.target.lock().take()
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, page: Page) {
        tracing::debug!("Navigating to {}", page);
        *self.target.lock() = Some(page);
    }
}

/// Login form filled in by interactive prompts
pub struct TerminalLoginForm {
    username: String,
    password: String,
}

impl TerminalLoginForm {
    /// Ask for credentials. `username` pre-fills the first prompt.
    pub fn prompt(username: Option<&str>) -> anyhow::Result<Self> {
        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme).with_prompt("Username");
        if let Some(name) = username {
            input = input.with_initial_text(name);
        }
        let username = input.interact_text()?;
        let password = Password::with_theme(&theme)
            .with_prompt("Password")
            .interact()?;
        Ok(Self { username, password })
    }
}

impl LoginView for TerminalLoginForm {
    fn username(&self) -> String {
        self.username.clone()
    }

    fn password(&self) -> String {
        self.password.clone()
    }

    fn show_error(&self, message: &str) {
        eprintln!("{}", style(message).red());
    }

    fn clear_error(&self) {}
}

/// Chat window printed line by line.
///
/// A terminal can't redraw a message in place, so resolved placeholders
/// are printed again with the answer.
#[derive(Default)]
pub struct TerminalChatView {
    input: Mutex<String>,
    // Number of attachments last drawn
    listed: Mutex<usize>,
}

impl TerminalChatView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a line into the text input, as if typed
    pub fn set_input(&self, text: &str) {
        *self.input.lock() = text.to_string();
    }

    /// Print the attachment list regardless of what changed
    pub fn list_attachments(&self, entries: &[AttachmentEntry]) {
        if entries.is_empty() {
            println!("  {}", style("No attachments").dim());
            return;
        }
        println!("  {}", style("Attachments:").bold());
        for entry in entries {
            println!("    [{}] {}", style(entry.index).yellow(), entry.name);
        }
    }

    fn print(&self, message: &ChatMessage) {
        let label = match message.sender {
            Sender::User => style("You").bold().cyan(),
            Sender::Assistant => style("Assistant").bold().green(),
        };
        if message.is_processing() {
            println!("{}: {}", label, style(&message.text).dim());
        } else {
            println!("{}: {}", label, message_text(message));
        }
    }
}

impl ChatView for TerminalChatView {
    fn input_text(&self) -> String {
        self.input.lock().clone()
    }

    fn clear_input(&self) {
        self.input.lock().clear();
    }

    fn render_attachments(&self, entries: &[AttachmentEntry]) {
        let previous = std::mem::replace(&mut *self.listed.lock(), entries.len());
        // Sending clears the list; nothing to redraw if it was already empty
        if entries.is_empty() && previous == 0 {
            return;
        }
        self.list_attachments(entries);
    }

    fn append_message(&self, message: &ChatMessage) {
        // The user already sees what they typed
        if message.sender == Sender::User && message.attachments.is_empty() {
            return;
        }
        self.print(message);
    }

    fn update_message(&self, message: &ChatMessage) {
        println!();
        self.print(message);
    }
}
