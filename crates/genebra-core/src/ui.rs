//! UI capability interfaces
//!
//! The gate and the chat session never touch a concrete page. Front-ends
//! (the terminal CLI, test fakes) implement these traits and feed user
//! actions back in as events.

use crate::chat::{Attachment, AttachmentEntry, ChatMessage};

/// File name of the login page
pub const LOGIN_PAGE: &str = "login.html";

/// File name of the main page
pub const MAIN_PAGE: &str = "index.html";

/// A page the user can be on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Login,
    Main,
    Other(String),
}

impl Page {
    /// Resolve a page from a path; only the last segment matters
    pub fn from_path(path: &str) -> Self {
        let last = path.rsplit('/').next().unwrap_or_default();
        match last {
            LOGIN_PAGE => Page::Login,
            "" | MAIN_PAGE => Page::Main,
            other => Page::Other(other.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Page::Login => LOGIN_PAGE,
            Page::Main => MAIN_PAGE,
            Page::Other(name) => name,
        }
    }

    pub fn is_login(&self) -> bool {
        matches!(self, Page::Login)
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Full-page navigation
pub trait Navigator: Send + Sync {
    fn navigate(&self, page: Page);
}

/// Controls present on the loaded page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageControls {
    pub logout: bool,
}

impl PageControls {
    pub fn with_logout() -> Self {
        Self { logout: true }
    }
}

/// Login form: credential fields plus an error region
pub trait LoginView: Send + Sync {
    fn username(&self) -> String;

    fn password(&self) -> String;

    fn show_error(&self, message: &str);

    fn clear_error(&self);
}

/// Chat widget: text input, attachment list and message window
pub trait ChatView: Send + Sync {
    /// Current content of the text input
    fn input_text(&self) -> String;

    fn clear_input(&self);

    /// Redraw the attachment list. Entries carry their current index.
    fn render_attachments(&self, entries: &[AttachmentEntry]);

    fn append_message(&self, message: &ChatMessage);

    /// Redraw a message already in the window, matched by its id
    fn update_message(&self, message: &ChatMessage);
}

/// Keys the text input reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
}

/// User actions on the chat widget
#[derive(Debug)]
pub enum ChatEvent {
    FilesSelected(Vec<Attachment>),
    RemoveAttachment(usize),
    SendClicked,
    KeyPressed(Key),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_from_path() {
        assert_eq!(Page::from_path("/site/login.html"), Page::Login);
        assert_eq!(Page::from_path("/site/index.html"), Page::Main);
        assert_eq!(Page::from_path("/site/"), Page::Main);
        assert_eq!(Page::from_path("docs.html"), Page::Other("docs.html".to_string()));
    }

    #[test]
    fn test_page_display() {
        assert_eq!(Page::Login.to_string(), "login.html");
        assert_eq!(Page::Other("rh.html".into()).to_string(), "rh.html");
    }
}
