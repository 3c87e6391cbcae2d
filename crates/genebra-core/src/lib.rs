//! Genebra Core - intranet session gate and chat client
//!
//! This crate provides the core functionality for the Genebra client:
//! - Session gate: token-based access to pages, login and logout
//! - Chat session: attachments, message log, completion requests
//! - Local key/value storage for the bearer token
//! - UI capability traits implemented by front-ends
//! - Configuration

pub mod auth;
pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod storage;
pub mod ui;

pub use auth::{Credentials, HttpLoginClient, LoginClient, LoginOutcome, PageGate, SessionGate};
pub use backend::BackendClient;
pub use chat::{
    Attachment, AttachmentEntry, ChatMessage, ChatSession, CompletionClient, GeminiClient,
    MessageId, PendingSend, Sender,
};
pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use storage::{FileTokenStore, MemoryTokenStore, StoredToken, TokenStore, TOKEN_KEY};
pub use ui::{ChatEvent, ChatView, Key, LoginView, Navigator, Page, PageControls};
