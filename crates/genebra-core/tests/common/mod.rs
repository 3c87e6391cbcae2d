//! Shared fakes for the integration tests
#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use genebra_core::auth::{Credentials, LoginClient};
use genebra_core::chat::completion::{CompletionClient, GenerateContentRequest, GenerateContentResponse, Part};
use genebra_core::chat::{AttachmentEntry, ChatMessage};
use genebra_core::error::{Error, Result};
use genebra_core::ui::{ChatView, LoginView, Navigator, Page};
use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Records every navigation
#[derive(Default)]
pub struct RecordingNavigator {
    pub pages: Mutex<Vec<Page>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<Page> {
        self.pages.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, page: Page) {
        self.pages.lock().push(page);
    }
}

/// Login form with fixed field values
pub struct FakeLoginForm {
    pub username: String,
    pub password: String,
    pub error: Mutex<Option<String>>,
}

impl FakeLoginForm {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            error: Mutex::new(None),
        }
    }

    pub fn error(&self) -> Option<String> {
        self.error.lock().clone()
    }
}

impl LoginView for FakeLoginForm {
    fn username(&self) -> String {
        self.username.clone()
    }

    fn password(&self) -> String {
        self.password.clone()
    }

    fn show_error(&self, message: &str) {
        *self.error.lock() = Some(message.to_string());
    }

    fn clear_error(&self) {
        *self.error.lock() = None;
    }
}

/// What the scripted login endpoint answers
#[derive(Clone)]
pub enum LoginReply {
    Token(String),
    Rejected(String),
    NetworkDown,
}

/// Login client returning a scripted reply and recording credentials
pub struct ScriptedLoginClient {
    pub reply: LoginReply,
    pub calls: Mutex<Vec<Credentials>>,
}

impl ScriptedLoginClient {
    pub fn new(reply: LoginReply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LoginClient for ScriptedLoginClient {
    async fn login(&self, credentials: &Credentials) -> Result<String> {
        self.calls.lock().push(credentials.clone());
        match &self.reply {
            LoginReply::Token(token) => Ok(token.clone()),
            LoginReply::Rejected(msg) => Err(Error::AuthRejected(msg.clone())),
            LoginReply::NetworkDown => Err(Error::Http("connection refused".to_string())),
        }
    }
}

/// Chat view keeping everything it is told to draw
#[derive(Default)]
pub struct RecordingChatView {
    pub input: Mutex<String>,
    pub attachments: Mutex<Vec<AttachmentEntry>>,
    pub window: Mutex<Vec<ChatMessage>>,
    pub updates: Mutex<Vec<String>>,
}

impl RecordingChatView {
    pub fn type_text(&self, text: &str) {
        *self.input.lock() = text.to_string();
    }

    pub fn input(&self) -> String {
        self.input.lock().clone()
    }

    pub fn listed(&self) -> Vec<String> {
        self.attachments.lock().iter().map(|e| e.name.clone()).collect()
    }

    pub fn window(&self) -> Vec<ChatMessage> {
        self.window.lock().clone()
    }

    /// Ids of updated messages, in update order
    pub fn updates(&self) -> Vec<String> {
        self.updates.lock().clone()
    }
}

impl ChatView for RecordingChatView {
    fn input_text(&self) -> String {
        self.input.lock().clone()
    }

    fn clear_input(&self) {
        self.input.lock().clear();
    }

    fn render_attachments(&self, entries: &[AttachmentEntry]) {
        *self.attachments.lock() = entries.to_vec();
    }

    fn append_message(&self, message: &ChatMessage) {
        self.window.lock().push(message.clone());
    }

    fn update_message(&self, message: &ChatMessage) {
        let mut window = self.window.lock();
        if let Some(slot) = window.iter_mut().find(|m| m.id == message.id) {
            *slot = message.clone();
        }
        self.updates.lock().push(message.id.to_string());
    }
}

/// How the fake completion endpoint behaves
#[derive(Clone)]
pub enum CompletionReply {
    /// Answer "echo: <text>"; texts starting with "slow" take longer
    Echo,
    /// Return this raw response body
    Body(serde_json::Value),
    ApiError { status: u16, message: String },
}

/// Completion client recording the requests it receives
pub struct FakeCompletionClient {
    pub reply: CompletionReply,
    pub requests: Mutex<Vec<GenerateContentRequest>>,
}

impl FakeCompletionClient {
    pub fn new(reply: CompletionReply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().clone()
    }
}

pub fn request_text(request: &GenerateContentRequest) -> String {
    match &request.contents[0].parts[0] {
        Part::Text { text } => text.clone(),
        Part::InlineData { .. } => panic!("first part should be text"),
    }
}

#[async_trait]
impl CompletionClient for FakeCompletionClient {
    fn name(&self) -> &str {
        "fake-model"
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        self.requests.lock().push(request.clone());
        match &self.reply {
            CompletionReply::Echo => {
                let text = request_text(request);
                if text.starts_with("slow") {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
                let body = serde_json::json!({
                    "candidates": [{"content": {"parts": [{"text": format!("echo: {}", text)}]}}]
                });
                Ok(serde_json::from_value(body)?)
            }
            CompletionReply::Body(body) => Ok(serde_json::from_value(body.clone())?),
            CompletionReply::ApiError { status, message } => Err(Error::CompletionApi {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Minimal HTTP/1.1 server answering exactly one request.
///
/// Returns the base URL and a handle resolving to the raw request text.
pub async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let body = body.to_string();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if request_complete(&raw) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&raw).to_string()
    });

    (format!("http://{}", addr), handle)
}

/// Base URL of a local port nothing listens on
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let chunked = text[..header_end].lines().any(|line| {
        line.split_once(':').is_some_and(|(name, value)| {
            name.trim().eq_ignore_ascii_case("transfer-encoding") && value.trim().eq_ignore_ascii_case("chunked")
        })
    });
    if chunked {
        return text.ends_with("0\r\n\r\n");
    }
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    raw.len() >= header_end + 4 + content_length
}
