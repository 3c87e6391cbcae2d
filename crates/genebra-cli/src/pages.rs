//! Login and chat screens
//!
//! Each screen is one "page load": it runs the session gate first and only
//! then wires its own handlers. A screen returns the page it navigated to,
//! or `None` when the user quit.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use console::style;
use rustyline::DefaultEditor;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use genebra_core::auth::{HttpLoginClient, LoginOutcome, PageGate, SessionGate};
use genebra_core::chat::{Attachment, ChatSession, GeminiClient};
use genebra_core::config::Config;
use genebra_core::storage::TokenStore;
use genebra_core::ui::{ChatEvent, Key, LoginView, Page, PageControls};

use crate::terminal::{TerminalChatView, TerminalLoginForm, TerminalNavigator};

/// Shared by every screen
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn TokenStore>,
}

impl AppContext {
    pub fn gate(&self, navigator: Arc<TerminalNavigator>) -> SessionGate {
        let client = HttpLoginClient::new(self.config.backend.base_url.clone());
        SessionGate::new(self.store.clone(), Arc::new(client), navigator)
    }
}

/// Show pages until the user quits
pub async fn run(ctx: &AppContext, start: Page) -> anyhow::Result<()> {
    let mut page = Some(start);
    while let Some(current) = page {
        page = match current {
            Page::Login => login_page(ctx).await?,
            _ => chat_page(ctx, &current).await?,
        };
    }
    Ok(())
}

async fn login_page(ctx: &AppContext) -> anyhow::Result<Option<Page>> {
    let navigator = Arc::new(TerminalNavigator::default());
    let gate = ctx.gate(navigator.clone());

    if let PageGate::Redirected(page) = gate.on_page_load(&Page::Login, PageControls::default()) {
        println!("{}", style("Already logged in.").dim());
        return Ok(Some(page));
    }

    println!("{}", style("Genebra Intranet - Login").bold());
    let mut last_username: Option<String> = None;
    loop {
        let form = TerminalLoginForm::prompt(last_username.as_deref())?;
        match gate.submit_login(&form).await {
            LoginOutcome::LoggedIn => {
                println!("{}", style("Logged in.").green());
                return Ok(navigator.take());
            }
            LoginOutcome::Rejected(_) => {
                last_username = Some(form.username());
            }
            LoginOutcome::Ignored => return Ok(None),
        }
    }
}

async fn chat_page(ctx: &AppContext, page: &Page) -> anyhow::Result<Option<Page>> {
    let navigator = Arc::new(TerminalNavigator::default());
    let gate = ctx.gate(navigator.clone());

    if let PageGate::Redirected(target) = gate.on_page_load(page, PageControls::with_logout()) {
        println!("{}", style("Please log in first.").yellow());
        return Ok(Some(target));
    }

    let completion = &ctx.config.completion;
    let api_key = completion.get_api_key().ok_or_else(|| {
        anyhow::anyhow!("No completion API key configured. Set GEMINI_API_KEY or completion.api_key in the config file.")
    })?;
    let client = GeminiClient::new(completion.base_url.clone(), completion.model.clone(), api_key);

    let view = Arc::new(TerminalChatView::new());
    let chat = ChatSession::new(Arc::new(client), view.clone());
    let reader = LineReader::spawn("> ");
    let mut in_flight: Vec<JoinHandle<String>> = Vec::new();

    print_chat_help();

    let next = loop {
        in_flight.retain(|handle| !handle.is_finished());

        let Some(line) = reader.next_line().await else {
            break None;
        };
        let line = line.trim_end();

        match ChatCommand::parse(line) {
            ChatCommand::Quit => break None,
            ChatCommand::Logout => {
                if gate.logout() {
                    println!("{}", style("Logged out.").dim());
                    break navigator.take();
                }
            }
            ChatCommand::Help => print_chat_help(),
            ChatCommand::Files => view.list_attachments(&chat.attachments()),
            ChatCommand::Attach(paths) => {
                let files = selectable_files(&paths);
                if !files.is_empty() {
                    chat.dispatch(ChatEvent::FilesSelected(files));
                }
            }
            ChatCommand::Remove(Some(index)) => {
                chat.dispatch(ChatEvent::RemoveAttachment(index));
            }
            ChatCommand::Remove(None) => {
                println!("{}", style("Usage: /remove <index>").yellow());
            }
            ChatCommand::Send(text) => {
                view.set_input(&text);
                if let Some(pending) = chat.dispatch(ChatEvent::KeyPressed(Key::Enter)) {
                    in_flight.push(tokio::spawn(pending.complete()));
                }
            }
        }
    };

    wait_for_answers(in_flight).await;
    Ok(next)
}

/// Files that exist on disk; the rest are reported and skipped
fn selectable_files(paths: &[String]) -> Vec<Attachment> {
    paths
        .iter()
        .filter_map(|p| {
            let path = Path::new(p);
            if path.is_file() {
                Some(Attachment::from_path(path))
            } else {
                eprintln!("{}", style(format!("Not a file: {}", p)).red());
                None
            }
        })
        .collect()
}

async fn wait_for_answers(in_flight: Vec<JoinHandle<String>>) {
    let pending: Vec<_> = in_flight.into_iter().filter(|h| !h.is_finished()).collect();
    if pending.is_empty() {
        return;
    }

    let spinner = indicatif::ProgressBar::new_spinner();
    if let Ok(spinner_style) = indicatif::ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(format!("Waiting for {} pending answer(s)...", pending.len()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    for handle in pending {
        if let Err(e) = handle.await {
            tracing::warn!("Send task failed: {}", e);
        }
    }
    spinner.finish_and_clear();
}

fn print_chat_help() {
    println!("{}", style("Type a message and press Enter to send.").dim());
    println!(
        "{}",
        style("Commands: /attach <path...>  /remove <index>  /files  /logout  /quit").dim()
    );
}

/// A line typed on the chat screen
#[derive(Debug, PartialEq, Eq)]
enum ChatCommand {
    Send(String),
    Attach(Vec<String>),
    Remove(Option<usize>),
    Files,
    Logout,
    Help,
    Quit,
}

impl ChatCommand {
    fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("/attach") => ChatCommand::Attach(words.map(str::to_string).collect()),
            Some("/remove") => ChatCommand::Remove(words.next().and_then(|w| w.parse().ok())),
            Some("/files") => ChatCommand::Files,
            Some("/logout") => ChatCommand::Logout,
            Some("/help") => ChatCommand::Help,
            Some("/quit") | Some("/exit") => ChatCommand::Quit,
            _ => ChatCommand::Send(line.to_string()),
        }
    }
}

/// Line editor on its own thread, asked for one line at a time so it never
/// holds the terminal while another screen is prompting
struct LineReader {
    requests: std::sync::mpsc::Sender<oneshot::Sender<Option<String>>>,
}

impl LineReader {
    fn spawn(prompt: &str) -> Self {
        let (requests, rx) = std::sync::mpsc::channel::<oneshot::Sender<Option<String>>>();
        let prompt = prompt.to_string();

        std::thread::spawn(move || {
            let mut editor = match DefaultEditor::new() {
                Ok(editor) => editor,
                Err(e) => {
                    tracing::error!("Failed to start line editor: {}", e);
                    return;
                }
            };
            while let Ok(reply) = rx.recv() {
                let line = match editor.readline(&prompt) {
                    Ok(line) => {
                        let _ = editor.add_history_entry(line.as_str());
                        Some(line)
                    }
                    Err(_) => None,
                };
                if reply.send(line).is_err() {
                    break;
                }
            }
        });

        Self { requests }
    }

    /// `None` on Ctrl-C, Ctrl-D or when the editor is gone
    async fn next_line(&self) -> Option<String> {
        let (tx, rx) = oneshot::channel();
        self.requests.send(tx).ok()?;
        rx.await.ok().flatten()
    }
}
