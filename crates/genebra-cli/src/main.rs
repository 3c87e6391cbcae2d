//! Genebra CLI - intranet assistant in the terminal
//!
//! Opens the main chat page behind the session gate, with one-shot
//! commands for the intranet backend.

mod pages;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use genebra_core::backend::BackendClient;
use genebra_core::chat::Attachment;
use genebra_core::config::ConfigManager;
use genebra_core::storage::{FileTokenStore, StoredToken, TokenStore};
use genebra_core::ui::{Page, PageControls};

use pages::AppContext;
use terminal::TerminalNavigator;

#[derive(Parser)]
#[command(name = "genebra")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Genebra intranet assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Config file (defaults to <config_dir>/genebra/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Intranet backend URL
    #[arg(short, long)]
    backend: Option<String>,

    /// Completion model
    #[arg(short, long)]
    model: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat page (logs in first when needed)
    Open,

    /// Open the login page
    Login,

    /// Forget the stored token
    Logout,

    /// Show whether a session token is stored
    Status,

    /// Show configuration
    Config,

    /// Ask the intranet backend a question
    Ask {
        /// Question text
        query: String,
    },

    /// Upload documents to the intranet backend
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Quiet by default so log lines don't break into prompts
    tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "info,genebra_core=debug"
        } else {
            "warn"
        })
        .init();

    let mut manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone())?,
        None => ConfigManager::new()?,
    };
    if let Some(url) = &cli.backend {
        manager.set_backend_url(url.clone());
    }
    if let Some(model) = &cli.model {
        manager.set_model(model.clone());
    }
    manager.config().validate()?;

    let config = manager.config().clone();
    let store: Arc<dyn TokenStore> = Arc::new(match &config.general.storage_path {
        Some(path) => FileTokenStore::with_path(path.clone()),
        None => FileTokenStore::new(),
    });

    match cli.command.unwrap_or(Commands::Open) {
        Commands::Open => {
            let ctx = AppContext { config, store };
            pages::run(&ctx, Page::Main).await?;
        }
        Commands::Login => {
            let ctx = AppContext { config, store };
            pages::run(&ctx, Page::Login).await?;
        }
        Commands::Logout => logout(&AppContext { config, store }),
        Commands::Status => {
            let stored = StoredToken::is_present(store.as_ref());
            if stored {
                println!("{} Logged in", style("●").green());
            } else {
                println!("{} Not logged in", style("○").dim());
            }
        }
        Commands::Config => show_config(&manager),
        Commands::Ask { query } => {
            let client = BackendClient::new(config.backend.base_url.clone(), store);
            let spinner = spinner("Asking...");
            let result = client.ask(&query).await;
            spinner.finish_and_clear();
            println!("{}", result?);
        }
        Commands::Upload { files } => {
            let attachments: Vec<Attachment> = files.iter().map(Attachment::from_path).collect();
            let client = BackendClient::new(config.backend.base_url.clone(), store);
            let spinner = spinner(&format!("Uploading {} file(s)...", attachments.len()));
            let result = client.upload(&attachments).await;
            spinner.finish_and_clear();
            println!("{} {}", style("✓").green(), result?);
        }
    }

    Ok(())
}

/// Run the gate for the main page with a logout control, then press it
fn logout(ctx: &AppContext) {
    let gate = ctx.gate(Arc::new(TerminalNavigator::default()));
    gate.on_page_load(&Page::Main, PageControls::with_logout());
    if gate.logout() {
        println!("{}", style("Logged out.").green());
    } else {
        println!("{}", style("Not logged in.").dim());
    }
}

fn show_config(manager: &ConfigManager) {
    let config = manager.config();
    println!("{}", style("Configuration").bold());
    println!("  File:     {}", manager.config_path().display());
    println!("  Backend:  {}", config.backend.base_url);
    println!("  Endpoint: {}", config.completion.base_url);
    println!("  Model:    {}", config.completion.model);
    let key = if manager.has_api_key() {
        style("configured".to_string()).green()
    } else {
        let env = config.completion.api_key_env.as_deref().unwrap_or("GEMINI_API_KEY");
        style(format!("missing (set {})", env)).yellow()
    };
    println!("  API key:  {}", key);
    let storage = config
        .general
        .storage_path
        .clone()
        .unwrap_or_else(FileTokenStore::default_path);
    println!("  Storage:  {}", storage.display());
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
