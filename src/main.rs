mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use memchat::config::{self, ChatConfig};

#[derive(Parser)]
#[command(
    name = "memchat",
    version,
    about = "Terminal chat for local Ollama models, with memory across sessions"
)]
struct Cli {
    /// Config file (default: ~/.memchat/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Ollama model to use (overrides OLLAMA_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,
    /// Starting style: auto, casual, concise or pro (overrides CHAT_STYLE)
    #[arg(long, global = true)]
    style: Option<String>,
    /// Memory file (overrides CHAT_MEMORY_FILE)
    #[arg(long, global = true)]
    memory_file: Option<String>,
    /// Ollama chat endpoint (overrides OLLAMA_API_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive chat (default)
    Chat,
    /// Inspect or edit the memory file
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },
    /// List installed Ollama models and the one that would be used
    Models,
}

#[derive(Subcommand)]
enum MemoryAction {
    /// Print the remembered facts, likes, dislikes, topics and feedback
    Show,
    /// Print the memory file as JSON
    Export,
    /// Remove every entry containing the given text
    Forget { query: String },
    /// Delete all memory after confirmation
    Reset,
}

impl Cli {
    fn apply_overrides(&self, config: &mut ChatConfig) {
        if let Some(ref model) = self.model {
            config.backend.model = Some(model.clone());
        }
        if let Some(ref style) = self.style {
            config.chat.style = style.clone();
        }
        if let Some(ref path) = self.memory_file {
            config.storage.memory_file = path.clone();
        }
        if let Some(ref url) = self.url {
            config.backend.url = url.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => ChatConfig::load_from(path)?,
        None => ChatConfig::load()?,
    };
    cli.apply_overrides(&mut config);

    // Log to stderr so stdout stays the conversation.
    let filter =
        EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        config_dir = %config::default_memchat_dir().display(),
        memory = %config.resolved_memory_path().display(),
        "configuration loaded"
    );

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => cli::chat::chat(&config).await?,
        Command::Memory { action } => match action {
            MemoryAction::Show => cli::memory::show(&config)?,
            MemoryAction::Export => cli::memory::export(&config)?,
            MemoryAction::Forget { query } => cli::memory::forget(&config, &query)?,
            MemoryAction::Reset => cli::reset::reset(&config)?,
        },
        Command::Models => cli::models::models(&config).await?,
    }

    Ok(())
}
