//! CLI `chat` command: the interactive prompt loop.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tokio::sync::mpsc;

use memchat::backend::ollama::OllamaClient;
use memchat::backend::{choose_model, ChatBackend};
use memchat::command::{self, Input};
use memchat::config::ChatConfig;
use memchat::memory::MemoryStore;
use memchat::session::{Outcome, Session, SessionOptions};

const HELP: &str = "Type /exit to quit, /reset to clear history, /reset all to clear memory, \
                    /style to view/set tone, /like and /dislike for feedback, \
                    /memory and /forget <text> for memory control.";

/// Pick a model, load memory, and run the prompt loop until `/exit`, EOF or Ctrl-C.
pub async fn chat(config: &ChatConfig) -> Result<()> {
    let client = OllamaClient::new(config).context("failed to set up Ollama client")?;
    let installed = client.list_models().await;
    let model = choose_model(
        config.backend.model.as_deref(),
        &installed,
        &config.backend.preferred_models,
    )?;
    tracing::info!(model = %model, url = %client.chat_url(), "model selected");

    let store = MemoryStore::load(config.resolved_memory_path());
    let options = SessionOptions {
        style_seed: config.style_seed(),
        style_window: config.chat.style_window,
    };
    let mut session = Session::new(client, model, store, options);

    println!(
        "Terminal AI chat via Ollama (model: {}, style: {})",
        session.model(),
        session.style_mode()
    );
    println!("{HELP}\n");

    let lines = spawn_stdin_reader();
    run_prompt(
        &mut session,
        lines,
        &mut std::io::stdout(),
        tokio::signal::ctrl_c(),
    )
    .await
}

/// Feed stdin lines through a channel from a plain OS thread.
///
/// A read parked on the runtime's blocking pool holds shutdown until the next
/// line arrives, so Ctrl-C would print "bye" and then hang.
fn spawn_stdin_reader() -> mpsc::Receiver<io::Result<String>> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Drive the session until `/exit`, end of input, or `interrupt` resolves.
async fn run_prompt<B, F>(
    session: &mut Session<B>,
    mut lines: mpsc::Receiver<io::Result<String>>,
    out: &mut impl Write,
    interrupt: F,
) -> Result<()>
where
    B: ChatBackend,
    F: Future,
{
    tokio::pin!(interrupt);

    loop {
        write!(out, "you> ")?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.recv() => line.transpose().context("failed to read from stdin")?,
            _ = &mut interrupt => None,
        };
        let Some(line) = line else {
            writeln!(out, "\nbye")?;
            break;
        };

        let spinner = matches!(command::parse(&line), Ok(Input::Text(_))).then(thinking_spinner);
        let outcome = tokio::select! {
            outcome = session.handle_line(&line) => Some(outcome),
            _ = &mut interrupt => None,
        };
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        let Some(outcome) = outcome else {
            writeln!(out, "\nbye")?;
            break;
        };

        match outcome {
            Outcome::Ignored => {}
            Outcome::Exit => {
                writeln!(out, "bye")?;
                break;
            }
            Outcome::Notice(text) => writeln!(out, "{text}")?,
            Outcome::Reply { text, style } => {
                tracing::debug!(style = %style, chars = text.len(), "reply received");
                writeln!(out, "ai> {text}\n")?;
            }
            Outcome::Failed(text) => {
                for line in text.lines() {
                    writeln!(out, "ai> {line}")?;
                }
            }
        }
    }

    Ok(())
}

fn thinking_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .expect("valid template"),
    );
    pb.set_message("thinking...");
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
