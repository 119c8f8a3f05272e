//! CLI `models` command: show what the Ollama server has and which model a chat would use.

use anyhow::{Context, Result};

use memchat::backend::choose_model;
use memchat::backend::ollama::OllamaClient;
use memchat::config::ChatConfig;

pub async fn models(config: &ChatConfig) -> Result<()> {
    let client = OllamaClient::new(config).context("failed to set up Ollama client")?;
    let installed = client.list_models().await;

    println!("Ollama endpoint:   {}", client.chat_url());
    println!(
        "Configured model:  {}",
        config.backend.model.as_deref().unwrap_or("(not set)")
    );
    println!();

    if installed.is_empty() {
        println!("Installed models:  none found (is `ollama serve` running?)");
    } else {
        println!("Installed models:");
        for name in &installed {
            println!("  {name}");
        }
    }
    println!();

    match choose_model(
        config.backend.model.as_deref(),
        &installed,
        &config.backend.preferred_models,
    ) {
        Ok(model) => println!("Chat would use:    {model}"),
        Err(e) => println!("Chat would fail:   {e}"),
    }

    Ok(())
}
