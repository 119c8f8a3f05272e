//! CLI `memory` commands: inspect, export, and prune the memory file outside a chat.

use anyhow::Result;

use memchat::config::ChatConfig;
use memchat::memory::render::render;
use memchat::memory::MemoryStore;

/// Print the memory listing, same as `/memory` inside a chat.
pub fn show(config: &ChatConfig) -> Result<()> {
    let store = MemoryStore::load(config.resolved_memory_path());
    println!("Memory file: {}", store.path().display());
    println!("{}", render(&store.snapshot));
    Ok(())
}

/// Print the snapshot as JSON to stdout.
pub fn export(config: &ChatConfig) -> Result<()> {
    let store = MemoryStore::load(config.resolved_memory_path());
    let json = serde_json::to_string_pretty(&store.snapshot)?;
    println!("{json}");

    eprintln!(
        "Exported {} facts, {} likes, {} dislikes, {} topics and {} feedback entries.",
        store.snapshot.facts.len(),
        store.snapshot.likes.len(),
        store.snapshot.dislikes.len(),
        store.snapshot.topics.len(),
        store.snapshot.feedback.len()
    );
    Ok(())
}

/// Remove every entry matching `query`, same as `/forget` inside a chat.
pub fn forget(config: &ChatConfig, query: &str) -> Result<()> {
    let mut store = MemoryStore::load(config.resolved_memory_path());
    let removed = store.forget(query)?;
    println!("forget done: removed {removed} item(s)");
    Ok(())
}
