//! CLI `memory reset` command: clear all memory after user confirmation.

use anyhow::{bail, Result};
use std::io::Write;

use memchat::config::ChatConfig;
use memchat::memory::MemoryStore;

/// Replace the memory file with an empty snapshot after user confirmation.
pub fn reset(config: &ChatConfig) -> Result<()> {
    let path = config.resolved_memory_path();

    println!("WARNING: This will permanently delete ALL remembered facts, likes, topics and feedback.");
    println!("Memory file: {}", path.display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    let mut store = MemoryStore::load(&path);
    store.reset()?;

    println!("All memory deleted.");
    Ok(())
}
