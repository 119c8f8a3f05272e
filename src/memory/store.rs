//! Load/save path for the memory file.
//!
//! [`MemoryStore::load`] never fails: a missing or malformed file becomes an
//! empty snapshot. [`MemoryStore::save`] rewrites the whole document through a
//! temp file and a rename, so the file on disk is always either the previous
//! or the new version.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::types::{MemorySnapshot, MemoryUpdate};

/// A memory snapshot bound to its backing file.
#[derive(Debug)]
pub struct MemoryStore {
    path: PathBuf,
    pub snapshot: MemorySnapshot,
}

impl MemoryStore {
    /// Load the snapshot at `path`, substituting an empty one on any failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let snapshot = read_snapshot(&path);
        tracing::debug!(
            path = %path.display(),
            facts = snapshot.facts.len(),
            likes = snapshot.likes.len(),
            dislikes = snapshot.dislikes.len(),
            topics = snapshot.topics.len(),
            feedback = snapshot.feedback.len(),
            "memory loaded"
        );
        Self { path, snapshot }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full snapshot to disk (tmp + rename).
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&self.snapshot)
            .context("failed to serialize memory")?;

        let tmp_path = self.path.with_extension("json.tmp");
        let written = write_tmp(&tmp_path, json.as_bytes()).and_then(|()| {
            std::fs::rename(&tmp_path, &self.path)
                .with_context(|| format!("failed to replace {}", self.path.display()))
        });
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }

        tracing::debug!(path = %self.path.display(), bytes = json.len(), "memory saved");
        Ok(())
    }

    /// Apply extractor proposals. Returns how many actually changed the snapshot.
    pub fn apply_all(&mut self, updates: impl IntoIterator<Item = MemoryUpdate>) -> usize {
        let mut changed = 0;
        for update in updates {
            tracing::trace!(?update, "applying memory update");
            if self.snapshot.apply(update) {
                changed += 1;
            }
        }
        changed
    }

    /// Remove matching entries and persist. Returns the number removed.
    pub fn forget(&mut self, query: &str) -> Result<usize> {
        let removed = super::forget::forget(&mut self.snapshot, query);
        self.save()?;
        Ok(removed)
    }

    /// Replace everything with the canonical empty snapshot and persist it.
    pub fn reset(&mut self) -> Result<()> {
        self.snapshot = MemorySnapshot::default();
        self.save()
    }
}

fn write_tmp(tmp_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = std::fs::File::create(tmp_path)
        .with_context(|| format!("failed to create temp file: {}", tmp_path.display()))?;
    file.write_all(bytes)
        .context("error writing memory file")?;
    file.flush().context("error flushing memory file")?;
    file.sync_all().context("error syncing memory file to disk")?;
    Ok(())
}

fn read_snapshot(path: &Path) -> MemorySnapshot {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no memory file yet, starting empty");
            return MemorySnapshot::default();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "memory file unreadable, starting empty");
            return MemorySnapshot::default();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "memory file malformed, starting empty");
            MemorySnapshot::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let store = MemoryStore::load(tmp.path().join("nope.json"));
        assert!(store.snapshot.is_empty());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memory.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(MemoryStore::load(&path).snapshot.is_empty());

        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(MemoryStore::load(&path).snapshot.is_empty());

        std::fs::write(&path, r#"{"likes": "not a list"}"#).unwrap();
        assert!(MemoryStore::load(&path).snapshot.is_empty());
    }

    #[test]
    fn save_then_load_preserves_snapshot() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memory.json");

        let mut store = MemoryStore::load(&path);
        let changed = store.apply_all([
            MemoryUpdate::Fact {
                key: "user_name".into(),
                value: "Mila".into(),
            },
            MemoryUpdate::Topic("api design".into()),
            MemoryUpdate::Topic("api design".into()),
        ]);
        assert_eq!(changed, 2);
        store.save().unwrap();

        let reloaded = MemoryStore::load(&path);
        assert_eq!(reloaded.snapshot, store.snapshot);
        assert!(!tmp.path().join("memory.json.tmp").exists());
    }

    #[test]
    fn failed_save_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memory.json");
        // A directory in the way makes the final rename fail.
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let store = MemoryStore::load(&path);
        let err = store.save().unwrap_err();
        assert!(err.to_string().contains("failed to replace"));
        assert!(!tmp.path().join("memory.json.tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn save_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("dir").join("memory.json");
        let store = MemoryStore::load(&path);
        store.save().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn reset_writes_canonical_empty_snapshot() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memory.json");
        let mut store = MemoryStore::load(&path);
        store.apply_all([MemoryUpdate::Like("tea".into())]);
        store.save().unwrap();

        store.reset().unwrap();

        let on_disk = std::fs::read_to_string(&path).unwrap();
        let canonical = serde_json::to_string_pretty(&MemorySnapshot::default()).unwrap();
        assert_eq!(on_disk, canonical);
    }
}
