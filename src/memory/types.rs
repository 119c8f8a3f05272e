//! Persisted memory type definitions.
//!
//! Defines [`MemorySnapshot`] (the whole `.chat_memory.json` document),
//! [`FeedbackEntry`] (a rating of one assistant reply), and [`MemoryUpdate`]
//! (a tagged proposal produced by the extractor).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Newest likes / dislikes kept.
pub const MAX_PREFERENCES: usize = 40;
/// Newest topics kept.
pub const MAX_TOPICS: usize = 80;

/// Everything remembered about the user, read and rewritten as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySnapshot {
    /// Named facts, e.g. `user_name → Mila`. Values keep the user's casing.
    pub facts: BTreeMap<String, String>,
    /// Lower-cased like phrases, oldest first.
    pub likes: Vec<String>,
    /// Lower-cased dislike phrases, oldest first.
    pub dislikes: Vec<String>,
    /// Lower-cased topic phrases, oldest first.
    pub topics: Vec<String>,
    /// Ratings of past replies, in the order they were given.
    pub feedback: Vec<FeedbackEntry>,
}

/// Approval or disapproval of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Like,
    Dislike,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user rating of the assistant reply that was current when it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub polarity: Polarity,
    #[serde(default)]
    pub note: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Text of the rated reply.
    #[serde(default)]
    pub reply: String,
}

/// One change proposed by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryUpdate {
    Fact { key: String, value: String },
    Like(String),
    Dislike(String),
    Topic(String),
}

impl MemorySnapshot {
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
            && self.likes.is_empty()
            && self.dislikes.is_empty()
            && self.topics.is_empty()
            && self.feedback.is_empty()
    }

    /// Apply an update with deduplication. Returns `true` if anything changed.
    pub fn apply(&mut self, update: MemoryUpdate) -> bool {
        match update {
            MemoryUpdate::Fact { key, value } => {
                let (key, value) = (key.trim().to_string(), value.trim().to_string());
                if key.is_empty() || value.is_empty() {
                    return false;
                }
                if self.facts.get(&key) == Some(&value) {
                    return false;
                }
                self.facts.insert(key, value);
                true
            }
            MemoryUpdate::Like(phrase) => add_unique(&mut self.likes, &phrase, MAX_PREFERENCES),
            MemoryUpdate::Dislike(phrase) => {
                add_unique(&mut self.dislikes, &phrase, MAX_PREFERENCES)
            }
            MemoryUpdate::Topic(phrase) => add_unique(&mut self.topics, &phrase, MAX_TOPICS),
        }
    }

    pub fn feedback_count(&self, polarity: Polarity) -> usize {
        self.feedback
            .iter()
            .filter(|f| f.polarity == polarity)
            .count()
    }

    /// The newest `max` non-empty notes for `polarity`, oldest first.
    pub fn recent_feedback_notes(&self, polarity: Polarity, max: usize) -> Vec<&str> {
        let mut notes: Vec<&str> = self
            .feedback
            .iter()
            .rev()
            .filter(|f| f.polarity == polarity)
            .filter_map(|f| f.note.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .take(max)
            .collect();
        notes.reverse();
        notes
    }
}

/// Insert a normalized phrase unless present, dropping the oldest entries past `cap`.
fn add_unique(items: &mut Vec<String>, phrase: &str, cap: usize) -> bool {
    let phrase = phrase.trim().to_lowercase();
    if phrase.is_empty() || items.contains(&phrase) {
        return false;
    }
    items.push(phrase);
    if items.len() > cap {
        let excess = items.len() - cap;
        items.drain(..excess);
    }
    true
}
