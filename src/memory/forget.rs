//! Query-based removal of remembered entries.
//!
//! Matching is case-insensitive substring containment against each entry's
//! rendered text: facts as `key:value`, phrases as stored, feedback by its
//! note. A query ending in a plural or possessive `s` also matches its stem
//! as a whole word, so `milas` and `mila's` both forget `user_name:Mila`
//! while `atlas` leaves `atlanta trip` alone.

use regex::Regex;

use super::types::MemorySnapshot;

/// Remove every entry matching `query`. Returns the number of entries removed.
///
/// An empty or whitespace-only query matches nothing.
pub fn forget(snapshot: &mut MemorySnapshot, query: &str) -> usize {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    let stem = stem_of(&needle)
        .and_then(|stem| Regex::new(&format!(r"\b{}\b", regex::escape(stem))).ok());
    let matches = |text: &str| {
        let text = text.to_lowercase();
        text.contains(needle.as_str()) || stem.as_ref().is_some_and(|re| re.is_match(&text))
    };

    let before = count_entries(snapshot);

    snapshot
        .facts
        .retain(|key, value| !matches(&format!("{key}:{value}")));
    snapshot.likes.retain(|item| !matches(item.as_str()));
    snapshot.dislikes.retain(|item| !matches(item.as_str()));
    snapshot.topics.retain(|item| !matches(item.as_str()));
    snapshot
        .feedback
        .retain(|entry| !entry.note.as_deref().is_some_and(|note| matches(note)));

    let removed = before - count_entries(snapshot);
    tracing::debug!(query, removed, "forget applied");
    removed
}

/// The singular / non-possessive stem of a lower-cased query, if it has one.
fn stem_of(query: &str) -> Option<&str> {
    let stem = if let Some(stem) = query.strip_suffix("'s") {
        stem
    } else if query.ends_with('s') && !query.ends_with("ss") && query.chars().count() > 3 {
        query.strip_suffix('s')?
    } else {
        return None;
    };
    Some(stem.trim()).filter(|s| !s.is_empty())
}

fn count_entries(snapshot: &MemorySnapshot) -> usize {
    snapshot.facts.len()
        + snapshot.likes.len()
        + snapshot.dislikes.len()
        + snapshot.topics.len()
        + snapshot.feedback.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::types::{FeedbackEntry, MemoryUpdate, Polarity};

    fn sample() -> MemorySnapshot {
        let mut snapshot = MemorySnapshot::default();
        snapshot.apply(MemoryUpdate::Fact {
            key: "user_name".into(),
            value: "Mila".into(),
        });
        snapshot.apply(MemoryUpdate::Like("clean ui".into()));
        snapshot.apply(MemoryUpdate::Dislike("api churn".into()));
        snapshot.apply(MemoryUpdate::Topic("web development".into()));
        snapshot.apply(MemoryUpdate::Topic("api design".into()));
        snapshot.feedback.push(FeedbackEntry {
            polarity: Polarity::Dislike,
            note: Some("too much API jargon".into()),
            timestamp: chrono::Utc::now(),
            reply: "...".into(),
        });
        snapshot
    }

    #[test]
    fn empty_query_is_noop() {
        let mut snapshot = sample();
        let before = snapshot.clone();
        assert_eq!(forget(&mut snapshot, ""), 0);
        assert_eq!(forget(&mut snapshot, "   "), 0);
        assert_eq!(snapshot, before);
    }

    #[test]
    fn removes_every_list_case_insensitively() {
        let mut snapshot = sample();
        assert_eq!(forget(&mut snapshot, "API"), 3);
        assert_eq!(snapshot.topics, vec!["web development"]);
        assert!(snapshot.dislikes.is_empty());
        assert!(snapshot.feedback.is_empty());
        assert_eq!(snapshot.facts["user_name"], "Mila");
        assert_eq!(snapshot.likes, vec!["clean ui"]);
    }

    #[test]
    fn fact_matches_on_key_and_value() {
        let mut snapshot = sample();
        assert_eq!(forget(&mut snapshot, "user_name"), 1);
        assert!(snapshot.facts.is_empty());

        let mut snapshot = sample();
        assert_eq!(forget(&mut snapshot, "name:mi"), 1);
        assert!(snapshot.facts.is_empty());
    }

    #[test]
    fn plural_and_possessive_match_stem() {
        let mut snapshot = sample();
        assert_eq!(forget(&mut snapshot, "milas"), 1);
        assert!(snapshot.facts.is_empty());

        let mut snapshot = sample();
        assert_eq!(forget(&mut snapshot, "Mila's"), 1);
        assert!(snapshot.facts.is_empty());
    }

    #[test]
    fn short_or_double_s_words_are_not_stemmed() {
        assert_eq!(stem_of("gas"), None);
        assert_eq!(stem_of("class"), None);
        assert_eq!(stem_of("apis"), Some("api"));
        assert_eq!(stem_of("'s"), None);
    }

    #[test]
    fn stem_only_matches_whole_words() {
        let mut snapshot = MemorySnapshot::default();
        snapshot.apply(MemoryUpdate::Topic("atlanta trip".into()));
        snapshot.apply(MemoryUpdate::Like("something spicy".into()));
        let before = snapshot.clone();

        assert_eq!(forget(&mut snapshot, "atlas"), 0);
        assert_eq!(forget(&mut snapshot, "this"), 0);
        assert_eq!(snapshot, before);

        assert_eq!(forget(&mut snapshot, "trips"), 1);
        assert_eq!(snapshot.likes, vec!["something spicy"]);
        assert!(snapshot.topics.is_empty());
    }

    #[test]
    fn no_match_removes_nothing() {
        let mut snapshot = sample();
        let before = snapshot.clone();
        assert_eq!(forget(&mut snapshot, "kubernetes"), 0);
        assert_eq!(snapshot, before);
    }
}
