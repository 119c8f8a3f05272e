//! Text renderings of a snapshot: the `/memory` listing and the preamble summary.

use super::types::{MemorySnapshot, Polarity};

/// Human-readable listing used by `/memory` and `memchat memory show`.
pub fn render(snapshot: &MemorySnapshot) -> String {
    let facts: Vec<String> = snapshot
        .facts
        .iter()
        .map(|(key, value)| format!("{key}:{value}"))
        .collect();

    let mut lines = vec![
        "memory snapshot:".to_string(),
        format!("- facts ({}): {}", facts.len(), short_join(&facts, 8)),
        format!(
            "- likes ({}): {}",
            snapshot.likes.len(),
            short_join(&snapshot.likes, 8)
        ),
        format!(
            "- dislikes ({}): {}",
            snapshot.dislikes.len(),
            short_join(&snapshot.dislikes, 8)
        ),
        format!(
            "- topics ({}): {}",
            snapshot.topics.len(),
            short_join(&snapshot.topics, 12)
        ),
        format!(
            "- feedback: {} likes, {} dislikes",
            snapshot.feedback_count(Polarity::Like),
            snapshot.feedback_count(Polarity::Dislike)
        ),
    ];

    for polarity in [Polarity::Like, Polarity::Dislike] {
        let notes = snapshot.recent_feedback_notes(polarity, 3);
        if !notes.is_empty() {
            lines.push(format!("  recent {polarity} notes: {}", notes.join("; ")));
        }
    }

    lines.join("\n")
}

/// Memory block appended to the system preamble.
pub fn preamble_summary(snapshot: &MemorySnapshot) -> String {
    let facts: Vec<String> = snapshot
        .facts
        .iter()
        .map(|(key, value)| format!("{key}:{value}"))
        .collect();

    let mut out = format!(
        "Remembered user likes: {}. \
         Remembered user dislikes: {}. \
         Remembered user facts: {}. \
         Remembered topics: {}. \
         Feedback summary - liked replies count: {}, disliked replies count: {}. ",
        short_join(&snapshot.likes, 4),
        short_join(&snapshot.dislikes, 4),
        short_join(&facts, 4),
        short_join(&snapshot.topics, 8),
        snapshot.feedback_count(Polarity::Like),
        snapshot.feedback_count(Polarity::Dislike),
    );

    let liked = snapshot.recent_feedback_notes(Polarity::Like, 3);
    if !liked.is_empty() {
        out.push_str(&format!("Recent like feedback from user: {}. ", liked.join(", ")));
    }
    let disliked = snapshot.recent_feedback_notes(Polarity::Dislike, 3);
    if !disliked.is_empty() {
        out.push_str(&format!(
            "Recent dislike feedback from user: {}. ",
            disliked.join(", ")
        ));
    }
    out.push_str("If user disliked a prior reply, avoid repeating its tone or wording.");
    out
}

/// The newest `max` items joined by commas, or `none`.
fn short_join<S: AsRef<str>>(items: &[S], max: usize) -> String {
    if items.is_empty() {
        return "none".into();
    }
    let start = items.len().saturating_sub(max);
    items[start..]
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}
