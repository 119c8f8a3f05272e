//! Lexical memory extraction.
//!
//! Surface pattern matching over a single utterance. Each rule below is
//! evaluated independently, so one message can yield a name, a like, a
//! dislike and several topics at once. Misses and odd captures are accepted;
//! nothing here tries to understand the sentence.

use regex::Regex;

use super::types::MemoryUpdate;

/// Most topic updates proposed for one utterance.
const MAX_TOPICS_PER_UTTERANCE: usize = 8;
/// Longest topic phrase kept, in words.
const MAX_TOPIC_WORDS: usize = 4;
/// Shortest topic phrase kept, in words.
const MIN_TOPIC_WORDS: usize = 2;

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "am", "i", "you", "we", "they", "he", "she", "it", "to", "of",
    "for", "and", "or", "but", "that", "this", "with", "in", "on", "at", "from", "as", "be", "was",
    "were", "can", "could", "should", "would", "do", "did", "does", "have", "has", "had", "my",
    "your", "our", "their", "me", "him", "her", "them", "what", "how", "when", "where", "why",
    "about", "please", "just", "like", "want", "need", "help", "make", "add", "use", "using",
    "also", "really", "very", "chat", "talk", "topic",
];

/// Words after "I am" that read like a state rather than a name.
const NOT_NAMES: &[&str] = &[
    "Back", "Busy", "Done", "Fine", "Free", "Good", "Happy", "Here", "Hungry", "Lost", "New",
    "Not", "Okay", "Ready", "Sad", "Sick", "Sorry", "Sure", "Tired", "Bored", "Confused", "Stuck",
];

/// Compiled extraction rules. Build once and reuse.
pub struct MemoryExtractor {
    name: Regex,
    self_intro: Regex,
    likes: Vec<Regex>,
    dislikes: Vec<Regex>,
    topics: Vec<Regex>,
    topic_split: Regex,
    topic_word: Regex,
}

impl Default for MemoryExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryExtractor {
    pub fn new() -> Self {
        let compile = |p: &str| Regex::new(p).expect("valid extraction pattern");
        Self {
            name: compile(r"(?i)\bmy name is\s+([a-z][a-z0-9_-]{1,30})\b"),
            self_intro: compile(r"\b[Ii](?: am|'m)\s+([A-Z][a-zA-Z-]{1,30})\s*(?:[.!,;]|$)"),
            // Order matters: the first matching pattern of each group wins.
            likes: [r"\bi like\s+(.+)", r"\bi love\s+(.+)", r"\bi prefer\s+(.+)"]
                .into_iter()
                .map(compile)
                .collect(),
            dislikes: [
                r"\bi dislike\s+(.+)",
                r"\bi hate\s+(.+)",
                r"\bi don't like\s+(.+)",
                r"\bi do not like\s+(.+)",
            ]
            .into_iter()
            .map(compile)
            .collect(),
            topics: [
                r"\blearning\s+([^.!?;]{2,80})",
                r"\bstudying\s+([^.!?;]{2,80})",
                r"\bworking on\s+([^.!?;]{2,80})",
                r"\binterested in\s+([^.!?;]{2,80})",
                r"\binto\s+([^.!?;]{2,80})",
                r"\babout\s+([^.!?;]{2,80})",
                r"\bon\s+([^.!?;]{2,80})",
            ]
            .into_iter()
            .map(compile)
            .collect(),
            topic_split: compile(r",|&|\band\b|\bor\b"),
            topic_word: compile(r"[a-z][a-z0-9_-]{2,}"),
        }
    }

    /// Propose memory updates for one utterance, in rule order: name, like, dislike, topics.
    pub fn extract(&self, utterance: &str) -> Vec<MemoryUpdate> {
        let text = utterance.trim();
        // Curly apostrophes from some terminals would defeat the "don't" pattern.
        let low = text.to_lowercase().replace('\u{2019}', "'");
        let mut updates = Vec::new();

        if let Some(name) = self.extract_name(text) {
            updates.push(MemoryUpdate::Fact {
                key: "user_name".into(),
                value: name,
            });
        }
        if let Some(phrase) = first_capture(&self.likes, &low) {
            updates.push(MemoryUpdate::Like(phrase));
        }
        if let Some(phrase) = first_capture(&self.dislikes, &low) {
            updates.push(MemoryUpdate::Dislike(phrase));
        }
        updates.extend(self.extract_topics(&low).into_iter().map(MemoryUpdate::Topic));

        updates
    }

    fn extract_name(&self, text: &str) -> Option<String> {
        if let Some(caps) = self.name.captures(text) {
            return Some(caps[1].to_string());
        }
        let caps = self.self_intro.captures(text)?;
        let word = &caps[1];
        if word.ends_with("ing") || NOT_NAMES.contains(&word) {
            return None;
        }
        Some(word.to_string())
    }

    /// Explicit topic phrases first, then 3- and 2-word runs of content words.
    /// The per-utterance cap applies to raw candidates, duplicates included.
    fn extract_topics(&self, low: &str) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        for pattern in &self.topics {
            let Some(caps) = pattern.captures(low) else {
                continue;
            };
            candidates.extend(
                self.topic_split
                    .split(&caps[1])
                    .map(clean_topic)
                    .filter(|phrase| !phrase.is_empty()),
            );
        }

        let words: Vec<&str> = self
            .topic_word
            .find_iter(low)
            .map(|m| m.as_str())
            .filter(|w| !STOPWORDS.contains(w))
            .collect();
        for n in [3, 2] {
            candidates.extend(
                words
                    .windows(n)
                    .map(|run| clean_topic(&run.join(" ")))
                    .filter(|phrase| !phrase.is_empty()),
            );
        }

        candidates.truncate(MAX_TOPICS_PER_UTTERANCE);
        let mut topics: Vec<String> = Vec::with_capacity(candidates.len());
        for phrase in candidates {
            if !topics.contains(&phrase) {
                topics.push(phrase);
            }
        }
        topics
    }
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|p| {
        let caps = p.captures(text)?;
        let phrase = caps[1]
            .trim_end_matches(|c: char| matches!(c, '.' | ',' | '!') || c.is_whitespace())
            .trim()
            .to_string();
        (!phrase.is_empty()).then_some(phrase)
    })
}

/// Strip punctuation and stopwords, keeping at most [`MAX_TOPIC_WORDS`] words.
/// Phrases shorter than [`MIN_TOPIC_WORDS`] come back empty.
fn clean_topic(part: &str) -> String {
    let cleaned: String = part
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '_' | '-' | '+' | '#') {
                c
            } else {
                ' '
            }
        })
        .collect();
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c == '-' || c == '_'))
        .filter(|w| !w.is_empty() && !STOPWORDS.contains(w))
        .take(MAX_TOPIC_WORDS)
        .collect();
    if words.len() < MIN_TOPIC_WORDS {
        return String::new();
    }
    words.join(" ")
}
