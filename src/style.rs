//! Reply styles and the keyword-scoring classifier that picks one in auto mode.

use serde::Serialize;

/// The three concrete reply styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Casual,
    Concise,
    Pro,
}

/// Sampling options sent to the model alongside a style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Casual, Style::Concise, Style::Pro];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Concise => "concise",
            Self::Pro => "pro",
        }
    }

    /// Tone instruction placed at the top of the system preamble.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Casual => {
                "You are chatting with a friend in a terminal. \
                 Sound natural, warm, and direct. \
                 Use plain language, contractions, and occasional light humor when it fits. \
                 Keep it short by default and avoid sounding like a formal assistant. \
                 Be consistently kind and supportive."
            }
            Self::Concise => {
                "You are a practical terminal assistant. \
                 Be clear and accurate. \
                 Keep replies brief and skip extra fluff. \
                 Even when brief, stay friendly and respectful."
            }
            Self::Pro => {
                "You are a professional technical assistant in a terminal chat. \
                 Be direct, structured, and precise. \
                 Keep replies focused and concise unless asked for detail. \
                 Maintain a calm, courteous tone."
            }
        }
    }

    pub fn options(&self) -> SamplingOptions {
        match self {
            Self::Casual => SamplingOptions {
                temperature: 0.9,
                top_p: 0.95,
            },
            Self::Concise => SamplingOptions {
                temperature: 0.4,
                top_p: 0.9,
            },
            Self::Pro => SamplingOptions {
                temperature: 0.6,
                top_p: 0.9,
            },
        }
    }

    fn cues(&self) -> &'static [&'static str] {
        match self {
            Self::Casual => CASUAL_CUES,
            Self::Concise => CONCISE_CUES,
            Self::Pro => PRO_CUES,
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "casual" => Ok(Self::Casual),
            "concise" => Ok(Self::Concise),
            "pro" => Ok(Self::Pro),
            other => Err(format!("unknown style: {other}")),
        }
    }
}

/// Whether the classifier runs, or the user pinned a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleMode {
    #[default]
    Auto,
    Forced(Style),
}

impl StyleMode {
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl std::fmt::Display for StyleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Forced(style) => style.fmt(f),
        }
    }
}

impl std::str::FromStr for StyleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse().map(Self::Forced)
    }
}

/// Label list shown by `/style` and in usage errors.
pub fn available_styles() -> String {
    let names: Vec<&str> = Style::ALL.iter().map(|s| s.as_str()).collect();
    format!("auto, {}", names.join(", "))
}

const CASUAL_CUES: &[&str] = &[
    "hey", "hi", "hello", "yo", "lol", "haha", "lmao", "thanks", "thank you", "cool", "awesome",
    "nice", "dude", "bro", "buddy", "how are you", "what's up", "sup", "fun", "chat", "weekend",
    "movie", "music", "game", "feel", "feeling",
];

const CONCISE_CUES: &[&str] = &[
    "short answer",
    "brief",
    "briefly",
    "tl;dr",
    "tldr",
    "just answer",
    "one line",
    "one word",
    "yes or no",
    "quick",
    "quickly",
    "summarize",
    "in short",
];

const PRO_CUES: &[&str] = &[
    "error",
    "stack trace",
    "bug",
    "debug",
    "fix",
    "build",
    "deploy",
    "architecture",
    "design",
    "api",
    "database",
    "sql",
    "python",
    "javascript",
    "typescript",
    "java",
    "go",
    "rust",
    "c++",
    "refactor",
    "performance",
    "security",
    "review",
    "test",
    "ci",
    "cd",
    "compile",
    "function",
    "server",
];

/// Pick the style for the next reply.
///
/// A forced mode is returned as-is. In auto mode each recent utterance is scored
/// against the cue lists; a one-word newest utterance adds a point to concise.
/// Exact ties keep `previous` when it is among the leaders, else `casual`.
pub fn classify(recent: &[&str], mode: StyleMode, previous: Option<Style>) -> Style {
    if let StyleMode::Forced(style) = mode {
        return style;
    }

    let normalized: Vec<String> = recent.iter().map(|u| normalize(u)).collect();
    let mut scores: Vec<(Style, usize)> = Style::ALL
        .iter()
        .map(|style| {
            let hits = normalized
                .iter()
                .map(|text| count_cues(text, style.cues()))
                .sum();
            (*style, hits)
        })
        .collect();

    if let Some(latest) = recent.last() {
        if latest.split_whitespace().count() == 1 {
            if let Some(entry) = scores.iter_mut().find(|(s, _)| *s == Style::Concise) {
                entry.1 += 1;
            }
        }
    }

    let best = scores.iter().map(|(_, n)| *n).max().unwrap_or(0);
    let leaders: Vec<Style> = scores
        .iter()
        .filter(|(_, n)| *n == best)
        .map(|(s, _)| *s)
        .collect();

    match (leaders.as_slice(), previous) {
        ([only], _) => *only,
        (_, Some(prev)) if leaders.contains(&prev) => prev,
        _ => Style::Casual,
    }
}

/// Lower-case and pad with spaces so cues can be matched on word boundaries.
fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '+' | '#' | ';' | '\'') {
                c
            } else {
                ' '
            }
        })
        .collect();
    format!(" {} ", cleaned.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn count_cues(normalized: &str, cues: &[&str]) -> usize {
    cues.iter()
        .filter(|cue| normalized.contains(&format!(" {cue} ")))
        .count()
}
