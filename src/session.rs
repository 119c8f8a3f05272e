//! One chat session: history, style state, memory, and the per-line turn logic.
//!
//! [`Session::handle_line`] is the whole state machine. Slash-commands are
//! answered locally; ordinary text goes through extraction, style selection,
//! preamble assembly and one backend call.

use chrono::Utc;

use crate::backend::{ChatBackend, ChatMessage, ChatRequest, Role};
use crate::command::{self, Command, Input};
use crate::memory::{FeedbackEntry, MemoryExtractor, MemorySnapshot, MemoryStore, Polarity};
use crate::prompt::build_preamble;
use crate::style::{self, available_styles, Style, StyleMode};

/// Note stored for `/dislike` without text.
pub const DEFAULT_DISLIKE_NOTE: &str =
    "Tone was not good; be respectful, neutral, and non-sarcastic.";

/// Style settings a session starts with.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Mode restored on `/reset`.
    pub style_seed: StyleMode,
    /// How many recent user messages the classifier sees.
    pub style_window: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            style_seed: StyleMode::Auto,
            style_window: 3,
        }
    }
}

/// What the caller should show after a line was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Blank line, nothing to show.
    Ignored,
    Exit,
    /// Local answer to a command or a usage error.
    Notice(String),
    Reply { text: String, style: Style },
    /// The backend call failed; the user turn stays in history.
    Failed(String),
}

pub struct Session<B> {
    backend: B,
    model: String,
    store: MemoryStore,
    extractor: MemoryExtractor,
    options: SessionOptions,
    history: Vec<ChatMessage>,
    mode: StyleMode,
    active_style: Option<Style>,
    last_reply: Option<String>,
}

impl<B: ChatBackend> Session<B> {
    pub fn new(
        backend: B,
        model: impl Into<String>,
        store: MemoryStore,
        options: SessionOptions,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            store,
            extractor: MemoryExtractor::new(),
            options,
            history: Vec::new(),
            mode: options.style_seed,
            active_style: None,
            last_reply: None,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn style_mode(&self) -> StyleMode {
        self.mode
    }

    pub fn active_style(&self) -> Option<Style> {
        self.active_style
    }

    pub fn memory(&self) -> &MemorySnapshot {
        &self.store.snapshot
    }

    pub fn last_reply(&self) -> Option<&str> {
        self.last_reply.as_deref()
    }

    /// Handle one line typed at the prompt.
    pub async fn handle_line(&mut self, line: &str) -> Outcome {
        match command::parse(line) {
            Ok(Input::Empty) => Outcome::Ignored,
            Ok(Input::Command(cmd)) => self.run_command(cmd),
            Ok(Input::Text(text)) => self.converse(&text).await,
            Err(e) => Outcome::Notice(e.to_string()),
        }
    }

    fn run_command(&mut self, cmd: Command) -> Outcome {
        tracing::debug!(?cmd, "command");
        match cmd {
            Command::Exit => Outcome::Exit,
            Command::Reset { all: false } => {
                self.clear_conversation();
                Outcome::Notice("history cleared".into())
            }
            Command::Reset { all: true } => {
                self.clear_conversation();
                match self.store.reset() {
                    Ok(()) => Outcome::Notice("all memory and current history cleared".into()),
                    Err(e) => Outcome::Notice(format!(
                        "history cleared, but memory could not be reset: {e:#}"
                    )),
                }
            }
            Command::ShowStyle => Outcome::Notice(format!(
                "current mode: {}\navailable: {}",
                self.mode,
                available_styles()
            )),
            Command::SetStyle(mode) => {
                self.mode = mode;
                self.history.clear();
                if let StyleMode::Forced(style) = mode {
                    self.active_style = Some(style);
                }
                match mode {
                    StyleMode::Auto => {
                        Outcome::Notice("style mode set to: auto (history cleared)".into())
                    }
                    StyleMode::Forced(style) => {
                        Outcome::Notice(format!("style set to: {style} (history cleared)"))
                    }
                }
            }
            Command::Feedback { polarity, note } => self.record_feedback(polarity, note),
            Command::ShowMemory => {
                Outcome::Notice(crate::memory::render::render(&self.store.snapshot))
            }
            Command::Forget(query) => match self.store.forget(&query) {
                Ok(removed) => Outcome::Notice(format!("forget done: removed {removed} item(s)")),
                Err(e) => Outcome::Notice(format!("forget applied, but saving failed: {e:#}")),
            },
        }
    }

    /// `/reset` semantics: history, last reply and style go back to the start state.
    fn clear_conversation(&mut self) {
        self.history.clear();
        self.last_reply = None;
        self.mode = self.options.style_seed;
        self.active_style = None;
    }

    fn record_feedback(&mut self, polarity: Polarity, note: Option<String>) -> Outcome {
        let Some(reply) = self.last_reply.clone() else {
            return Outcome::Notice("no assistant reply to rate yet".into());
        };
        let note = match (polarity, note) {
            (Polarity::Dislike, None) => Some(DEFAULT_DISLIKE_NOTE.to_string()),
            (_, note) => note,
        };

        self.store.snapshot.feedback.push(FeedbackEntry {
            polarity,
            note,
            timestamp: Utc::now(),
            reply,
        });

        match self.store.save() {
            Ok(()) => Outcome::Notice(format!("saved: {polarity} feedback")),
            Err(e) => Outcome::Notice(format!("feedback noted, but saving failed: {e:#}")),
        }
    }

    async fn converse(&mut self, text: &str) -> Outcome {
        let updates = self.extractor.extract(text);
        if self.store.apply_all(updates) > 0 {
            if let Err(e) = self.store.save() {
                tracing::warn!(
                    path = %self.store.path().display(),
                    error = ?e,
                    "failed to save memory"
                );
            }
        }

        let recent = self.recent_user_text(text);
        let style = style::classify(&recent, self.mode, self.active_style);
        self.active_style = Some(style);

        let preamble = build_preamble(
            style,
            self.mode.is_auto(),
            &self.store.snapshot,
            chrono::Local::now().naive_local(),
        );

        self.history.push(ChatMessage::user(text));

        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(ChatMessage::system(preamble));
        messages.extend(self.history.iter().cloned());
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            options: style.options(),
        };

        tracing::info!(style = %style, mode = %self.mode, turns = self.history.len(), "calling model");

        match self.backend.chat(&request).await {
            Ok(reply) => {
                self.history.push(ChatMessage::assistant(reply.clone()));
                self.last_reply = Some(reply.clone());
                Outcome::Reply { text: reply, style }
            }
            Err(e) => {
                tracing::warn!(error = %e, "model call failed");
                Outcome::Failed(format!(
                    "error: {e}\ntip: run `ollama pull {}` and `ollama serve`",
                    self.model
                ))
            }
        }
    }

    /// The newest user utterances (oldest first) including `current`, capped to the window.
    fn recent_user_text<'a>(&'a self, current: &'a str) -> Vec<&'a str> {
        let window = self.options.style_window.max(1);
        let mut recent: Vec<&str> = self
            .history
            .iter()
            .rev()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .take(window - 1)
            .collect();
        recent.reverse();
        recent.push(current);
        recent
    }
}
