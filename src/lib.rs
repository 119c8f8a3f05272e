//! Terminal chat for local Ollama models, with memory that survives restarts.
//!
//! memchat runs a single read-eval loop at the terminal. Each line is either a
//! slash-command answered locally or a message forwarded, together with the
//! running history and a computed system preamble, to a local Ollama server.
//! Small facts about the user are pulled out of their messages by surface
//! pattern matching and kept in a JSON file:
//!
//! | Kind | Example input | Stored as |
//! |------|---------------|-----------|
//! | **Fact** | `my name is Mila` | `user_name:Mila` |
//! | **Like** | `I like clean UI` | `clean ui` |
//! | **Dislike** | `I hate long meetings` | `long meetings` |
//! | **Topic** | `I am learning web development and api design` | `web development`, `api design` |
//! | **Feedback** | `/dislike too wordy` | rating of the last reply |
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`memory`]: Snapshot types, extraction, the JSON store, forget and rendering
//! - [`style`]: Reply styles and the keyword classifier used in auto mode
//! - [`prompt`]: System preamble assembly
//! - [`command`]: Parsing of prompt lines into slash-commands
//! - [`backend`]: The [`backend::ChatBackend`] seam and the Ollama client
//! - [`session`]: Per-line turn handling

pub mod backend;
pub mod command;
pub mod config;
pub mod memory;
pub mod prompt;
pub mod session;
pub mod style;
