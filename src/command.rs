//! Parsing of lines typed at the chat prompt.

use thiserror::Error;

use crate::memory::Polarity;
use crate::style::{available_styles, StyleMode};

/// A slash-command typed at the prompt. These never reach the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    /// `/reset` (history only) or `/reset all` (history and memory).
    Reset { all: bool },
    ShowStyle,
    SetStyle(StyleMode),
    Feedback {
        polarity: Polarity,
        note: Option<String>,
    },
    ShowMemory,
    Forget(String),
}

/// A line that looked like a command but could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("usage: /forget <text>")]
    MissingForgetQuery,

    #[error("unknown style: {0}\navailable: {styles}", styles = available_styles())]
    UnknownStyle(String),

    #[error("usage: /reset or /reset all")]
    BadReset,

    #[error("unknown command: {0}")]
    Unknown(String),
}

/// What a prompt line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Command(Command),
    Text(String),
}

/// Classify one prompt line. Anything not starting with `/` (besides bare
/// `exit` / `quit`) is ordinary text for the model, as is a line whose first
/// word is a path such as `/usr/bin`.
pub fn parse(line: &str) -> Result<Input, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Empty);
    }
    if matches!(line, "exit" | "quit") {
        return Ok(Input::Command(Command::Exit));
    }
    if !line.starts_with('/') {
        return Ok(Input::Text(line.to_string()));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let note = (!rest.is_empty()).then(|| rest.to_string());

    let command = match word {
        "/exit" | "/quit" => Command::Exit,
        "/reset" => match rest {
            "" => Command::Reset { all: false },
            "all" => Command::Reset { all: true },
            _ => return Err(CommandError::BadReset),
        },
        "/style" if rest.is_empty() => Command::ShowStyle,
        "/style" => Command::SetStyle(
            rest.parse()
                .map_err(|_| CommandError::UnknownStyle(rest.to_lowercase()))?,
        ),
        "/like" => Command::Feedback {
            polarity: Polarity::Like,
            note,
        },
        "/dislike" => Command::Feedback {
            polarity: Polarity::Dislike,
            note,
        },
        "/memory" => Command::ShowMemory,
        "/forget" if rest.is_empty() => return Err(CommandError::MissingForgetQuery),
        "/forget" => Command::Forget(rest.to_string()),
        other if looks_like_command(other) => {
            return Err(CommandError::Unknown(other.to_string()))
        }
        _ => return Ok(Input::Text(line.to_string())),
    };
    Ok(Input::Command(command))
}

/// `/word` with only ASCII letters after the slash.
fn looks_like_command(word: &str) -> bool {
    word.strip_prefix('/')
        .is_some_and(|name| !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic()))
}
