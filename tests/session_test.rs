mod helpers;

use helpers::{memory_path, notice, session, session_with, FakeBackend, TEST_MODEL};
use memchat::backend::{BackendError, Role};
use memchat::memory::{MemorySnapshot, Polarity};
use memchat::session::{Outcome, SessionOptions, DEFAULT_DISLIKE_NOTE};
use memchat::style::{Style, StyleMode};
use tempfile::TempDir;

#[tokio::test]
async fn text_turn_sends_preamble_and_history() {
    let tmp = TempDir::new().unwrap();
    let backend = FakeBackend::default().reply("first").reply("second");
    let mut chat = session(&tmp, backend.clone());

    let outcome = chat.handle_line("hello there").await;
    assert!(matches!(outcome, Outcome::Reply { ref text, .. } if text == "first"));
    chat.handle_line("and again").await;

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].model, TEST_MODEL);

    let second = &requests[1].messages;
    assert_eq!(second[0].role, Role::System);
    assert!(second[0].content.contains("Current local date and time:"));
    let turns: Vec<(Role, &str)> = second[1..]
        .iter()
        .map(|m| (m.role, m.content.as_str()))
        .collect();
    assert_eq!(
        turns,
        vec![
            (Role::User, "hello there"),
            (Role::Assistant, "first"),
            (Role::User, "and again"),
        ]
    );

    assert_eq!(chat.history().len(), 4);
    assert_eq!(chat.last_reply(), Some("second"));
}

#[tokio::test]
async fn commands_never_reach_the_backend() {
    let tmp = TempDir::new().unwrap();
    let backend = FakeBackend::default();
    let mut chat = session(&tmp, backend.clone());

    for line in [
        "/memory",
        "/style",
        "/style concise",
        "/forget nothing",
        "/like",
        "/dislike meh",
        "/reset",
        "/reset all",
        "/bogus",
        "   ",
    ] {
        chat.handle_line(line).await;
    }

    assert!(backend.requests().is_empty());
    assert!(chat.history().is_empty());
}

#[tokio::test]
async fn path_like_lines_go_to_the_model() {
    let tmp = TempDir::new().unwrap();
    let backend = FakeBackend::default().reply("check your PATH");
    let mut chat = session(&tmp, backend.clone());

    let outcome = chat.handle_line("/usr/bin is slow, why?").await;
    assert!(matches!(outcome, Outcome::Reply { ref text, .. } if text == "check your PATH"));

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    let last = requests[0].messages.last().unwrap();
    assert_eq!(last.role, Role::User);
    assert_eq!(last.content, "/usr/bin is slow, why?");
}

#[tokio::test]
async fn slash_commands_skip_extraction() {
    let tmp = TempDir::new().unwrap();
    let mut chat = session(&tmp, FakeBackend::default());

    chat.handle_line("/forget i like turnips").await;
    assert!(chat.memory().likes.is_empty());
}

#[tokio::test]
async fn exit_aliases() {
    let tmp = TempDir::new().unwrap();
    let mut chat = session(&tmp, FakeBackend::default());
    assert_eq!(chat.handle_line("/exit").await, Outcome::Exit);
    assert_eq!(chat.handle_line("quit").await, Outcome::Exit);
}

#[tokio::test]
async fn backend_failure_keeps_user_turn_only() {
    let tmp = TempDir::new().unwrap();
    let backend = FakeBackend::default().fail(BackendError::Unreachable {
        url: "http://127.0.0.1:11434/api/chat".into(),
    });
    let mut chat = session(&tmp, backend);

    let outcome = chat.handle_line("are you there?").await;
    let Outcome::Failed(message) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(message.contains("Is Ollama running?"));
    assert!(message.contains(&format!("ollama pull {TEST_MODEL}")));

    assert_eq!(chat.history().len(), 1);
    assert_eq!(chat.history()[0].role, Role::User);
    assert_eq!(chat.last_reply(), None);
}

#[tokio::test]
async fn feedback_without_reply_persists_nothing() {
    let tmp = TempDir::new().unwrap();
    let mut chat = session(&tmp, FakeBackend::default());

    let text = notice(chat.handle_line("/like great").await);
    assert_eq!(text, "no assistant reply to rate yet");
    let text = notice(chat.handle_line("/dislike").await);
    assert_eq!(text, "no assistant reply to rate yet");

    assert!(chat.memory().feedback.is_empty());
    assert!(!memory_path(&tmp).exists());
}

#[tokio::test]
async fn feedback_rates_latest_reply() {
    let tmp = TempDir::new().unwrap();
    let backend = FakeBackend::default().reply("one").reply("two");
    let mut chat = session(&tmp, backend);

    chat.handle_line("hi").await;
    assert_eq!(
        notice(chat.handle_line("/like nice and short").await),
        "saved: like feedback"
    );
    chat.handle_line("tell me more").await;
    assert_eq!(
        notice(chat.handle_line("/dislike").await),
        "saved: dislike feedback"
    );

    let feedback = &chat.memory().feedback;
    assert_eq!(feedback.len(), 2);
    assert_eq!(feedback[0].polarity, Polarity::Like);
    assert_eq!(feedback[0].reply, "one");
    assert_eq!(feedback[0].note.as_deref(), Some("nice and short"));
    assert_eq!(feedback[1].polarity, Polarity::Dislike);
    assert_eq!(feedback[1].reply, "two");
    assert_eq!(feedback[1].note.as_deref(), Some(DEFAULT_DISLIKE_NOTE));

    let on_disk: MemorySnapshot =
        serde_json::from_str(&std::fs::read_to_string(memory_path(&tmp)).unwrap()).unwrap();
    assert_eq!(on_disk.feedback.len(), 2);
}

#[tokio::test]
async fn dislike_notes_reach_the_next_preamble() {
    let tmp = TempDir::new().unwrap();
    let backend = FakeBackend::default();
    let mut chat = session(&tmp, backend.clone());

    chat.handle_line("hi").await;
    chat.handle_line("/dislike stop with the puns").await;
    chat.handle_line("hi again").await;

    let requests = backend.requests();
    let preamble = &requests[1].messages[0].content;
    assert!(preamble.contains("Recent dislike feedback from user: stop with the puns."));
}

#[tokio::test]
async fn reset_clears_history_and_leaves_memory_file_untouched() {
    let tmp = TempDir::new().unwrap();
    let options = SessionOptions {
        style_seed: StyleMode::Forced(Style::Concise),
        style_window: 3,
    };
    let mut chat = session_with(&tmp, FakeBackend::default(), options);

    chat.handle_line("my name is Mila").await;
    chat.handle_line("/style pro").await;
    chat.handle_line("I like clean UI").await;
    let before = std::fs::read(memory_path(&tmp)).unwrap();

    assert_eq!(notice(chat.handle_line("/reset").await), "history cleared");

    assert!(chat.history().is_empty());
    assert_eq!(chat.last_reply(), None);
    assert_eq!(chat.style_mode(), StyleMode::Forced(Style::Concise));
    assert_eq!(std::fs::read(memory_path(&tmp)).unwrap(), before);
    assert_eq!(chat.memory().facts["user_name"], "Mila");
}

#[tokio::test]
async fn reset_all_writes_canonical_empty_snapshot() {
    let tmp = TempDir::new().unwrap();
    let mut chat = session(&tmp, FakeBackend::default());

    chat.handle_line("my name is Mila").await;
    chat.handle_line("/like").await;
    assert_eq!(
        notice(chat.handle_line("/reset all").await),
        "all memory and current history cleared"
    );

    assert!(chat.history().is_empty());
    assert!(chat.memory().is_empty());
    let on_disk = std::fs::read_to_string(memory_path(&tmp)).unwrap();
    assert_eq!(
        on_disk,
        serde_json::to_string_pretty(&MemorySnapshot::default()).unwrap()
    );

    // Nothing left to rate after a full reset.
    assert_eq!(
        notice(chat.handle_line("/like").await),
        "no assistant reply to rate yet"
    );
}

#[tokio::test]
async fn forced_style_ignores_content() {
    let tmp = TempDir::new().unwrap();
    let backend = FakeBackend::default();
    let mut chat = session(&tmp, backend.clone());

    assert_eq!(
        notice(chat.handle_line("/style pro").await),
        "style set to: pro (history cleared)"
    );
    let outcome = chat.handle_line("hey buddy lol how are you this weekend").await;
    assert!(matches!(outcome, Outcome::Reply { style: Style::Pro, .. }));

    let request = &backend.requests()[0];
    assert_eq!(request.options, Style::Pro.options());
    assert!(request.messages[0].content.starts_with(Style::Pro.prompt()));
    assert!(!request.messages[0].content.contains("Auto mode is enabled"));
}

#[tokio::test]
async fn auto_style_follows_conversation() {
    let tmp = TempDir::new().unwrap();
    let backend = FakeBackend::default();
    let mut chat = session(&tmp, backend.clone());

    let outcome = chat
        .handle_line("my rust build fails with a weird error, can you help debug")
        .await;
    assert!(matches!(outcome, Outcome::Reply { style: Style::Pro, .. }));
    assert!(backend.requests()[0].messages[0]
        .content
        .contains("Auto mode is enabled"));

    chat.handle_line("/style auto").await;
    let outcome = chat.handle_line("tl;dr please, short answer").await;
    assert!(matches!(outcome, Outcome::Reply { style: Style::Concise, .. }));
}

#[tokio::test]
async fn style_command_reports_mode_and_rejects_unknown() {
    let tmp = TempDir::new().unwrap();
    let mut chat = session(&tmp, FakeBackend::default());

    let text = notice(chat.handle_line("/style").await);
    assert!(text.starts_with("current mode: auto"));

    let text = notice(chat.handle_line("/style shouty").await);
    assert!(text.starts_with("unknown style: shouty"));
    assert_eq!(chat.style_mode(), StyleMode::Auto);
}

#[tokio::test]
async fn forget_without_text_is_a_usage_error() {
    let tmp = TempDir::new().unwrap();
    let mut chat = session(&tmp, FakeBackend::default());

    chat.handle_line("I like tea").await;
    assert_eq!(
        notice(chat.handle_line("/forget").await),
        "usage: /forget <text>"
    );
    assert_eq!(chat.memory().likes, vec!["tea"]);
}

#[tokio::test]
async fn repeated_like_is_stored_once() {
    let tmp = TempDir::new().unwrap();
    let mut chat = session(&tmp, FakeBackend::default());

    for line in ["I like Green Tea", "i like green tea.", "  I LIKE green TEA!  "] {
        chat.handle_line(line).await;
    }
    assert_eq!(chat.memory().likes, vec!["green tea"]);
}
