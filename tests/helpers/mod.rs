#![allow(dead_code)]

use memchat::backend::{BackendError, ChatBackend, ChatRequest};
use memchat::memory::MemoryStore;
use memchat::session::{Session, SessionOptions};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const TEST_MODEL: &str = "test-model";

/// Scripted backend: pops queued replies (default `"ok"`) and records every request.
#[derive(Clone, Default)]
pub struct FakeBackend {
    replies: Arc<Mutex<VecDeque<Result<String, BackendError>>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl FakeBackend {
    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, err: BackendError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ChatBackend for FakeBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<String, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok("ok".to_string()))
    }
}

/// Memory file location inside a temp dir.
pub fn memory_path(tmp: &TempDir) -> PathBuf {
    tmp.path().join(".chat_memory.json")
}

/// A session over `backend` whose memory lives in `tmp`.
pub fn session(tmp: &TempDir, backend: FakeBackend) -> Session<FakeBackend> {
    session_with(tmp, backend, SessionOptions::default())
}

pub fn session_with(
    tmp: &TempDir,
    backend: FakeBackend,
    options: SessionOptions,
) -> Session<FakeBackend> {
    let store = MemoryStore::load(memory_path(tmp));
    Session::new(backend, TEST_MODEL, store, options)
}

/// Unwrap a `Notice` outcome.
pub fn notice(outcome: memchat::session::Outcome) -> String {
    match outcome {
        memchat::session::Outcome::Notice(text) => text,
        other => panic!("expected a notice, got {other:?}"),
    }
}
