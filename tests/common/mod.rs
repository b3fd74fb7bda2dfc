//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use git2::{Oid, Repository, Signature};

use git_aicommit::error::{ProviderError, TerminalError};
use git_aicommit::llm::{ChatMessage, ChatModel};
use git_aicommit::terminal::{KeyInput, Terminal};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    ///
    /// The repository carries its own identity so `git commit` works without
    /// a global git config.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
            config.set_bool("commit.gpgsign", false).unwrap();
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write a file relative to the work tree, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&path, content).expect("Failed to write test file");
    }

    /// Add a path to the index.
    pub fn stage(&self, rel: &str) {
        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(rel)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Write and stage a file in one step.
    pub fn write_and_stage(&self, rel: &str, content: &str) {
        self.write(rel, content);
        self.stage(rel);
    }

    /// Commit the current index with the given message. Returns the commit OID.
    pub fn commit_index(&self, message: &str) -> Oid {
        let sig = self.signature();
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Stage a file and commit it with the given message.
    pub fn commit_file(&self, rel: &str, content: &str, message: &str) -> Oid {
        self.write_and_stage(rel, content);
        self.commit_index(message)
    }

    /// Message of the commit HEAD points to.
    pub fn head_message(&self) -> Option<String> {
        let head = self.repo.head().ok()?;
        let commit = head.peel_to_commit().ok()?;
        commit.message().map(|m| m.trim_end().to_string())
    }

    /// Number of commits reachable from HEAD.
    pub fn commit_count(&self) -> usize {
        let mut walk = self.repo.revwalk().expect("Failed to create revwalk");
        if walk.push_head().is_err() {
            return 0;
        }
        walk.count()
    }
}

/// A chat model that replays scripted replies and records every request.
///
/// Clones share state, so a test can keep one handle while the workflow owns
/// the other.
#[derive(Clone)]
pub struct FakeChat {
    replies: Arc<Mutex<VecDeque<Result<String, ProviderError>>>>,
    requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl FakeChat {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Arc::new(Mutex::new(
                replies.into_iter().map(|r| Ok(r.into())).collect(),
            )),
            requests: Arc::default(),
        }
    }

    pub fn failing(err: ProviderError) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from([Err(err)]))),
            requests: Arc::default(),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyResponse("fake")))
    }
}

/// A terminal driven by scripted input that records what was shown.
#[derive(Default)]
pub struct ScriptedTerminal {
    keys: RefCell<VecDeque<KeyInput>>,
    feedback: RefCell<VecDeque<String>>,
    retries: RefCell<VecDeque<bool>>,
    pub statuses: RefCell<Vec<String>>,
    pub candidates: RefCell<Vec<String>>,
    pub failures: RefCell<Vec<String>>,
    pub committed: RefCell<usize>,
}

impl ScriptedTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(self, keys: &str) -> Self {
        self.keys
            .borrow_mut()
            .extend(keys.chars().map(KeyInput::Char));
        self
    }

    pub fn key(self, key: KeyInput) -> Self {
        self.keys.borrow_mut().push_back(key);
        self
    }

    pub fn feedback(self, text: &str) -> Self {
        self.feedback.borrow_mut().push_back(text.to_string());
        self
    }

    pub fn retry(self, answer: bool) -> Self {
        self.retries.borrow_mut().push_back(answer);
        self
    }
}

impl Terminal for ScriptedTerminal {
    fn show_status(&self, status: &str) {
        self.statuses.borrow_mut().push(status.to_string());
    }

    fn show_candidate(&self, message: &str) {
        self.candidates.borrow_mut().push(message.to_string());
    }

    fn read_key(&self) -> Result<KeyInput, TerminalError> {
        // Running out of keys behaves like the user pressing Ctrl-C.
        Ok(self
            .keys
            .borrow_mut()
            .pop_front()
            .unwrap_or(KeyInput::Interrupt))
    }

    fn read_feedback(&self) -> Result<String, TerminalError> {
        Ok(self.feedback.borrow_mut().pop_front().unwrap_or_default())
    }

    fn show_commit_failure(&self, detail: &str) {
        self.failures.borrow_mut().push(detail.to_string());
    }

    fn confirm_retry(&self) -> Result<bool, TerminalError> {
        Ok(self.retries.borrow_mut().pop_front().unwrap_or(false))
    }

    fn show_committed(&self) {
        *self.committed.borrow_mut() += 1;
    }
}
