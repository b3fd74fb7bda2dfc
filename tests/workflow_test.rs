//! End-to-end workflow tests against real repositories.

mod common;

use common::{FakeChat, ScriptedTerminal, TestRepo};

use git_aicommit::commit::{Outcome, run_workflow};
use git_aicommit::error::{ProviderError, WorkflowError};
use git_aicommit::git::{ExcludePatterns, GitRepository, RepositorySnapshot};
use git_aicommit::llm::Provider;

fn provider_for(chat: &FakeChat) -> Provider {
    Provider::new("ollama", "llama3", Box::new(chat.clone()))
}

#[tokio::test]
async fn test_commit_key_creates_commit_with_generated_message() {
    let test_repo = TestRepo::new();
    test_repo.commit_file("README.md", "hello\n", "chore: initial commit");
    test_repo.write_and_stage("src/handler.rs", "fn handle() {}\n");

    let repo = GitRepository::discover(test_repo.path()).unwrap();
    let chat = FakeChat::new(["fix: handle nil pointer"]);
    let provider = provider_for(&chat);
    let terminal = ScriptedTerminal::new().keys("c");

    let outcome = run_workflow(
        &repo,
        &provider,
        &terminal,
        &ExcludePatterns::default_lockfiles(),
    )
    .await
    .unwrap();

    assert_eq!(outcome, Outcome::Committed);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(test_repo.commit_count(), 2);
    assert_eq!(test_repo.head_message().as_deref(), Some("fix: handle nil pointer"));
    assert_eq!(*terminal.committed.borrow(), 1);
}

#[tokio::test]
async fn test_nothing_staged_never_calls_model() {
    let test_repo = TestRepo::new();
    test_repo.commit_file("README.md", "hello\n", "chore: initial commit");

    let repo = GitRepository::discover(test_repo.path()).unwrap();
    let chat = FakeChat::new(["unused"]);
    let provider = provider_for(&chat);
    let terminal = ScriptedTerminal::new();

    let outcome = run_workflow(
        &repo,
        &provider,
        &terminal,
        &ExcludePatterns::default_lockfiles(),
    )
    .await
    .unwrap();

    assert_eq!(outcome, Outcome::NothingStaged);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(chat.request_count(), 0);
    assert_eq!(test_repo.commit_count(), 1);
}

#[tokio::test]
async fn test_lockfile_only_change_is_nothing_staged() {
    let test_repo = TestRepo::new();
    test_repo.write_and_stage("Cargo.lock", "# lock\n");

    let repo = GitRepository::discover(test_repo.path()).unwrap();
    let chat = FakeChat::new(["unused"]);
    let provider = provider_for(&chat);
    let terminal = ScriptedTerminal::new();

    let outcome = run_workflow(
        &repo,
        &provider,
        &terminal,
        &ExcludePatterns::default_lockfiles(),
    )
    .await
    .unwrap();

    assert_eq!(outcome, Outcome::NothingStaged);
    assert!(
        terminal
            .statuses
            .borrow()
            .iter()
            .any(|s| s.contains("--include-lockfiles"))
    );
}

#[tokio::test]
async fn test_lockfiles_hidden_from_diff() {
    let test_repo = TestRepo::new();
    test_repo.write_and_stage("a.lock", "locked\n");
    test_repo.write_and_stage("b.py", "print('hi')\n");

    let repo = GitRepository::discover(test_repo.path()).unwrap();
    let chat = FakeChat::new(["feat: greet"]);
    let provider = provider_for(&chat);
    let terminal = ScriptedTerminal::new().keys("q");

    let outcome = run_workflow(
        &repo,
        &provider,
        &terminal,
        &ExcludePatterns::default_lockfiles(),
    )
    .await
    .unwrap();
    assert_eq!(outcome, Outcome::Aborted);

    let requests = chat.requests();
    let context = &requests[0][1].content;
    assert!(context.contains("b.py"));
    assert!(!context.contains("a.lock"));
}

#[tokio::test]
async fn test_regenerate_then_commit_uses_latest_message() {
    let test_repo = TestRepo::new();
    test_repo.commit_file("lib.rs", "v1\n", "feat: first");
    test_repo.commit_file("lib.rs", "v2\n", "fix: second");
    test_repo.write_and_stage("lib.rs", "v3\n");

    let repo = GitRepository::discover(test_repo.path()).unwrap();
    let chat = FakeChat::new(["update lib", "refactor(lib): bump to v3"]);
    let provider = provider_for(&chat);
    let terminal = ScriptedTerminal::new()
        .keys("xr")
        .feedback("use conventional commits")
        .keys("c");

    let outcome = run_workflow(
        &repo,
        &provider,
        &terminal,
        &ExcludePatterns::default_lockfiles(),
    )
    .await
    .unwrap();

    assert_eq!(outcome, Outcome::Committed);
    assert_eq!(
        test_repo.head_message().as_deref(),
        Some("refactor(lib): bump to v3")
    );

    let requests = chat.requests();
    assert_eq!(requests.len(), 2);
    // Same snapshot both rounds; the second round carries the history.
    assert_eq!(requests[0][1], requests[1][1]);
    assert!(requests[0][1].content.contains("<commit>\nfeat: first\n</commit>"));
    assert_eq!(requests[1].len(), requests[0].len() + 2);
    assert_eq!(
        requests[1].last().unwrap().content,
        "<feedback>use conventional commits</feedback>"
    );
}

#[tokio::test]
async fn test_empty_feedback_aborts() {
    let test_repo = TestRepo::new();
    test_repo.write_and_stage("main.go", "package main\n");

    let repo = GitRepository::discover(test_repo.path()).unwrap();
    let chat = FakeChat::new(["feat: add main"]);
    let provider = provider_for(&chat);
    let terminal = ScriptedTerminal::new().keys("r").feedback("   ");

    let outcome = run_workflow(
        &repo,
        &provider,
        &terminal,
        &ExcludePatterns::default_lockfiles(),
    )
    .await
    .unwrap();

    assert_eq!(outcome, Outcome::Aborted);
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(chat.request_count(), 1);
    assert_eq!(test_repo.commit_count(), 0);
}

#[tokio::test]
async fn test_generation_failure_leaves_repository_untouched() {
    let test_repo = TestRepo::new();
    test_repo.write_and_stage("main.go", "package main\n");

    let repo = GitRepository::discover(test_repo.path()).unwrap();
    let chat = FakeChat::failing(ProviderError::Api {
        provider: "ollama",
        status: 500,
        body: "model crashed".to_string(),
    });
    let provider = provider_for(&chat);
    let terminal = ScriptedTerminal::new().keys("c");

    let err = run_workflow(
        &repo,
        &provider,
        &terminal,
        &ExcludePatterns::default_lockfiles(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, WorkflowError::Generation(_)));
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("model crashed"));
    assert_eq!(test_repo.commit_count(), 0);
    assert!(terminal.candidates.borrow().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_declined_retry_after_hook_failure() {
    use std::os::unix::fs::PermissionsExt;

    let test_repo = TestRepo::new();
    test_repo.write_and_stage("main.go", "package main\n");

    // A pre-commit hook that always rejects the commit.
    let hooks = test_repo.path().join(".git/hooks");
    std::fs::create_dir_all(&hooks).unwrap();
    let hook = hooks.join("pre-commit");
    std::fs::write(&hook, "#!/bin/sh\necho 'hook says no' >&2\nexit 1\n").unwrap();
    std::fs::set_permissions(&hook, std::fs::Permissions::from_mode(0o755)).unwrap();

    let repo = GitRepository::discover(test_repo.path()).unwrap();
    let chat = FakeChat::new(["feat: add main"]);
    let provider = provider_for(&chat);
    let terminal = ScriptedTerminal::new().keys("c").retry(true).retry(false);

    let err = run_workflow(
        &repo,
        &provider,
        &terminal,
        &ExcludePatterns::default_lockfiles(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, WorkflowError::Commit(_)));
    assert_eq!(err.exit_code(), 1);
    // One failure per attempt: the original plus one confirmed retry.
    assert_eq!(terminal.failures.borrow().len(), 2);
    assert!(terminal.failures.borrow()[0].contains("hook says no"));
    assert_eq!(test_repo.commit_count(), 0);
}

#[test]
fn test_staged_files_with_and_without_exclusion() {
    let test_repo = TestRepo::new();
    test_repo.write_and_stage("a.lock", "x\n");
    test_repo.write_and_stage("b.py", "y\n");

    let repo = GitRepository::discover(test_repo.path()).unwrap();

    assert_eq!(
        repo.staged_files(&ExcludePatterns::default_lockfiles()).unwrap(),
        vec!["b.py".to_string()]
    );
    assert_eq!(
        repo.staged_files(&ExcludePatterns::none()).unwrap(),
        vec!["a.lock".to_string(), "b.py".to_string()]
    );
}
