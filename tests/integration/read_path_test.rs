//! Read-path behavior: disconnected short-circuits, stale-while-revalidate,
//! and the derived path index.

use gitdeck_sync::models::git::DiffMode;
use gitdeck_sync::models::protocol::{GitRequest, GitResponse};
use gitdeck_sync::services::sync::{DiffKey, ShowKey};
use gitdeck_sync::services::sync::engine::{DEFAULT_LOG_LIMIT, DISCONNECTED_ERROR};

use crate::support::{engine, modified_item, status_error, status_result, ws};

#[test]
fn test_disconnect_then_reconnect_status_lifecycle() {
    let mut eng = engine();

    // Disconnected: error recorded, nothing dispatched, not loading
    eng.client().connected.set(false);
    let entry = eng.fetch_status(&ws()).unwrap().clone();
    assert_eq!(entry.error.as_deref(), Some(DISCONNECTED_ERROR));
    assert!(!entry.is_loading);
    assert_eq!(eng.client().count(), 0);

    // Reconnected: errored entry is refetchable
    eng.client().connected.set(true);
    let entry = eng.fetch_status(&ws()).unwrap().clone();
    assert!(entry.is_loading);
    assert_eq!(eng.client().status_requests(), 1);

    // Result lands: loading clears, data applied, index serves lookups
    eng.handle_result(status_result(vec![modified_item("a.txt", false)]));
    let entry = eng.status(&ws()).unwrap();
    assert!(!entry.is_loading);
    assert!(entry.error.is_none());
    assert!(entry.data.is_git_repo);
    assert!(!entry.data.has_staged_changes);
    assert_eq!(entry.data.items.len(), 1);

    let ps = eng.path_status(&ws(), "a.txt").unwrap();
    assert_eq!(ps.code, "M");
    assert!(!ps.staged);
}

#[test]
fn test_error_result_keeps_stale_data_and_reopens_fetch() {
    let mut eng = engine();
    eng.fetch_status(&ws());
    eng.handle_result(status_result(vec![modified_item("a.txt", false)]));

    eng.fetch_status(&ws());
    eng.handle_result(status_error("index.lock held"));

    let entry = eng.status(&ws()).unwrap();
    assert_eq!(entry.error.as_deref(), Some("index.lock held"));
    // Stale data still served alongside the error
    assert_eq!(entry.data.items.len(), 1);

    // Errored entries are always fetchable again
    let before = eng.client().status_requests();
    eng.fetch_status(&ws());
    assert_eq!(eng.client().status_requests(), before + 1);
}

#[test]
fn test_loading_entry_suppresses_duplicate_dispatch() {
    let mut eng = engine();
    eng.fetch_status(&ws());
    eng.fetch_status(&ws());
    eng.fetch_status(&ws());
    assert_eq!(eng.client().status_requests(), 1);
}

#[test]
fn test_log_fetch_uses_default_limit() {
    let mut eng = engine();
    eng.fetch_log(&ws(), DEFAULT_LOG_LIMIT);
    let sent = eng.client().sent.borrow().clone();
    match &sent[0] {
        GitRequest::GitLog { limit, .. } => assert_eq!(*limit, 50),
        other => panic!("unexpected request: {:?}", other),
    }
}

#[test]
fn test_diff_working_and_staged_are_separate_entries() {
    let mut eng = engine();
    let working = DiffKey::new(ws(), "a.txt", DiffMode::Working);
    let staged = DiffKey::new(ws(), "a.txt", DiffMode::Staged);
    eng.fetch_diff(&working);
    eng.fetch_diff(&staged);
    assert_eq!(eng.client().count(), 2);

    eng.handle_result(GitResponse::GitDiffResult {
        project: "P".into(),
        workspace: "W".into(),
        path: "a.txt".into(),
        code: "M".into(),
        text: "@@ staged hunk".into(),
        is_binary: false,
        truncated: false,
        mode: DiffMode::Staged,
        error: None,
    });

    assert_eq!(eng.diff(&staged).unwrap().data.text, "@@ staged hunk");
    assert!(!eng.diff(&staged).unwrap().is_loading);
    // The working-side entry is untouched and still waiting
    assert!(eng.diff(&working).unwrap().is_loading);
    assert!(eng.diff(&working).unwrap().data.text.is_empty());
}

#[test]
fn test_show_is_fetched_once_per_sha() {
    let mut eng = engine();
    let key = ShowKey::new(ws(), "abc1234");
    eng.fetch_show(&key);
    eng.handle_result(GitResponse::GitShowResult {
        project: "P".into(),
        workspace: "W".into(),
        sha: "abc1234".into(),
        full_sha: "abc1234ffffffff".into(),
        message: "add parser".into(),
        author: "Alice".into(),
        author_email: "alice@example.com".into(),
        date: "2026-03-01".into(),
        files: vec![],
        error: None,
    });

    eng.fetch_show(&key);
    eng.fetch_show(&key);
    assert_eq!(eng.client().count(), 1);

    // A different sha is its own entry
    eng.fetch_show(&ShowKey::new(ws(), "def5678"));
    assert_eq!(eng.client().count(), 2);
}

#[test]
fn test_status_changed_push_forces_refresh() {
    let mut eng = engine();
    eng.handle_result(status_result(vec![]));
    assert_eq!(eng.client().status_requests(), 0);

    eng.handle_result(GitResponse::GitStatusChanged {
        project: "P".into(),
        workspace: "W".into(),
    });
    assert_eq!(eng.client().status_requests(), 1);
    assert!(eng.status(&ws()).unwrap().is_loading);
}

#[test]
fn test_disconnected_reads_cover_every_store() {
    let mut eng = engine();
    eng.client().connected.set(false);

    eng.fetch_diff(&DiffKey::new(ws(), "a.txt", DiffMode::Working));
    eng.fetch_log(&ws(), DEFAULT_LOG_LIMIT);
    eng.fetch_show(&ShowKey::new(ws(), "abc"));
    eng.fetch_branches(&ws());
    eng.fetch_integration_status("P");

    assert_eq!(eng.client().count(), 0);
    let diff = eng.diff(&DiffKey::new(ws(), "a.txt", DiffMode::Working)).unwrap();
    assert_eq!(diff.error.as_deref(), Some(DISCONNECTED_ERROR));
    let log = eng.log(&ws()).unwrap();
    assert_eq!(log.error.as_deref(), Some(DISCONNECTED_ERROR));
    let show = eng.show(&ShowKey::new(ws(), "abc")).unwrap();
    assert_eq!(show.error.as_deref(), Some(DISCONNECTED_ERROR));
    let branches = eng.branches(&ws()).unwrap();
    assert_eq!(branches.error.as_deref(), Some(DISCONNECTED_ERROR));
    let integ = eng.integration_status("P").unwrap();
    assert_eq!(integ.error.as_deref(), Some(DISCONNECTED_ERROR));
}
