//! Branch switch/create: single-slot dedup and the invalidation fan-out.

use gitdeck_sync::models::git::{DiffMode, GitOpKind, OpScope};
use gitdeck_sync::models::protocol::GitResponse;
use gitdeck_sync::services::sync::{DiffKey, WorkspaceKey};

use crate::support::{engine, ws, UiEvent};

fn branch_op_result(op: GitOpKind, ok: bool) -> GitResponse {
    GitResponse::GitOpResult {
        project: "P".into(),
        workspace: "W".into(),
        op,
        ok,
        message: if ok { None } else { Some("branch exists".into()) },
        path: None,
        scope: OpScope::All,
    }
}

#[test]
fn test_switch_dedups_until_result_arrives() {
    let mut eng = engine();
    eng.switch_branch(&ws(), "feature");
    eng.switch_branch(&ws(), "feature");
    assert_eq!(eng.client().count(), 1);
    assert_eq!(eng.pending_switch(&ws()), Some("feature"));

    eng.handle_result(branch_op_result(GitOpKind::SwitchBranch, true));
    assert!(eng.pending_switch(&ws()).is_none());

    // Slot is free again
    eng.switch_branch(&ws(), "main");
    assert_eq!(eng.pending_switch(&ws()), Some("main"));
}

#[test]
fn test_successful_switch_fans_out_invalidation() {
    let mut eng = engine();
    eng.fetch_branches(&ws());
    eng.handle_result(GitResponse::GitBranchesResult {
        project: "P".into(),
        workspace: "W".into(),
        current: "feature".into(),
        branches: vec![],
        error: None,
    });
    eng.fetch_diff(&DiffKey::new(ws(), "a.txt", DiffMode::Working));

    let branches_before = eng.client().branch_requests();
    let status_before = eng.client().status_requests();
    eng.switch_branch(&ws(), "main");
    eng.handle_result(branch_op_result(GitOpKind::SwitchBranch, true));

    // Forced branch + status refresh, all tabs closed, workspace diffs gone
    assert_eq!(eng.client().branch_requests(), branches_before + 1);
    assert_eq!(eng.client().status_requests(), status_before + 1);
    assert_eq!(eng.ui().events(), vec![UiEvent::CloseAll { workspace: "W".into() }]);
    assert!(eng.diff(&DiffKey::new(ws(), "a.txt", DiffMode::Working)).is_none());
    assert!(eng.branches(&ws()).unwrap().is_loading);
}

#[test]
fn test_switch_invalidation_is_scoped_to_the_workspace() {
    let mut eng = engine();
    let other = WorkspaceKey::new("P", "other");
    eng.fetch_diff(&DiffKey::new(ws(), "a.txt", DiffMode::Working));
    eng.fetch_diff(&DiffKey::new(other.clone(), "a.txt", DiffMode::Working));

    eng.switch_branch(&ws(), "main");
    eng.handle_result(branch_op_result(GitOpKind::SwitchBranch, true));

    assert!(eng.diff(&DiffKey::new(ws(), "a.txt", DiffMode::Working)).is_none());
    assert!(eng.diff(&DiffKey::new(other, "a.txt", DiffMode::Working)).is_some());
}

#[test]
fn test_failed_create_records_error_and_frees_slot() {
    let mut eng = engine();
    eng.create_branch(&ws(), "feature");
    assert_eq!(eng.pending_create(&ws()), Some("feature"));

    eng.handle_result(branch_op_result(GitOpKind::CreateBranch, false));

    assert!(eng.pending_create(&ws()).is_none());
    let entry = eng.branches(&ws()).unwrap();
    assert_eq!(entry.error.as_deref(), Some("branch exists"));
    // No fan-out on failure
    assert_eq!(eng.client().status_requests(), 0);
    assert!(eng.ui().events().is_empty());
}

#[test]
fn test_switch_and_create_slots_are_independent() {
    let mut eng = engine();
    eng.switch_branch(&ws(), "main");
    eng.create_branch(&ws(), "feature");
    assert_eq!(eng.client().count(), 2);
    assert_eq!(eng.pending_switch(&ws()), Some("main"));
    assert_eq!(eng.pending_create(&ws()), Some("feature"));
}
