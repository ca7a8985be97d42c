//! Mutating operations: in-flight dedup, the forced status refresh, diff
//! invalidation, and the diff-tab interplay.

use gitdeck_sync::models::git::{DiffMode, GitOpKind, OpScope};
use gitdeck_sync::models::protocol::GitResponse;
use gitdeck_sync::services::sync::DiffKey;

use crate::support::{engine, modified_item, status_result, ws, UiEvent};

fn op_result(op: GitOpKind, ok: bool, path: Option<&str>, scope: OpScope) -> GitResponse {
    GitResponse::GitOpResult {
        project: "P".into(),
        workspace: "W".into(),
        op,
        ok,
        message: if ok { None } else { Some("simulated failure".into()) },
        path: path.map(str::to_string),
        scope,
    }
}

#[test]
fn test_stage_lifecycle_with_exactly_one_status_refresh() {
    let mut eng = engine();

    eng.stage(&ws(), Some("a.txt"), OpScope::File);
    assert!(eng.is_op_in_flight(&ws(), GitOpKind::Stage, Some("a.txt")));
    assert_eq!(eng.client().status_requests(), 0);

    eng.handle_result(op_result(GitOpKind::Stage, true, Some("a.txt"), OpScope::File));

    assert!(!eng.is_op_in_flight(&ws(), GitOpKind::Stage, Some("a.txt")));
    assert!(!eng.has_pending_ops(&ws()));
    assert_eq!(eng.client().status_requests(), 1);
}

#[test]
fn test_duplicate_op_is_not_redispatched() {
    let mut eng = engine();
    eng.stage(&ws(), Some("a.txt"), OpScope::File);
    eng.stage(&ws(), Some("a.txt"), OpScope::File);
    assert_eq!(eng.client().count(), 1);

    // A different op on the same path still goes through
    eng.unstage(&ws(), Some("a.txt"), OpScope::File);
    assert_eq!(eng.client().count(), 2);
}

#[test]
fn test_disconnected_mutations_are_silent_noops() {
    let mut eng = engine();
    eng.client().connected.set(false);

    eng.stage(&ws(), Some("a.txt"), OpScope::File);
    eng.unstage(&ws(), None, OpScope::All);
    eng.discard(&ws(), Some("a.txt"), OpScope::File, false);
    eng.switch_branch(&ws(), "other");
    eng.create_branch(&ws(), "new");

    assert_eq!(eng.client().count(), 0);
    assert!(!eng.has_pending_ops(&ws()));
    assert!(eng.pending_switch(&ws()).is_none());
}

#[test]
fn test_failed_op_clears_in_flight_and_records_error() {
    let mut eng = engine();
    eng.discard(&ws(), Some("a.txt"), OpScope::File, false);
    eng.handle_result(op_result(GitOpKind::Discard, false, Some("a.txt"), OpScope::File));

    assert!(!eng.has_pending_ops(&ws()));
    // No forced refresh on failure; the error lands on the status entry
    assert_eq!(eng.client().status_requests(), 0);
    let entry = eng.status(&ws()).unwrap();
    assert_eq!(entry.error.as_deref(), Some("simulated failure"));
}

#[test]
fn test_successful_op_invalidates_cached_diffs_for_path() {
    let mut eng = engine();
    let target = DiffKey::new(ws(), "a.txt", DiffMode::Working);
    let other = DiffKey::new(ws(), "b.txt", DiffMode::Working);
    eng.fetch_diff(&target);
    eng.fetch_diff(&other);

    eng.stage(&ws(), Some("a.txt"), OpScope::File);
    eng.handle_result(op_result(GitOpKind::Stage, true, Some("a.txt"), OpScope::File));

    assert!(eng.diff(&target).is_none());
    assert!(eng.diff(&other).is_some());
}

#[test]
fn test_all_scope_op_invalidates_every_workspace_diff() {
    let mut eng = engine();
    eng.fetch_diff(&DiffKey::new(ws(), "a.txt", DiffMode::Working));
    eng.fetch_diff(&DiffKey::new(ws(), "b.txt", DiffMode::Staged));

    eng.stage(&ws(), None, OpScope::All);
    eng.handle_result(op_result(GitOpKind::Stage, true, None, OpScope::All));

    assert!(eng.diff(&DiffKey::new(ws(), "a.txt", DiffMode::Working)).is_none());
    assert!(eng.diff(&DiffKey::new(ws(), "b.txt", DiffMode::Staged)).is_none());
}

#[test]
fn test_discard_of_active_path_closes_its_tab() {
    let mut eng = engine();
    eng.ui().set_active("a.txt", DiffMode::Working);

    eng.discard(&ws(), Some("a.txt"), OpScope::File, false);
    eng.handle_result(op_result(GitOpKind::Discard, true, Some("a.txt"), OpScope::File));

    assert_eq!(
        eng.ui().events(),
        vec![UiEvent::CloseTab {
            workspace: "W".into(),
            path: "a.txt".into()
        }]
    );
}

#[test]
fn test_discard_of_inactive_path_leaves_tabs_alone() {
    let mut eng = engine();
    eng.ui().set_active("other.txt", DiffMode::Working);

    eng.discard(&ws(), Some("a.txt"), OpScope::File, false);
    eng.handle_result(op_result(GitOpKind::Discard, true, Some("a.txt"), OpScope::File));

    assert!(eng.ui().events().is_empty());
}

#[test]
fn test_discard_all_closes_every_tab() {
    let mut eng = engine();
    eng.discard(&ws(), None, OpScope::All, true);
    eng.handle_result(op_result(GitOpKind::Discard, true, None, OpScope::All));

    assert_eq!(eng.ui().events(), vec![UiEvent::CloseAll { workspace: "W".into() }]);
}

#[test]
fn test_stage_of_active_path_refreshes_active_diff() {
    let mut eng = engine();
    eng.ui().set_active("a.txt", DiffMode::Staged);

    eng.stage(&ws(), Some("a.txt"), OpScope::File);
    eng.handle_result(op_result(GitOpKind::Stage, true, Some("a.txt"), OpScope::File));

    assert_eq!(eng.ui().events(), vec![UiEvent::RefreshActive]);
}

#[test]
fn test_op_scenario_interleaved_with_pending_status_fetch() {
    // Ordinary fetch in flight, then a mutation completes before the fetch
    // result arrives. Results apply in delivery order; the op's forced
    // refresh piggybacks on the already-loading entry.
    let mut eng = engine();
    eng.fetch_status(&ws());
    assert_eq!(eng.client().status_requests(), 1);

    eng.stage(&ws(), Some("a.txt"), OpScope::File);
    eng.handle_result(op_result(GitOpKind::Stage, true, Some("a.txt"), OpScope::File));
    assert_eq!(eng.client().status_requests(), 2);

    eng.handle_result(status_result(vec![modified_item("a.txt", true)]));
    let entry = eng.status(&ws()).unwrap();
    assert!(!entry.is_loading);
    assert!(entry.data.has_staged_changes);
    assert!(eng.path_status(&ws(), "a.txt").unwrap().staged);
}

#[test]
fn test_commit_refreshes_status_exactly_once() {
    let mut eng = engine();
    eng.set_commit_draft(&ws(), "feat: add thing");
    eng.commit(&ws(), "feat: add thing").unwrap();
    assert!(eng.is_op_in_flight(&ws(), GitOpKind::Commit, None));

    eng.handle_result(GitResponse::GitCommitResult {
        project: "P".into(),
        workspace: "W".into(),
        ok: true,
        message: None,
        sha: Some("abc1234".into()),
    });

    assert_eq!(eng.client().status_requests(), 1);
    assert_eq!(eng.commit_draft(&ws()), Some(""));
    assert!(eng.commit_error(&ws()).is_none());
}
