//! Git Sync Engine
//!
//! Orchestrates fetch-or-reuse decisions against the remote core process,
//! applies asynchronous results to the cache stores, derives secondary
//! indices, and drives the conflict-resolution flows.
//!
//! One engine instance exists per session, constructed at startup and torn
//! down at shutdown. All mutation goes through `&mut self` on the single
//! logical owner; results are interleaved, never concurrent, so there are
//! no locks. Every remote call is fire-and-forget — "waiting" is expressed
//! purely as cache state (`is_loading`), never as a blocking call.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::models::git::{
    BranchSnapshot, CommitDetail, DiffPayload, GitOpKind, IntegrationResultState,
    IntegrationSnapshot, IntegrationState, LogEntry, OpScope, PathStatus, RebaseResultState,
    StatusSnapshot, WorkspaceOpState,
};
use crate::models::protocol::{GitRequest, GitResponse};
use crate::utils::error::{AppError, AppResult};

use super::cache::{CacheEntry, CacheStore, DiffKey, ShowKey, WorkspaceKey};
use super::client::RemoteOperationClient;
use super::conflict::{ConflictTrack, MergeFlowState, RebaseOntoState};
use super::inflight::{InFlightKey, InFlightTracker};
use super::ui::UiBridge;

/// Error string stored by read fetches short-circuited on a dead transport.
pub const DISCONNECTED_ERROR: &str = "Disconnected";

/// Default commit count for log fetches.
pub const DEFAULT_LOG_LIMIT: usize = 50;

const STATUS_TTL_SECS: i64 = 5;
const DIFF_TTL_SECS: i64 = 30;
const LOG_TTL_SECS: i64 = 60;
const BRANCHES_TTL_SECS: i64 = 30;
const INTEGRATION_TTL_SECS: i64 = 10;

/// Per-workspace commit message tracking.
#[derive(Debug, Clone, Default)]
pub struct CommitTrack {
    /// Message drafted in the UI; cleared on a successful commit, kept on
    /// failure so nothing typed is lost.
    pub draft: String,
    pub error: Option<String>,
}

/// Project-scoped conflict flow plus the workspace that started the attempt,
/// so a successful terminal can refresh the right status cache.
#[derive(Debug, Clone)]
struct ProjectFlow<S> {
    track: ConflictTrack<S>,
    source: Option<WorkspaceKey>,
}

impl<S: Default> Default for ProjectFlow<S> {
    fn default() -> Self {
        Self {
            track: ConflictTrack::default(),
            source: None,
        }
    }
}

/// Client-side synchronization and cache-coordination engine.
pub struct GitSyncEngine<C: RemoteOperationClient, U: UiBridge> {
    client: C,
    ui: U,

    // Read-path stores
    status: CacheStore<WorkspaceKey, StatusSnapshot>,
    diffs: CacheStore<DiffKey, DiffPayload>,
    logs: CacheStore<WorkspaceKey, Vec<LogEntry>>,
    shows: CacheStore<ShowKey, Option<CommitDetail>>,
    branches: CacheStore<WorkspaceKey, BranchSnapshot>,
    integration: CacheStore<String, IntegrationSnapshot>,

    // Mutation bookkeeping
    in_flight: InFlightTracker,
    switch_slots: HashMap<WorkspaceKey, String>,
    create_slots: HashMap<WorkspaceKey, String>,
    commits: HashMap<WorkspaceKey, CommitTrack>,

    // Conflict flows
    rebase: HashMap<WorkspaceKey, ConflictTrack<WorkspaceOpState>>,
    merges: HashMap<String, ProjectFlow<MergeFlowState>>,
    rebase_onto: HashMap<String, ProjectFlow<RebaseOntoState>>,
    integration_paths: HashMap<String, String>,

    // Derived path → status index, memoized against the status entry's stamp
    status_index: HashMap<WorkspaceKey, (DateTime<Utc>, HashMap<String, PathStatus>)>,
}

impl<C: RemoteOperationClient, U: UiBridge> GitSyncEngine<C, U> {
    /// Create the per-session engine with its collaborators.
    pub fn new(client: C, ui: U) -> Self {
        Self {
            client,
            ui,
            status: CacheStore::new(Some(Duration::seconds(STATUS_TTL_SECS))),
            diffs: CacheStore::new(Some(Duration::seconds(DIFF_TTL_SECS))),
            logs: CacheStore::new(Some(Duration::seconds(LOG_TTL_SECS))),
            shows: CacheStore::new(None),
            branches: CacheStore::new(Some(Duration::seconds(BRANCHES_TTL_SECS))),
            integration: CacheStore::new(Some(Duration::seconds(INTEGRATION_TTL_SECS))),
            in_flight: InFlightTracker::new(),
            switch_slots: HashMap::new(),
            create_slots: HashMap::new(),
            commits: HashMap::new(),
            rebase: HashMap::new(),
            merges: HashMap::new(),
            rebase_onto: HashMap::new(),
            integration_paths: HashMap::new(),
            status_index: HashMap::new(),
        }
    }

    /// The underlying client (for transport queries not yet wrapped).
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The injected UI bridge.
    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// Current transport connectivity.
    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    // -----------------------------------------------------------------------
    // Read path
    // -----------------------------------------------------------------------

    /// Fetch-or-reuse the status view for a workspace. Never blocks: returns
    /// whatever is cached (possibly empty) and dispatches a background
    /// refresh when the entry is absent or stale.
    pub fn fetch_status(&mut self, key: &WorkspaceKey) -> Option<&CacheEntry<StatusSnapshot>> {
        if !self.client.is_connected() {
            self.status.set_error(key.clone(), DISCONNECTED_ERROR);
            return self.status.get(key);
        }
        if self.status.needs_fetch(key) {
            self.status.begin_load(key.clone());
            debug!(project = %key.project, workspace = %key.workspace, "dispatching status fetch");
            self.client.send(GitRequest::GitStatus {
                project: key.project.clone(),
                workspace: key.workspace.clone(),
            });
        }
        self.status.get(key)
    }

    /// Fetch-or-reuse one (path, mode) diff.
    pub fn fetch_diff(&mut self, key: &DiffKey) -> Option<&CacheEntry<DiffPayload>> {
        if !self.client.is_connected() {
            self.diffs.set_error(key.clone(), DISCONNECTED_ERROR);
            return self.diffs.get(key);
        }
        if self.diffs.needs_fetch(key) {
            self.diffs.begin_load(key.clone());
            debug!(
                workspace = %key.workspace.workspace,
                path = %key.path,
                mode = key.mode.as_str(),
                "dispatching diff fetch"
            );
            self.client.send(GitRequest::GitDiff {
                project: key.workspace.project.clone(),
                workspace: key.workspace.workspace.clone(),
                path: key.path.clone(),
                mode: key.mode,
            });
        }
        self.diffs.get(key)
    }

    /// Fetch-or-reuse the commit log for a workspace.
    pub fn fetch_log(&mut self, key: &WorkspaceKey, limit: usize) -> Option<&CacheEntry<Vec<LogEntry>>> {
        if !self.client.is_connected() {
            self.logs.set_error(key.clone(), DISCONNECTED_ERROR);
            return self.logs.get(key);
        }
        if self.logs.needs_fetch(key) {
            self.logs.begin_load(key.clone());
            self.client.send(GitRequest::GitLog {
                project: key.project.clone(),
                workspace: key.workspace.clone(),
                limit,
            });
        }
        self.logs.get(key)
    }

    /// Fetch-or-reuse one commit's detail. Commit content is immutable, so
    /// a (workspace, sha) pair is requested at most once per session unless
    /// the previous attempt errored.
    pub fn fetch_show(&mut self, key: &ShowKey) -> Option<&CacheEntry<Option<CommitDetail>>> {
        if let Some(entry) = self.shows.get(key) {
            if entry.data.is_some() || entry.is_loading {
                return self.shows.get(key);
            }
        }
        if !self.client.is_connected() {
            self.shows.set_error(key.clone(), DISCONNECTED_ERROR);
            return self.shows.get(key);
        }
        self.shows.begin_load(key.clone());
        self.client.send(GitRequest::GitShow {
            project: key.workspace.project.clone(),
            workspace: key.workspace.workspace.clone(),
            sha: key.sha.clone(),
        });
        self.shows.get(key)
    }

    /// Fetch-or-reuse the branch list for a workspace.
    pub fn fetch_branches(&mut self, key: &WorkspaceKey) -> Option<&CacheEntry<BranchSnapshot>> {
        if !self.client.is_connected() {
            self.branches.set_error(key.clone(), DISCONNECTED_ERROR);
            return self.branches.get(key);
        }
        if self.branches.needs_fetch(key) {
            self.branches.begin_load(key.clone());
            self.client.send(GitRequest::GitBranches {
                project: key.project.clone(),
                workspace: key.workspace.clone(),
            });
        }
        self.branches.get(key)
    }

    /// Fetch-or-reuse the project's integration worktree status.
    pub fn fetch_integration_status(&mut self, project: &str) -> Option<&CacheEntry<IntegrationSnapshot>> {
        if !self.client.is_connected() {
            self.integration.set_error(project.to_string(), DISCONNECTED_ERROR);
            return self.integration.get(&project.to_string());
        }
        let key = project.to_string();
        if self.integration.needs_fetch(&key) {
            self.integration.begin_load(key.clone());
            self.client.send(GitRequest::GitIntegrationStatus {
                project: key.clone(),
            });
        }
        self.integration.get(&key)
    }

    /// Cached-only accessors (no fetch side effects).
    pub fn status(&self, key: &WorkspaceKey) -> Option<&CacheEntry<StatusSnapshot>> {
        self.status.get(key)
    }

    pub fn diff(&self, key: &DiffKey) -> Option<&CacheEntry<DiffPayload>> {
        self.diffs.get(key)
    }

    pub fn log(&self, key: &WorkspaceKey) -> Option<&CacheEntry<Vec<LogEntry>>> {
        self.logs.get(key)
    }

    pub fn show(&self, key: &ShowKey) -> Option<&CacheEntry<Option<CommitDetail>>> {
        self.shows.get(key)
    }

    pub fn branches(&self, key: &WorkspaceKey) -> Option<&CacheEntry<BranchSnapshot>> {
        self.branches.get(key)
    }

    pub fn integration_status(&self, project: &str) -> Option<&CacheEntry<IntegrationSnapshot>> {
        self.integration.get(&project.to_string())
    }

    /// Derived per-path status lookup, rebuilt lazily whenever the status
    /// entry's stamp moves.
    pub fn path_status(&mut self, key: &WorkspaceKey, path: &str) -> Option<PathStatus> {
        let entry = self.status.get(key)?;
        let stamp = entry.updated_at;
        let stale = self
            .status_index
            .get(key)
            .map(|(s, _)| *s != stamp)
            .unwrap_or(true);
        if stale {
            let index: HashMap<String, PathStatus> = entry
                .data
                .items
                .iter()
                .map(|item| {
                    (
                        item.path.clone(),
                        PathStatus {
                            code: item.code.clone(),
                            staged: item.staged,
                        },
                    )
                })
                .collect();
            self.status_index.insert(key.clone(), (stamp, index));
        }
        self.status_index
            .get(key)
            .and_then(|(_, index)| index.get(path).cloned())
    }

    // -----------------------------------------------------------------------
    // Mutating path — stage / unstage / discard / commit
    // -----------------------------------------------------------------------

    /// Stage a path or the whole workspace.
    pub fn stage(&mut self, key: &WorkspaceKey, path: Option<&str>, scope: OpScope) {
        self.dispatch_file_op(GitOpKind::Stage, key, path, scope, false);
    }

    /// Unstage a path or the whole workspace.
    pub fn unstage(&mut self, key: &WorkspaceKey, path: Option<&str>, scope: OpScope) {
        self.dispatch_file_op(GitOpKind::Unstage, key, path, scope, false);
    }

    /// Discard working-tree changes. Destructive; the UI confirms first.
    pub fn discard(
        &mut self,
        key: &WorkspaceKey,
        path: Option<&str>,
        scope: OpScope,
        include_untracked: bool,
    ) {
        self.dispatch_file_op(GitOpKind::Discard, key, path, scope, include_untracked);
    }

    fn dispatch_file_op(
        &mut self,
        op: GitOpKind,
        key: &WorkspaceKey,
        path: Option<&str>,
        scope: OpScope,
        include_untracked: bool,
    ) {
        if !self.client.is_connected() {
            debug!(op = op.as_str(), "skipping mutating op: disconnected");
            return;
        }
        let fk = InFlightKey {
            op,
            path: path.map(str::to_string),
            scope,
        };
        if !self.in_flight.insert(key.clone(), fk) {
            debug!(op = op.as_str(), "identical op already in flight, not re-dispatching");
            return;
        }
        let (project, workspace) = (key.project.clone(), key.workspace.clone());
        let path = path.map(str::to_string);
        let request = match op {
            GitOpKind::Stage => GitRequest::GitStage {
                project,
                workspace,
                path,
                scope,
            },
            GitOpKind::Unstage => GitRequest::GitUnstage {
                project,
                workspace,
                path,
                scope,
            },
            GitOpKind::Discard => GitRequest::GitDiscard {
                project,
                workspace,
                path,
                scope,
                include_untracked,
            },
            other => {
                warn!(op = other.as_str(), "not a file op");
                return;
            }
        };
        self.client.send(request);
    }

    /// Commit staged changes. Requires a non-empty trimmed message; silently
    /// no-ops when disconnected (like every mutating op).
    pub fn commit(&mut self, key: &WorkspaceKey, message: &str) -> AppResult<()> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::validation("commit message is empty"));
        }
        if !self.client.is_connected() {
            debug!("skipping commit: disconnected");
            return Ok(());
        }
        if !self
            .in_flight
            .insert(key.clone(), InFlightKey::all(GitOpKind::Commit))
        {
            debug!("commit already in flight");
            return Ok(());
        }
        self.client.send(GitRequest::GitCommit {
            project: key.project.clone(),
            workspace: key.workspace.clone(),
            message: message.to_string(),
        });
        Ok(())
    }

    /// Commit draft tracking: the UI stores what's typed here so a failed
    /// commit never loses it.
    pub fn set_commit_draft(&mut self, key: &WorkspaceKey, draft: &str) {
        self.commits.entry(key.clone()).or_default().draft = draft.to_string();
    }

    pub fn commit_draft(&self, key: &WorkspaceKey) -> Option<&str> {
        self.commits.get(key).map(|t| t.draft.as_str())
    }

    pub fn commit_error(&self, key: &WorkspaceKey) -> Option<&str> {
        self.commits.get(key).and_then(|t| t.error.as_deref())
    }

    /// In-flight queries for the UI.
    pub fn is_op_in_flight(&self, key: &WorkspaceKey, op: GitOpKind, path: Option<&str>) -> bool {
        self.in_flight.is_in_flight(key, op, path)
    }

    pub fn has_pending_ops(&self, key: &WorkspaceKey) -> bool {
        self.in_flight.has_any(key)
    }

    // -----------------------------------------------------------------------
    // Branch operations
    // -----------------------------------------------------------------------

    /// Switch to a branch. At most one outstanding switch per workspace.
    pub fn switch_branch(&mut self, key: &WorkspaceKey, branch: &str) {
        if !self.client.is_connected() {
            debug!("skipping branch switch: disconnected");
            return;
        }
        if self.switch_slots.contains_key(key) {
            debug!(workspace = %key.workspace, "branch switch already in flight");
            return;
        }
        self.switch_slots.insert(key.clone(), branch.to_string());
        self.client.send(GitRequest::GitSwitchBranch {
            project: key.project.clone(),
            workspace: key.workspace.clone(),
            branch: branch.to_string(),
        });
    }

    /// Create and switch to a branch. At most one outstanding create per
    /// workspace, independent of the switch slot.
    pub fn create_branch(&mut self, key: &WorkspaceKey, branch: &str) {
        if !self.client.is_connected() {
            debug!("skipping branch create: disconnected");
            return;
        }
        if self.create_slots.contains_key(key) {
            debug!(workspace = %key.workspace, "branch create already in flight");
            return;
        }
        self.create_slots.insert(key.clone(), branch.to_string());
        self.client.send(GitRequest::GitCreateBranch {
            project: key.project.clone(),
            workspace: key.workspace.clone(),
            branch: branch.to_string(),
        });
    }

    /// Branch name currently being switched to, if any.
    pub fn pending_switch(&self, key: &WorkspaceKey) -> Option<&str> {
        self.switch_slots.get(key).map(String::as_str)
    }

    /// Branch name currently being created, if any.
    pub fn pending_create(&self, key: &WorkspaceKey) -> Option<&str> {
        self.create_slots.get(key).map(String::as_str)
    }

    // -----------------------------------------------------------------------
    // Workspace rebase flow
    // -----------------------------------------------------------------------

    /// Start a rebase onto a branch.
    pub fn rebase(&mut self, key: &WorkspaceKey, onto_branch: &str) {
        if !self.client.is_connected() {
            debug!("skipping rebase: disconnected");
            return;
        }
        self.rebase.entry(key.clone()).or_default().begin();
        self.client.send(GitRequest::GitRebase {
            project: key.project.clone(),
            workspace: key.workspace.clone(),
            onto_branch: onto_branch.to_string(),
        });
    }

    /// Continue a conflicted rebase after resolution.
    pub fn rebase_continue(&mut self, key: &WorkspaceKey) {
        if !self.client.is_connected() {
            return;
        }
        self.rebase.entry(key.clone()).or_default().begin();
        self.client.send(GitRequest::GitRebaseContinue {
            project: key.project.clone(),
            workspace: key.workspace.clone(),
        });
    }

    /// Abort a rebase in progress. This is a new request, not a cancellation
    /// of the prior one.
    pub fn rebase_abort(&mut self, key: &WorkspaceKey) {
        if !self.client.is_connected() {
            return;
        }
        self.rebase.entry(key.clone()).or_default().begin();
        self.client.send(GitRequest::GitRebaseAbort {
            project: key.project.clone(),
            workspace: key.workspace.clone(),
        });
    }

    /// Probe the core for the workspace's actual rebase/merge state.
    pub fn refresh_op_status(&mut self, key: &WorkspaceKey) {
        if !self.client.is_connected() {
            return;
        }
        self.client.send(GitRequest::GitOpStatus {
            project: key.project.clone(),
            workspace: key.workspace.clone(),
        });
    }

    /// Fetch from the remote; precursor to rebase/merge flows. No direct
    /// cache mutation.
    pub fn fetch_remote(&mut self, key: &WorkspaceKey) {
        if !self.client.is_connected() {
            return;
        }
        self.client.send(GitRequest::GitFetch {
            project: key.project.clone(),
            workspace: key.workspace.clone(),
        });
    }

    /// Ask the core to re-evaluate ahead/behind against the default branch.
    pub fn check_branch_up_to_date(&mut self, key: &WorkspaceKey) {
        if !self.client.is_connected() {
            return;
        }
        self.client.send(GitRequest::GitCheckBranchUpToDate {
            project: key.project.clone(),
            workspace: key.workspace.clone(),
        });
    }

    /// Rebase state for a workspace, if any attempt has been tracked.
    pub fn rebase_track(&self, key: &WorkspaceKey) -> Option<&ConflictTrack<WorkspaceOpState>> {
        self.rebase.get(key)
    }

    // -----------------------------------------------------------------------
    // Project integration flows
    // -----------------------------------------------------------------------

    /// Merge a workspace branch into the project's default branch via the
    /// shared integration worktree.
    pub fn merge_to_default(&mut self, key: &WorkspaceKey, default_branch: &str) {
        if !self.client.is_connected() {
            debug!("skipping merge-to-default: disconnected");
            return;
        }
        let flow = self.merges.entry(key.project.clone()).or_default();
        flow.source = Some(key.clone());
        flow.track.begin();
        self.client.send(GitRequest::GitMergeToDefault {
            project: key.project.clone(),
            workspace: key.workspace.clone(),
            default_branch: default_branch.to_string(),
        });
    }

    /// Continue a conflicted merge after resolution.
    pub fn merge_continue(&mut self, project: &str) {
        if !self.client.is_connected() {
            return;
        }
        self.merges.entry(project.to_string()).or_default().track.begin();
        self.client.send(GitRequest::GitMergeContinue {
            project: project.to_string(),
        });
    }

    /// Abort the merge in progress.
    pub fn merge_abort(&mut self, project: &str) {
        if !self.client.is_connected() {
            return;
        }
        self.merges.entry(project.to_string()).or_default().track.begin();
        self.client.send(GitRequest::GitMergeAbort {
            project: project.to_string(),
        });
    }

    /// Rebase a workspace branch onto the project's default branch.
    pub fn rebase_onto_default(&mut self, key: &WorkspaceKey, default_branch: &str) {
        if !self.client.is_connected() {
            debug!("skipping rebase-onto-default: disconnected");
            return;
        }
        let flow = self.rebase_onto.entry(key.project.clone()).or_default();
        flow.source = Some(key.clone());
        flow.track.begin();
        self.client.send(GitRequest::GitRebaseOntoDefault {
            project: key.project.clone(),
            workspace: key.workspace.clone(),
            default_branch: default_branch.to_string(),
        });
    }

    pub fn rebase_onto_default_continue(&mut self, project: &str) {
        if !self.client.is_connected() {
            return;
        }
        self.rebase_onto
            .entry(project.to_string())
            .or_default()
            .track
            .begin();
        self.client.send(GitRequest::GitRebaseOntoDefaultContinue {
            project: project.to_string(),
        });
    }

    pub fn rebase_onto_default_abort(&mut self, project: &str) {
        if !self.client.is_connected() {
            return;
        }
        self.rebase_onto
            .entry(project.to_string())
            .or_default()
            .track
            .begin();
        self.client.send(GitRequest::GitRebaseOntoDefaultAbort {
            project: project.to_string(),
        });
    }

    /// Escape hatch after user abandonment: recreate the integration
    /// worktree and force both project flows back to idle.
    pub fn reset_integration_worktree(&mut self, project: &str) {
        if !self.client.is_connected() {
            debug!("skipping integration reset: disconnected");
            return;
        }
        self.merges.entry(project.to_string()).or_default().track.begin();
        self.rebase_onto
            .entry(project.to_string())
            .or_default()
            .track
            .begin();
        self.client.send(GitRequest::GitResetIntegrationWorktree {
            project: project.to_string(),
        });
    }

    pub fn merge_track(&self, project: &str) -> Option<&ConflictTrack<MergeFlowState>> {
        self.merges.get(project).map(|f| &f.track)
    }

    pub fn rebase_onto_track(&self, project: &str) -> Option<&ConflictTrack<RebaseOntoState>> {
        self.rebase_onto.get(project).map(|f| &f.track)
    }

    /// Last known integration worktree path for a project.
    pub fn integration_path(&self, project: &str) -> Option<&str> {
        self.integration_paths.get(project).map(String::as_str)
    }

    // -----------------------------------------------------------------------
    // Result application
    // -----------------------------------------------------------------------

    /// Apply one asynchronous result. This is the only place response kinds
    /// are inspected; every match arm hands off to a typed applier.
    pub fn handle_result(&mut self, response: GitResponse) {
        match response {
            GitResponse::GitStatusResult {
                project,
                workspace,
                repo_root,
                items,
                is_git_repo,
                has_staged_changes,
                staged_count,
                current_branch,
                default_branch,
                ahead_by,
                behind_by,
                compared_branch,
                error,
            } => {
                let key = WorkspaceKey::new(project, workspace);
                match error {
                    Some(message) => self.status.set_error(key, message),
                    None => self.status.insert(
                        key,
                        StatusSnapshot {
                            repo_root,
                            items,
                            is_git_repo,
                            has_staged_changes,
                            staged_count,
                            current_branch,
                            default_branch,
                            ahead_by,
                            behind_by,
                            compared_branch,
                        },
                    ),
                }
            }
            GitResponse::GitDiffResult {
                project,
                workspace,
                path,
                code,
                text,
                is_binary,
                truncated,
                mode,
                error,
            } => {
                let key = DiffKey::new(WorkspaceKey::new(project, workspace), path, mode);
                match error {
                    Some(message) => self.diffs.set_error(key, message),
                    None => self.diffs.insert(
                        key,
                        DiffPayload {
                            text,
                            is_binary,
                            truncated,
                            code,
                            mode,
                        },
                    ),
                }
            }
            GitResponse::GitLogResult {
                project,
                workspace,
                entries,
                error,
            } => {
                let key = WorkspaceKey::new(project, workspace);
                match error {
                    Some(message) => self.logs.set_error(key, message),
                    None => self.logs.insert(key, entries),
                }
            }
            GitResponse::GitShowResult {
                project,
                workspace,
                sha,
                full_sha,
                message,
                author,
                author_email,
                date,
                files,
                error,
            } => {
                let key = ShowKey::new(WorkspaceKey::new(project, workspace), sha.clone());
                match error {
                    Some(msg) => self.shows.set_error(key, msg),
                    None => self.shows.insert(
                        key,
                        Some(CommitDetail {
                            sha,
                            full_sha,
                            message,
                            author,
                            author_email,
                            date,
                            files,
                        }),
                    ),
                }
            }
            GitResponse::GitBranchesResult {
                project,
                workspace,
                current,
                branches,
                error,
            } => {
                let key = WorkspaceKey::new(project, workspace);
                match error {
                    Some(message) => self.branches.set_error(key, message),
                    None => self.branches.insert(key, BranchSnapshot { current, branches }),
                }
            }
            GitResponse::GitOpResult {
                project,
                workspace,
                op,
                ok,
                message,
                path,
                scope,
            } => {
                let key = WorkspaceKey::new(project, workspace);
                self.apply_op_result(key, op, ok, message, path, scope);
            }
            GitResponse::GitCommitResult {
                project,
                workspace,
                ok,
                message,
                sha: _,
            } => {
                let key = WorkspaceKey::new(project, workspace);
                self.apply_commit_result(key, ok, message);
            }
            GitResponse::GitRebaseResult {
                project,
                workspace,
                ok: _,
                state,
                message,
                conflicts,
            } => {
                let key = WorkspaceKey::new(project, workspace);
                self.apply_rebase_result(key, state, message, conflicts);
            }
            GitResponse::GitOpStatusResult {
                project,
                workspace,
                state,
                conflicts,
                head: _,
                onto: _,
            } => {
                let key = WorkspaceKey::new(project, workspace);
                self.rebase.entry(key).or_default().settle(state, conflicts);
            }
            GitResponse::GitMergeToDefaultResult {
                project,
                ok: _,
                state,
                message,
                conflicts,
                head_sha: _,
                integration_path,
            } => {
                self.apply_merge_result(project, state, message, conflicts, integration_path);
            }
            GitResponse::GitIntegrationStatusResult {
                project,
                state,
                conflicts,
                head: _,
                default_branch,
                path,
                is_clean,
                branch_ahead_by,
                branch_behind_by,
                compared_branch,
                error,
            } => {
                self.apply_integration_status(
                    project,
                    state,
                    conflicts,
                    default_branch,
                    path,
                    is_clean,
                    branch_ahead_by,
                    branch_behind_by,
                    compared_branch,
                    error,
                );
            }
            GitResponse::GitRebaseOntoDefaultResult {
                project,
                ok: _,
                state,
                message,
                conflicts,
                head_sha: _,
                integration_path,
            } => {
                self.apply_rebase_onto_result(project, state, message, conflicts, integration_path);
            }
            GitResponse::GitResetIntegrationWorktreeResult {
                project,
                ok,
                message,
                path,
            } => {
                self.apply_reset_result(project, ok, message, path);
            }
            GitResponse::GitStatusChanged { project, workspace } => {
                // Core-side watcher noticed the tree moved under us
                let key = WorkspaceKey::new(project, workspace);
                self.refresh_status(&key);
            }
        }
    }

    fn apply_op_result(
        &mut self,
        key: WorkspaceKey,
        op: GitOpKind,
        ok: bool,
        message: Option<String>,
        path: Option<String>,
        scope: OpScope,
    ) {
        match op {
            GitOpKind::Stage | GitOpKind::Unstage | GitOpKind::Discard | GitOpKind::Commit => {
                let fk = InFlightKey {
                    op,
                    path: path.clone(),
                    scope,
                };
                if !self.in_flight.remove(&key, &fk) {
                    debug!(op = op.as_str(), "result for untracked op");
                }
                if ok {
                    self.apply_diff_interplay(&key, op, path.as_deref(), scope);
                    self.invalidate_diffs(&key, path.as_deref(), scope);
                    self.refresh_status(&key);
                } else {
                    let msg = message.unwrap_or_else(|| format!("{} failed", op.as_str()));
                    warn!(op = op.as_str(), workspace = %key.workspace, "{}", msg);
                    self.status.set_error(key, msg);
                }
            }
            GitOpKind::SwitchBranch | GitOpKind::CreateBranch => {
                if op == GitOpKind::SwitchBranch {
                    self.switch_slots.remove(&key);
                } else {
                    self.create_slots.remove(&key);
                }
                if ok {
                    // The ref moved: branch list, status, and every open
                    // diff for this workspace are invalid.
                    self.refresh_branches(&key);
                    self.refresh_status(&key);
                    self.ui.close_all_diff_tabs(&key.workspace);
                    let ws = key.clone();
                    self.diffs.remove_where(|k| k.workspace == ws);
                } else {
                    let msg = message.unwrap_or_else(|| format!("{} failed", op.as_str()));
                    self.branches.set_error(key, msg);
                }
            }
        }
    }

    fn apply_commit_result(&mut self, key: WorkspaceKey, ok: bool, message: Option<String>) {
        self.in_flight
            .remove(&key, &InFlightKey::all(GitOpKind::Commit));
        {
            let track = self.commits.entry(key.clone()).or_default();
            if ok {
                track.draft.clear();
                track.error = None;
            } else {
                track.error = Some(message.unwrap_or_else(|| "Commit failed".to_string()));
            }
        }
        if ok {
            self.refresh_status(&key);
        }
    }

    fn apply_rebase_result(
        &mut self,
        key: WorkspaceKey,
        state: RebaseResultState,
        message: Option<String>,
        conflicts: Vec<String>,
    ) {
        {
            let track = self.rebase.entry(key.clone()).or_default();
            match state {
                RebaseResultState::Completed | RebaseResultState::Aborted => {
                    track.settle(WorkspaceOpState::Normal, Vec::new());
                }
                RebaseResultState::Conflict => {
                    // Overloaded state: blocked-on-conflict is "rebasing"
                    // with a non-empty conflict list.
                    track.settle(WorkspaceOpState::Rebasing, conflicts);
                }
                RebaseResultState::Failed => {
                    track.fail(message.unwrap_or_else(|| "Rebase failed".to_string()));
                }
            }
        }
        if state != RebaseResultState::Failed {
            self.refresh_status(&key);
        }
    }

    fn apply_merge_result(
        &mut self,
        project: String,
        state: IntegrationResultState,
        message: Option<String>,
        conflicts: Vec<String>,
        integration_path: Option<String>,
    ) {
        if let Some(path) = integration_path {
            self.integration_paths.insert(project.clone(), path);
        }
        let mut refresh: Option<WorkspaceKey> = None;
        {
            let flow = self.merges.entry(project.clone()).or_default();
            match state {
                IntegrationResultState::Completed => {
                    refresh = flow.source.take();
                    flow.track.settle(MergeFlowState::Idle, Vec::new());
                }
                IntegrationResultState::Idle => {
                    flow.source = None;
                    flow.track.settle(MergeFlowState::Idle, Vec::new());
                }
                IntegrationResultState::Conflict => {
                    flow.track.settle(MergeFlowState::Conflict, conflicts);
                }
                IntegrationResultState::Failed => {
                    flow.track
                        .fail(message.unwrap_or_else(|| "Merge failed".to_string()));
                }
                IntegrationResultState::Rebasing | IntegrationResultState::RebaseConflict => {
                    warn!(project = %project, state = ?state, "unexpected state on merge result");
                }
            }
        }
        if let Some(ws) = refresh {
            self.refresh_status(&ws);
        }
    }

    fn apply_rebase_onto_result(
        &mut self,
        project: String,
        state: IntegrationResultState,
        message: Option<String>,
        conflicts: Vec<String>,
        integration_path: Option<String>,
    ) {
        if let Some(path) = integration_path {
            self.integration_paths.insert(project.clone(), path);
        }
        let mut refresh: Option<WorkspaceKey> = None;
        {
            let flow = self.rebase_onto.entry(project.clone()).or_default();
            match state {
                IntegrationResultState::Completed => {
                    refresh = flow.source.take();
                    flow.track.settle(RebaseOntoState::Idle, Vec::new());
                }
                IntegrationResultState::Idle => {
                    flow.source = None;
                    flow.track.settle(RebaseOntoState::Idle, Vec::new());
                }
                IntegrationResultState::Rebasing => {
                    flow.track.settle(RebaseOntoState::Rebasing, conflicts);
                }
                IntegrationResultState::RebaseConflict => {
                    flow.track.settle(RebaseOntoState::RebaseConflict, conflicts);
                }
                IntegrationResultState::Conflict => {
                    warn!(project = %project, "conflict state on rebase-onto result, treating as rebase conflict");
                    flow.track.settle(RebaseOntoState::RebaseConflict, conflicts);
                }
                IntegrationResultState::Failed => {
                    flow.track
                        .fail(message.unwrap_or_else(|| "Rebase onto default failed".to_string()));
                }
            }
        }
        if let Some(ws) = refresh {
            self.refresh_status(&ws);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_integration_status(
        &mut self,
        project: String,
        state: IntegrationState,
        conflicts: Vec<String>,
        default_branch: String,
        path: String,
        is_clean: bool,
        branch_ahead_by: Option<i32>,
        branch_behind_by: Option<i32>,
        compared_branch: Option<String>,
        error: Option<String>,
    ) {
        if let Some(message) = error {
            self.integration.set_error(project, message);
            return;
        }
        if !path.is_empty() {
            self.integration_paths.insert(project.clone(), path.clone());
        }
        self.integration.insert(
            project.clone(),
            IntegrationSnapshot {
                state,
                conflicts: conflicts.clone(),
                default_branch,
                path,
                is_clean,
                branch_ahead_by,
                branch_behind_by,
                compared_branch,
            },
        );
        self.align_flows(&project, state, conflicts);
    }

    /// Re-align the project flows to the state the core actually reports.
    /// A flow with an attempt in flight is left alone; its own result wins.
    fn align_flows(&mut self, project: &str, state: IntegrationState, conflicts: Vec<String>) {
        let merge = self.merges.entry(project.to_string()).or_default();
        if !merge.track.is_loading {
            match state {
                IntegrationState::Conflict => {
                    merge.track.settle(MergeFlowState::Conflict, conflicts.clone());
                }
                _ => merge.track.settle(MergeFlowState::Idle, Vec::new()),
            }
        }
        let onto = self.rebase_onto.entry(project.to_string()).or_default();
        if !onto.track.is_loading {
            match state {
                IntegrationState::Rebasing => {
                    onto.track.settle(RebaseOntoState::Rebasing, conflicts);
                }
                IntegrationState::RebaseConflict => {
                    onto.track.settle(RebaseOntoState::RebaseConflict, conflicts);
                }
                _ => onto.track.settle(RebaseOntoState::Idle, Vec::new()),
            }
        }
    }

    fn apply_reset_result(
        &mut self,
        project: String,
        ok: bool,
        message: Option<String>,
        path: Option<String>,
    ) {
        if let Some(p) = path {
            self.integration_paths.insert(project.clone(), p);
        }
        // Escape hatch: both flows go idle whatever the outcome
        let merge = self.merges.entry(project.clone()).or_default();
        merge.source = None;
        merge.track.settle(MergeFlowState::Idle, Vec::new());
        let onto = self.rebase_onto.entry(project.clone()).or_default();
        onto.source = None;
        onto.track.settle(RebaseOntoState::Idle, Vec::new());
        self.integration.remove(&project);
        if !ok {
            let msg = message.unwrap_or_else(|| "Integration worktree reset failed".to_string());
            warn!(project = %project, "{}", msg);
            if let Some(flow) = self.merges.get_mut(&project) {
                flow.track.error = Some(msg);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internal refresh helpers
    // -----------------------------------------------------------------------

    /// Forced status refresh: exactly one request per call, regardless of
    /// TTL. Used after every successful mutating operation.
    fn refresh_status(&mut self, key: &WorkspaceKey) {
        self.status.begin_load(key.clone());
        self.client.send(GitRequest::GitStatus {
            project: key.project.clone(),
            workspace: key.workspace.clone(),
        });
    }

    /// Forced branch-list refresh after a switch/create.
    fn refresh_branches(&mut self, key: &WorkspaceKey) {
        self.branches.begin_load(key.clone());
        self.client.send(GitRequest::GitBranches {
            project: key.project.clone(),
            workspace: key.workspace.clone(),
        });
    }

    /// Diff-tab coordination after a successful mutating op.
    fn apply_diff_interplay(
        &mut self,
        key: &WorkspaceKey,
        op: GitOpKind,
        path: Option<&str>,
        scope: OpScope,
    ) {
        match op {
            GitOpKind::Discard => match scope {
                OpScope::All => self.ui.close_all_diff_tabs(&key.workspace),
                OpScope::File => {
                    if let (Some(p), Some(active)) = (path, self.ui.active_diff_path()) {
                        if p == active {
                            self.ui.close_diff_tab(&key.workspace, p);
                        }
                    }
                }
            },
            GitOpKind::Stage | GitOpKind::Unstage => match scope {
                OpScope::All => {
                    if self.ui.active_diff_path().is_some() {
                        self.ui.refresh_active_diff();
                    }
                }
                OpScope::File => {
                    if let (Some(p), Some(active)) = (path, self.ui.active_diff_path()) {
                        if p == active {
                            self.ui.refresh_active_diff();
                        }
                    }
                }
            },
            _ => {}
        }
    }

    /// Drop cached diff text invalidated by a mutating op.
    fn invalidate_diffs(&mut self, key: &WorkspaceKey, path: Option<&str>, scope: OpScope) {
        let ws = key.clone();
        match (scope, path) {
            (OpScope::All, _) | (OpScope::File, None) => {
                self.diffs.remove_where(|k| k.workspace == ws);
            }
            (OpScope::File, Some(p)) => {
                let p = p.to_string();
                self.diffs.remove_where(|k| k.workspace == ws && k.path == p);
            }
        }
    }
}
