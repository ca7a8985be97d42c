//! Wire Protocol
//!
//! Request/response sum types exchanged with the core process over the
//! message channel. Each request yields exactly one asynchronous response;
//! `StatusChanged` is the one unsolicited push (emitted by the core's file
//! watcher).
//!
//! Response kinds are resolved exactly once, in
//! `GitSyncEngine::handle_result`; nothing downstream inspects payloads
//! dynamically.

use serde::{Deserialize, Serialize};

use super::git::{
    BranchInfo, DiffMode, GitOpKind, IntegrationResultState, IntegrationState, LogEntry, OpScope,
    RebaseResultState, ShowFile, StatusItem, WorkspaceOpState,
};

fn default_log_limit() -> usize {
    50
}

/// Client → core messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GitRequest {
    GitStatus {
        project: String,
        workspace: String,
    },
    GitDiff {
        project: String,
        workspace: String,
        path: String,
        #[serde(default)]
        mode: DiffMode,
    },
    GitLog {
        project: String,
        workspace: String,
        #[serde(default = "default_log_limit")]
        limit: usize,
    },
    GitShow {
        project: String,
        workspace: String,
        sha: String,
    },
    GitBranches {
        project: String,
        workspace: String,
    },
    GitSwitchBranch {
        project: String,
        workspace: String,
        branch: String,
    },
    GitCreateBranch {
        project: String,
        workspace: String,
        branch: String,
    },
    GitStage {
        project: String,
        workspace: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        #[serde(default)]
        scope: OpScope,
    },
    GitUnstage {
        project: String,
        workspace: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        #[serde(default)]
        scope: OpScope,
    },
    GitDiscard {
        project: String,
        workspace: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        #[serde(default)]
        scope: OpScope,
        #[serde(default)]
        include_untracked: bool,
    },
    GitCommit {
        project: String,
        workspace: String,
        message: String,
    },
    GitFetch {
        project: String,
        workspace: String,
    },
    GitRebase {
        project: String,
        workspace: String,
        onto_branch: String,
    },
    GitRebaseContinue {
        project: String,
        workspace: String,
    },
    GitRebaseAbort {
        project: String,
        workspace: String,
    },
    GitOpStatus {
        project: String,
        workspace: String,
    },
    GitMergeToDefault {
        project: String,
        workspace: String,
        default_branch: String,
    },
    GitMergeContinue {
        project: String,
    },
    GitMergeAbort {
        project: String,
    },
    GitIntegrationStatus {
        project: String,
    },
    GitRebaseOntoDefault {
        project: String,
        workspace: String,
        default_branch: String,
    },
    GitRebaseOntoDefaultContinue {
        project: String,
    },
    GitRebaseOntoDefaultAbort {
        project: String,
    },
    GitResetIntegrationWorktree {
        project: String,
    },
    GitCheckBranchUpToDate {
        project: String,
        workspace: String,
    },
}

/// Core → client messages.
///
/// Read results carry an optional `error` field instead of a separate
/// keyless error frame so every result self-correlates to its cache key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GitResponse {
    GitStatusResult {
        project: String,
        workspace: String,
        #[serde(default)]
        repo_root: String,
        #[serde(default)]
        items: Vec<StatusItem>,
        #[serde(default)]
        is_git_repo: bool,
        #[serde(default)]
        has_staged_changes: bool,
        #[serde(default)]
        staged_count: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        current_branch: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        default_branch: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        ahead_by: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        behind_by: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        compared_branch: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    GitDiffResult {
        project: String,
        workspace: String,
        path: String,
        #[serde(default)]
        code: String,
        #[serde(default)]
        text: String,
        #[serde(default)]
        is_binary: bool,
        #[serde(default)]
        truncated: bool,
        #[serde(default)]
        mode: DiffMode,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    GitLogResult {
        project: String,
        workspace: String,
        #[serde(default)]
        entries: Vec<LogEntry>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    GitShowResult {
        project: String,
        workspace: String,
        sha: String,
        #[serde(default)]
        full_sha: String,
        #[serde(default)]
        message: String,
        #[serde(default)]
        author: String,
        #[serde(default)]
        author_email: String,
        #[serde(default)]
        date: String,
        #[serde(default)]
        files: Vec<ShowFile>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    GitBranchesResult {
        project: String,
        workspace: String,
        #[serde(default)]
        current: String,
        #[serde(default)]
        branches: Vec<BranchInfo>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    GitOpResult {
        project: String,
        workspace: String,
        op: GitOpKind,
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        #[serde(default)]
        scope: OpScope,
    },
    GitCommitResult {
        project: String,
        workspace: String,
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sha: Option<String>,
    },
    GitRebaseResult {
        project: String,
        workspace: String,
        ok: bool,
        state: RebaseResultState,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default)]
        conflicts: Vec<String>,
    },
    GitOpStatusResult {
        project: String,
        workspace: String,
        state: WorkspaceOpState,
        #[serde(default)]
        conflicts: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        head: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        onto: Option<String>,
    },
    GitMergeToDefaultResult {
        project: String,
        ok: bool,
        state: IntegrationResultState,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default)]
        conflicts: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        head_sha: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        integration_path: Option<String>,
    },
    GitIntegrationStatusResult {
        project: String,
        #[serde(default)]
        state: IntegrationState,
        #[serde(default)]
        conflicts: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        head: Option<String>,
        #[serde(default)]
        default_branch: String,
        #[serde(default)]
        path: String,
        #[serde(default)]
        is_clean: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        branch_ahead_by: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        branch_behind_by: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        compared_branch: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    GitRebaseOntoDefaultResult {
        project: String,
        ok: bool,
        state: IntegrationResultState,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default)]
        conflicts: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        head_sha: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        integration_path: Option<String>,
    },
    GitResetIntegrationWorktreeResult {
        project: String,
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    GitStatusChanged {
        project: String,
        workspace: String,
    },
}
