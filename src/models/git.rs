//! Git Data Types
//!
//! Cache payloads and the state enums shared with the wire protocol.
//! Field sets mirror what the core process reports so cached views stay
//! faithful to the remote state they shadow.

use serde::{Deserialize, Serialize};

/// Which side of a file the diff describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffMode {
    /// Working tree vs index
    #[default]
    Working,
    /// Index vs HEAD
    Staged,
}

impl DiffMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffMode::Working => "working",
            DiffMode::Staged => "staged",
        }
    }
}

/// Scope of a mutating file operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpScope {
    /// A single path
    #[default]
    File,
    /// The whole workspace
    All,
}

impl OpScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpScope::File => "file",
            OpScope::All => "all",
        }
    }
}

/// Mutating operation kinds, as reported back on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GitOpKind {
    Stage,
    Unstage,
    Discard,
    Commit,
    SwitchBranch,
    CreateBranch,
}

impl GitOpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GitOpKind::Stage => "stage",
            GitOpKind::Unstage => "unstage",
            GitOpKind::Discard => "discard",
            GitOpKind::Commit => "commit",
            GitOpKind::SwitchBranch => "switch_branch",
            GitOpKind::CreateBranch => "create_branch",
        }
    }
}

/// One changed path in a status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusItem {
    pub path: String,
    /// Two-character porcelain code ("M ", "??", ...)
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orig_path: Option<String>,
    #[serde(default)]
    pub staged: bool,
    /// None = binary or newly added file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additions: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletions: Option<i32>,
}

/// Full status view of one workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub repo_root: String,
    pub items: Vec<StatusItem>,
    pub is_git_repo: bool,
    pub has_staged_changes: bool,
    pub staged_count: usize,
    pub current_branch: Option<String>,
    pub default_branch: Option<String>,
    pub ahead_by: Option<i32>,
    pub behind_by: Option<i32>,
    pub compared_branch: Option<String>,
}

/// Derived per-path status, served from the memoized index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStatus {
    pub code: String,
    pub staged: bool,
}

/// Cached diff text for one (path, mode) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffPayload {
    pub text: String,
    pub is_binary: bool,
    pub truncated: bool,
    /// Porcelain change code of the file at fetch time
    pub code: String,
    pub mode: DiffMode,
}

/// One commit in the log view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub sha: String,
    pub message: String,
    pub author: String,
    pub date: String,
    #[serde(default)]
    pub refs: Vec<String>,
}

/// One file touched by a commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowFile {
    pub status: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
}

/// Full detail of a single commit (`git show`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitDetail {
    pub sha: String,
    pub full_sha: String,
    pub message: String,
    pub author: String,
    pub author_email: String,
    pub date: String,
    pub files: Vec<ShowFile>,
}

/// A local branch as listed by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInfo {
    pub name: String,
}

/// Branch list view of one workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchSnapshot {
    pub current: String,
    pub branches: Vec<BranchInfo>,
}

/// Workspace-level operation state, as probed from the core.
///
/// A conflicted rebase is reported as `Rebasing` with a non-empty conflict
/// list; callers must inspect both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceOpState {
    #[default]
    Normal,
    Rebasing,
    Merging,
}

impl WorkspaceOpState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceOpState::Normal => "normal",
            WorkspaceOpState::Rebasing => "rebasing",
            WorkspaceOpState::Merging => "merging",
        }
    }
}

/// Terminal state of a workspace rebase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebaseResultState {
    Completed,
    Conflict,
    Aborted,
    Failed,
}

/// Terminal state of a merge-to-default or rebase-onto-default attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationResultState {
    Idle,
    Completed,
    Conflict,
    Failed,
    Rebasing,
    RebaseConflict,
}

/// Current state of the project's integration worktree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationState {
    #[default]
    Idle,
    Conflict,
    Rebasing,
    RebaseConflict,
}

/// Integration status view of one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationSnapshot {
    pub state: IntegrationState,
    pub conflicts: Vec<String>,
    pub default_branch: String,
    pub path: String,
    pub is_clean: bool,
    pub branch_ahead_by: Option<i32>,
    pub branch_behind_by: Option<i32>,
    pub compared_branch: Option<String>,
}
