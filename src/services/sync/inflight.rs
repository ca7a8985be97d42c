//! In-Flight Tracker
//!
//! Per-workspace set of pending mutating operations. The tracker is agnostic
//! to outcome: keys are inserted on dispatch and removed when the result
//! arrives, success and failure alike. Dedup is cooperative — callers check
//! membership before dispatching; nothing here enforces it.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::git::{GitOpKind, OpScope};

use super::cache::WorkspaceKey;

/// Identity of one pending mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InFlightKey {
    pub op: GitOpKind,
    pub path: Option<String>,
    pub scope: OpScope,
}

impl InFlightKey {
    /// A single-path operation.
    pub fn file(op: GitOpKind, path: impl Into<String>) -> Self {
        Self {
            op,
            path: Some(path.into()),
            scope: OpScope::File,
        }
    }

    /// A whole-workspace operation.
    pub fn all(op: GitOpKind) -> Self {
        Self {
            op,
            path: None,
            scope: OpScope::All,
        }
    }
}

/// Tracks pending mutating operations per workspace.
#[derive(Debug, Default)]
pub struct InFlightTracker {
    pending: HashMap<WorkspaceKey, HashSet<InFlightKey>>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dispatched operation. Returns false if an identical key was
    /// already pending (idempotent set insert).
    pub fn insert(&mut self, workspace: WorkspaceKey, key: InFlightKey) -> bool {
        self.pending.entry(workspace).or_default().insert(key)
    }

    /// Clear a key when its result arrives, regardless of outcome. Returns
    /// whether the key was present.
    pub fn remove(&mut self, workspace: &WorkspaceKey, key: &InFlightKey) -> bool {
        let Some(set) = self.pending.get_mut(workspace) else {
            return false;
        };
        let removed = set.remove(key);
        if set.is_empty() {
            self.pending.remove(workspace);
        }
        removed
    }

    /// Whether an operation on this path (any scope) is pending.
    pub fn is_in_flight(&self, workspace: &WorkspaceKey, op: GitOpKind, path: Option<&str>) -> bool {
        self.pending
            .get(workspace)
            .map(|set| {
                set.iter()
                    .any(|k| k.op == op && k.path.as_deref() == path)
            })
            .unwrap_or(false)
    }

    /// Whether any mutating operation is pending for the workspace. Used by
    /// the UI to disable bulk actions.
    pub fn has_any(&self, workspace: &WorkspaceKey) -> bool {
        self.pending
            .get(workspace)
            .map(|set| !set.is_empty())
            .unwrap_or(false)
    }

    /// Number of pending operations for the workspace.
    pub fn count(&self, workspace: &WorkspaceKey) -> usize {
        self.pending.get(workspace).map(HashSet::len).unwrap_or(0)
    }
}
