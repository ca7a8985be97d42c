//! Conflict-Flow Tracking
//!
//! Shared track shape for the multi-step conflict flows: workspace rebase,
//! project merge-to-default, and project rebase-onto-default. Transitions
//! per attempt: idle → active → (conflict | completed) → idle; abort forces
//! back to idle; continue re-enters active.

use chrono::{DateTime, Utc};

/// Merge-to-default flow state (project-scoped).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeFlowState {
    #[default]
    Idle,
    Conflict,
}

/// Rebase-onto-default flow state (project-scoped). Unlike the workspace
/// rebase, in-progress and blocked-on-conflict are distinct states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RebaseOntoState {
    #[default]
    Idle,
    Rebasing,
    RebaseConflict,
}

/// One conflict flow's cached state.
#[derive(Debug, Clone)]
pub struct ConflictTrack<S> {
    pub state: S,
    pub conflicts: Vec<String>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl<S: Default> Default for ConflictTrack<S> {
    fn default() -> Self {
        Self {
            state: S::default(),
            conflicts: Vec::new(),
            is_loading: false,
            error: None,
            updated_at: Utc::now(),
        }
    }
}

impl<S> ConflictTrack<S> {
    /// Mark an attempt as dispatched. State and conflicts stay as they are
    /// until the result lands.
    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
        self.updated_at = Utc::now();
    }

    /// Apply a terminal result.
    pub fn settle(&mut self, state: S, conflicts: Vec<String>) {
        self.state = state;
        self.conflicts = conflicts;
        self.is_loading = false;
        self.error = None;
        self.updated_at = Utc::now();
    }

    /// Record a failed attempt without a state transition.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.error = Some(message.into());
        self.updated_at = Utc::now();
    }

    /// Whether the flow is blocked on unresolved conflicts. For the
    /// workspace rebase this is the only reliable blockage signal, since
    /// "rebasing" covers both in-progress and conflicted.
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}
