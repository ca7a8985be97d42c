//! UI Bridge
//!
//! Named collaborator slots consumed, not owned, by the engine. Tab
//! ownership lives in the view layer; the engine only tells it when cached
//! diff content became invalid. Injected at construction — never wired
//! after the fact.

use crate::models::git::DiffMode;

/// Callbacks into the view layer for diff-tab coordination.
pub trait UiBridge {
    /// Close the diff tab for one path (its content vanished).
    fn close_diff_tab(&self, workspace: &str, path: &str);

    /// Close every open diff tab for a workspace (the ref changed).
    fn close_all_diff_tabs(&self, workspace: &str);

    /// Re-request the diff shown in the active tab (opposite side changed).
    fn refresh_active_diff(&self);

    /// Path shown in the active diff tab, if any.
    fn active_diff_path(&self) -> Option<String>;

    /// Mode of the active diff tab, if any.
    fn active_diff_mode(&self) -> Option<DiffMode>;
}

/// No-op bridge for headless embedding and tests that ignore the view layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullUiBridge;

impl UiBridge for NullUiBridge {
    fn close_diff_tab(&self, _workspace: &str, _path: &str) {}

    fn close_all_diff_tabs(&self, _workspace: &str) {}

    fn refresh_active_diff(&self) {}

    fn active_diff_path(&self) -> Option<String> {
        None
    }

    fn active_diff_mode(&self) -> Option<DiffMode> {
        None
    }
}
