//! gitdeck-sync
//!
//! Client-side git synchronization and cache coordination. Sits between a
//! UI and a remote core process that owns the actual repositories: every
//! git view the UI renders (status, diffs, logs, branches, integration
//! state) is served from local caches here, refreshed fire-and-forget over
//! an async message channel.
//!
//! Entry point is [`services::sync::GitSyncEngine`], constructed once per
//! session with a [`services::sync::RemoteOperationClient`] transport and a
//! [`services::sync::UiBridge`] for diff-tab coordination.

pub mod models;
pub mod services;
pub mod utils;

pub use models::git::{DiffMode, GitOpKind, OpScope};
pub use models::protocol::{GitRequest, GitResponse};
pub use services::sync::{
    ChannelClient, DiffKey, GitSyncEngine, NullUiBridge, RemoteOperationClient, ShowKey, UiBridge,
    WorkspaceKey,
};
pub use utils::error::{AppError, AppResult};
