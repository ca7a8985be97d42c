//! Git Sync Service
//!
//! Client-side synchronization and cache coordination: keyed cache stores
//! with stale-while-revalidate semantics, in-flight mutation tracking,
//! conflict-flow state tracking, and the engine that orchestrates all of it
//! against the remote core process.

pub mod cache;
pub mod client;
pub mod conflict;
pub mod engine;
pub mod inflight;
pub mod ui;

pub use cache::{CacheEntry, CacheStore, DiffKey, ShowKey, WorkspaceKey};
pub use client::{ChannelClient, RemoteOperationClient};
pub use conflict::{ConflictTrack, MergeFlowState, RebaseOntoState};
pub use engine::GitSyncEngine;
pub use inflight::{InFlightKey, InFlightTracker};
pub use ui::{NullUiBridge, UiBridge};
