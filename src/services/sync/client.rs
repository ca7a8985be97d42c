//! Remote Operation Client
//!
//! The transport seam. Requests are fire-and-forget: the engine never blocks
//! on a send, and every answer arrives later as a [`GitResponse`] fed through
//! `GitSyncEngine::handle_result`. Connectivity is detected and surfaced by
//! the transport; this layer only reads the signal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::models::protocol::GitRequest;

/// Issues typed requests to the core process.
pub trait RemoteOperationClient {
    /// Enqueue a request. Never blocks; a dropped request simply never
    /// produces a result.
    fn send(&self, request: GitRequest);

    /// Current transport connectivity.
    fn is_connected(&self) -> bool;
}

/// Channel-backed client over the core-process message pipe.
///
/// The connectivity flag is shared with the transport task that owns the
/// actual socket; it flips the flag on connect/disconnect.
#[derive(Debug, Clone)]
pub struct ChannelClient {
    tx: mpsc::UnboundedSender<GitRequest>,
    connected: Arc<AtomicBool>,
}

impl ChannelClient {
    pub fn new(tx: mpsc::UnboundedSender<GitRequest>, connected: Arc<AtomicBool>) -> Self {
        Self { tx, connected }
    }

    /// Shared handle for the transport task to flip on (re)connect.
    pub fn connectivity(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.connected)
    }
}

impl RemoteOperationClient for ChannelClient {
    fn send(&self, request: GitRequest) {
        if let Err(e) = self.tx.send(request) {
            warn!("dropping git request, transport channel closed: {}", e);
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}
