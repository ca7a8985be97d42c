//! Cache Store
//!
//! Keyed cache entries with stale-while-revalidate semantics. An expired,
//! non-loading entry keeps serving its data until a fresh result overwrites
//! it; expiry only decides whether a background fetch should be dispatched.
//!
//! Entries are created lazily on first fetch and never explicitly destroyed;
//! later fetches simply overwrite them.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Duration, Utc};

use crate::models::git::DiffMode;

/// Identifies one workspace inside one project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkspaceKey {
    pub project: String,
    pub workspace: String,
}

impl WorkspaceKey {
    pub fn new(project: impl Into<String>, workspace: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            workspace: workspace.into(),
        }
    }
}

/// Diff caches are keyed per (workspace, path, mode) so the working and
/// staged sides of a file never share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiffKey {
    pub workspace: WorkspaceKey,
    pub path: String,
    pub mode: DiffMode,
}

impl DiffKey {
    pub fn new(workspace: WorkspaceKey, path: impl Into<String>, mode: DiffMode) -> Self {
        Self {
            workspace,
            path: path.into(),
            mode,
        }
    }
}

/// Show caches are keyed per (workspace, sha); commit history is immutable,
/// so these entries never expire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShowKey {
    pub workspace: WorkspaceKey,
    pub sha: String,
}

impl ShowKey {
    pub fn new(workspace: WorkspaceKey, sha: impl Into<String>) -> Self {
        Self {
            workspace,
            sha: sha.into(),
        }
    }
}

/// One cached view of remote state.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub data: T,
    pub is_loading: bool,
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// A freshly applied result: data present, no error, not loading.
    pub fn fresh(data: T) -> Self {
        Self {
            data,
            is_loading: false,
            error: None,
            updated_at: Utc::now(),
        }
    }
}

impl<T: Default> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            data: T::default(),
            is_loading: false,
            error: None,
            updated_at: Utc::now(),
        }
    }
}

/// Keyed store of [`CacheEntry`] values with one shared TTL.
///
/// `ttl = None` means entries never expire (used for per-commit show data).
#[derive(Debug)]
pub struct CacheStore<K, T> {
    entries: HashMap<K, CacheEntry<T>>,
    ttl: Option<Duration>,
}

impl<K: Eq + Hash + Clone, T: Default> CacheStore<K, T> {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut CacheEntry<T>> {
        self.entries.get_mut(key)
    }

    /// Current data for a key, if any entry exists.
    pub fn data(&self, key: &K) -> Option<&T> {
        self.entries.get(key).map(|e| &e.data)
    }

    /// Whether the entry's freshness window has passed. Absent entries count
    /// as expired.
    pub fn is_expired(&self, key: &K) -> bool {
        match (self.entries.get(key), self.ttl) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(entry), Some(ttl)) => Utc::now() - entry.updated_at > ttl,
        }
    }

    /// Fetch-if-needed decision: absent, or (stale and not already loading).
    /// An errored entry is always fetchable again so caller-initiated retries
    /// go through.
    pub fn needs_fetch(&self, key: &K) -> bool {
        match self.entries.get(key) {
            None => true,
            Some(entry) if entry.is_loading => false,
            Some(entry) => entry.error.is_some() || self.is_expired(key),
        }
    }

    /// Mark an entry as loading, creating an empty one if absent. Existing
    /// data keeps serving while the refresh is in flight.
    pub fn begin_load(&mut self, key: K) {
        let entry = self.entries.entry(key).or_default();
        entry.is_loading = true;
    }

    /// Apply a fresh result: replaces the entry wholesale.
    pub fn insert(&mut self, key: K, data: T) {
        self.entries.insert(key, CacheEntry::fresh(data));
    }

    /// Record a failure on the entry without discarding its data.
    pub fn set_error(&mut self, key: K, error: impl Into<String>) {
        let entry = self.entries.entry(key).or_default();
        entry.is_loading = false;
        entry.error = Some(error.into());
        entry.updated_at = Utc::now();
    }

    pub fn remove(&mut self, key: &K) -> Option<CacheEntry<T>> {
        self.entries.remove(key)
    }

    /// Drop every entry whose key matches the predicate.
    pub fn remove_where(&mut self, pred: impl Fn(&K) -> bool) {
        self.entries.retain(|k, _| !pred(k));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
