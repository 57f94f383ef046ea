//! Shared, atomically published results.
//!
//! Writers replace a domain's whole [`StoreEntry`]; readers clone the `Arc`
//! and never observe a half-written result.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracker_data::results::DomainResult;

// ── StoreEntry ────────────────────────────────────────────────────────────────

/// What is served for one domain key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreEntry {
    pub data: Option<DomainResult>,
    pub error: bool,
}

impl StoreEntry {
    pub fn ok(data: DomainResult) -> Self {
        Self {
            data: Some(data),
            error: false,
        }
    }

    /// Entry published when a domain could not be fetched.
    pub fn failed() -> Self {
        Self {
            data: None,
            error: true,
        }
    }
}

// ── ResultStore ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct StoreState {
    entries: HashMap<String, Arc<StoreEntry>>,
    last_updated: Option<DateTime<Utc>>,
}

/// Map of domain key to its latest published entry.
///
/// Cloning is cheap; every clone shares the same state.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    state: Arc<RwLock<StoreState>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `key`.
    pub async fn publish(&self, key: &str, entry: StoreEntry) {
        let mut state = self.state.write().await;
        state.entries.insert(key.to_string(), Arc::new(entry));
    }

    pub async fn get(&self, key: &str) -> Option<Arc<StoreEntry>> {
        self.state.read().await.entries.get(key).cloned()
    }

    /// Every published entry, keyed by domain key.
    pub async fn snapshot(&self) -> HashMap<String, Arc<StoreEntry>> {
        self.state.read().await.entries.clone()
    }

    /// Record the completion time of a refresh.
    pub async fn mark_updated(&self, at: DateTime<Utc>) {
        self.state.write().await.last_updated = Some(at);
    }

    /// When the last refresh completed, if any has.
    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.last_updated
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
