//! Periodic refresh of every domain.
//!
//! Runs fetch → decode → process → publish for each domain in a tokio task:
//! once immediately, then on every interval tick. The HTTP layer only ever
//! reads the [`ResultStore`].

use std::time::Duration;

use chrono::Utc;
use tokio::time;
use tracker_core::models::Domain;
use tracker_core::time_utils::TimezoneHandler;
use tracker_core::Result;
use tracker_data::analysis::{process, AnalysisContext};
use tracker_data::reader::decode_rows;
use tracker_data::results::DomainResult;

use crate::source::RowSource;
use crate::store::{ResultStore, StoreEntry};

/// Shortest accepted refresh interval.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

// ── RefreshOrchestrator ───────────────────────────────────────────────────────

/// Background refresh coordinator.
///
/// Call [`RefreshOrchestrator::start`] to spin up the refresh loop in a
/// dedicated tokio task.
pub struct RefreshOrchestrator {
    source: RowSource,
    store: ResultStore,
    timezone: TimezoneHandler,
    interval: Duration,
    domains: Vec<Domain>,
}

impl RefreshOrchestrator {
    /// Orchestrator refreshing every domain every `interval`.
    ///
    /// Intervals shorter than [`MIN_REFRESH_INTERVAL`] are raised to it.
    pub fn new(
        source: RowSource,
        store: ResultStore,
        timezone: TimezoneHandler,
        interval: Duration,
    ) -> Self {
        let interval = if interval < MIN_REFRESH_INTERVAL {
            tracing::warn!(
                ?interval,
                "refresh interval too short, using {:?}",
                MIN_REFRESH_INTERVAL
            );
            MIN_REFRESH_INTERVAL
        } else {
            interval
        };
        Self {
            source,
            store,
            timezone,
            interval,
            domains: Domain::ALL.to_vec(),
        }
    }

    /// Restrict the refresh to `domains`.
    pub fn with_domains(mut self, domains: Vec<Domain>) -> Self {
        self.domains = domains;
        self
    }

    /// Fetch and process a single domain.
    pub async fn refresh_one(&self, domain: Domain) -> Result<DomainResult> {
        let grid = self.source.fetch(domain).await?;
        let rows = decode_rows(&grid);
        let ctx = AnalysisContext::now_in(self.timezone);
        Ok(process(domain, rows, &ctx))
    }

    /// Refresh every domain once and record the update time.
    ///
    /// A domain that fails is published as `{data: null, error: true}`; the
    /// others are unaffected.
    pub async fn refresh_all(&self) {
        let mut failed = 0usize;

        for &domain in &self.domains {
            let entry = match self.refresh_one(domain).await {
                Ok(result) => StoreEntry::ok(result),
                Err(e) => {
                    tracing::warn!(%domain, error = %e, "refresh failed");
                    failed += 1;
                    StoreEntry::failed()
                }
            };
            self.store.publish(domain.key(), entry).await;
        }

        let now = Utc::now();
        self.store.mark_updated(now).await;
        tracing::info!(
            domains = self.domains.len(),
            failed,
            "Data updated at {}",
            now.to_rfc3339()
        );
    }

    /// Start the refresh loop.
    ///
    /// Refreshes immediately, then once per interval, until the returned
    /// [`RefreshHandle`] is aborted.
    pub fn start(self) -> RefreshHandle {
        let handle = tokio::spawn(async move {
            self.refresh_loop().await;
        });
        RefreshHandle { handle }
    }

    // ── Private implementation ────────────────────────────────────────────

    async fn refresh_loop(self) {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            // The first tick completes immediately.
            interval.tick().await;
            self.refresh_all().await;
        }
    }
}

// ── RefreshHandle ─────────────────────────────────────────────────────────────

/// A handle to the background refresh task.
pub struct RefreshHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl RefreshHandle {
    /// Immediately abort the refresh loop.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
