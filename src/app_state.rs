// =============================================================================
// Central Application State — Aurum analytics service
// =============================================================================
//
// Ties the runtime configuration to the long-lived pieces the HTTP layer
// needs: the compiled risk-keyword scorer and the result caches.  The
// calculation modules themselves are stateless; everything mutable lives
// here.
//
// Thread safety:
//   - Atomic counter for lock-free request tracking.
//   - parking_lot::RwLock for the configuration.
//   - `TtlCache` manages its own interior mutability.
// =============================================================================

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::info;

use crate::cache::TtlCache;
use crate::correlation::CorrelationReport;
use crate::error::AnalyticsError;
use crate::risk_index::{RiskIndex, RiskScorer};
use crate::runtime_config::RuntimeConfig;

/// Shared state handed to every handler via `Arc<AppState>`.
pub struct AppState {
    // ── Counters ────────────────────────────────────────────────────────
    /// Requests served since start-up.
    pub request_count: AtomicU64,
    pub started_at: Instant,

    // ── Configuration ───────────────────────────────────────────────────
    pub runtime_config: Arc<RwLock<RuntimeConfig>>,

    // ── Analytics ───────────────────────────────────────────────────────
    pub risk_scorer: RiskScorer,

    /// Risk index keyed by the exact headline list.
    pub risk_cache: TtlCache<Vec<String>, RiskIndex>,

    /// Correlation reports keyed by the canonical request body.
    pub correlation_cache: TtlCache<String, CorrelationReport>,
}

impl AppState {
    /// Build the state from a loaded configuration.  Fails only if the risk
    /// keyword patterns cannot be compiled.
    pub fn new(config: RuntimeConfig) -> Result<Self, AnalyticsError> {
        let risk_scorer = RiskScorer::new(config.risk_hits_per_headline)?;
        let ttl = config.cache_ttl();
        let max_entries = config.cache_max_entries;

        info!(
            cache_ttl_secs = ttl.as_secs(),
            cache_max_entries = max_entries,
            hits_per_headline = config.risk_hits_per_headline,
            "application state initialised"
        );

        Ok(Self {
            request_count: AtomicU64::new(0),
            started_at: Instant::now(),
            runtime_config: Arc::new(RwLock::new(config)),
            risk_scorer,
            risk_cache: TtlCache::bounded(ttl, max_entries),
            correlation_cache: TtlCache::bounded(ttl, max_entries),
        })
    }

    /// Count a served request.  Returns the new total.
    pub fn record_request(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn requests_served(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Clone of the current configuration, taken without holding the lock.
    pub fn config(&self) -> RuntimeConfig {
        self.runtime_config.read().clone()
    }

    /// Write the current configuration to `path`.  The read lock is released
    /// before touching the disk.
    pub fn persist_config(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        self.config().save(path)
    }

    /// Drop expired entries from every cache.
    pub fn prune_caches(&self) {
        self.risk_cache.prune();
        self.correlation_cache.prune();
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;

    #[test]
    fn new_state_starts_empty() {
        let state = AppState::new(RuntimeConfig::default()).unwrap();
        assert_eq!(state.requests_served(), 0);
        assert!(state.risk_cache.is_empty());
        assert!(state.correlation_cache.is_empty());
        assert_eq!(state.risk_cache.ttl(), RuntimeConfig::default().cache_ttl());
    }

    #[test]
    fn request_counter_increments() {
        let state = AppState::new(RuntimeConfig::default()).unwrap();
        assert_eq!(state.record_request(), 1);
        assert_eq!(state.record_request(), 2);
        assert_eq!(state.requests_served(), 2);
    }

    #[test]
    fn scorer_uses_configured_divisor() {
        let config = RuntimeConfig {
            risk_hits_per_headline: 1.0,
            ..Default::default()
        };
        let state = AppState::new(config).unwrap();
        // One hit across one headline saturates at a divisor of one.
        let index = state.risk_scorer.score(&["War escalates"]);
        assert_eq!(index.score, 100);
    }

    #[test]
    fn caches_respect_configured_cap() {
        let config = RuntimeConfig {
            cache_max_entries: 2,
            ..Default::default()
        };
        let state = AppState::new(config).unwrap();
        for i in 0..5 {
            state
                .correlation_cache
                .insert(format!("req-{i}"), CorrelationReport::default());
        }
        assert_eq!(state.correlation_cache.len(), 2);
        assert_eq!(state.risk_cache.max_entries(), 2);
    }

    #[test]
    fn persist_config_writes_current_values() {
        let dir = std::env::temp_dir().join(format!("aurum-state-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("runtime_config.json");

        let state = AppState::new(RuntimeConfig::default()).unwrap();
        state.runtime_config.write().correlation_window = 45;
        state.persist_config(&path).unwrap();

        let loaded = RuntimeConfig::load(&path).unwrap();
        assert_eq!(loaded.correlation_window, 45);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn prune_drops_expired_entries() {
        let config = RuntimeConfig {
            cache_ttl_secs: 0,
            ..Default::default()
        };
        let state = AppState::new(config).unwrap();
        state
            .correlation_cache
            .insert("k".to_string(), CorrelationReport::default());
        assert_eq!(state.correlation_cache.len(), 1);
        state.prune_caches();
        assert!(state.correlation_cache.is_empty());
    }
}
