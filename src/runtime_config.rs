// =============================================================================
// Runtime Configuration — Analytics tunables with atomic save
// =============================================================================
//
// Every heuristic constant the analytics core exposes as a parameter lives
// here: the COT crowding threshold, the risk-index divisor, detector
// lookbacks and the scenario elasticity table.  The source values are the
// defaults; desks can override any of them from `runtime_config.json`.
//
// All fields carry `#[serde(default)]` so an older or partial config file
// always loads.  Saving uses an atomic tmp + rename.
//
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::DEFAULT_MAX_ENTRIES;
use crate::correlation::DEFAULT_CORRELATION_WINDOW;
use crate::cot::DEFAULT_OVERCROWDED_THRESHOLD;
use crate::risk_index::DEFAULT_HITS_PER_HEADLINE;
use crate::scenario::{ElasticityTable, DEFAULT_CURRENT_PRICE};
use crate::technical::smc::{SmcParams, DEFAULT_MIN_GAP_RATIO, DEFAULT_MIN_MOVE_PCT, DEFAULT_SMC_LOOKBACK};
use crate::technical::DEFAULT_ZONE_LOOKBACK;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_overcrowded_threshold() -> f64 {
    DEFAULT_OVERCROWDED_THRESHOLD
}

fn default_hits_per_headline() -> f64 {
    DEFAULT_HITS_PER_HEADLINE
}

fn default_gold_price() -> f64 {
    DEFAULT_CURRENT_PRICE
}

fn default_zone_lookback() -> usize {
    DEFAULT_ZONE_LOOKBACK
}

fn default_smc_lookback() -> usize {
    DEFAULT_SMC_LOOKBACK
}

fn default_min_move_pct() -> f64 {
    DEFAULT_MIN_MOVE_PCT
}

fn default_min_gap_ratio() -> f64 {
    DEFAULT_MIN_GAP_RATIO
}

fn default_correlation_window() -> usize {
    DEFAULT_CORRELATION_WINDOW
}

// =============================================================================
// TechnicalParams
// =============================================================================

/// Lookbacks and thresholds for the zone / SMC detectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalParams {
    /// Trailing candles scanned for swing highs / lows.
    #[serde(default = "default_zone_lookback")]
    pub zone_lookback: usize,

    /// Trailing candles scanned for order blocks and gaps.
    #[serde(default = "default_smc_lookback")]
    pub smc_lookback: usize,

    /// Minimum displacement confirming an order block, in percent.
    #[serde(default = "default_min_move_pct")]
    pub order_block_min_move_pct: f64,

    /// Minimum gap size as a fraction of the average candle range.
    #[serde(default = "default_min_gap_ratio")]
    pub fvg_min_gap_ratio: f64,
}

impl Default for TechnicalParams {
    fn default() -> Self {
        Self {
            zone_lookback: default_zone_lookback(),
            smc_lookback: default_smc_lookback(),
            order_block_min_move_pct: default_min_move_pct(),
            fvg_min_gap_ratio: default_min_gap_ratio(),
        }
    }
}

impl TechnicalParams {
    pub fn smc(&self) -> SmcParams {
        SmcParams {
            lookback: self.smc_lookback,
            min_move_pct: self.order_block_min_move_pct,
            min_gap_ratio: self.fvg_min_gap_ratio,
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the analytics service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Service -------------------------------------------------------------

    /// Address the HTTP API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Lifetime of cached risk-index and correlation results, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Entries each result cache holds before evicting the oldest.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    // --- Positioning & sentiment --------------------------------------------

    /// Fraction of the historic long high at which COT positioning is
    /// overcrowded.
    #[serde(default = "default_overcrowded_threshold")]
    pub cot_overcrowded_threshold: f64,

    /// Keyword hits per headline that saturate the risk index.
    #[serde(default = "default_hits_per_headline")]
    pub risk_hits_per_headline: f64,

    // --- Scenario ------------------------------------------------------------

    /// Spot price assumed when a scenario request omits one.
    #[serde(default = "default_gold_price")]
    pub default_gold_price: f64,

    /// Dollar elasticities of gold to each macro factor.
    #[serde(default)]
    pub elasticities: ElasticityTable,

    // --- Technical / correlation ---------------------------------------------

    #[serde(default)]
    pub technical: TechnicalParams,

    /// Trailing closes used for cross-asset correlation.
    #[serde(default = "default_correlation_window")]
    pub correlation_window: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_max_entries: default_cache_max_entries(),
            cot_overcrowded_threshold: default_overcrowded_threshold(),
            risk_hits_per_headline: default_hits_per_headline(),
            default_gold_price: default_gold_price(),
            elasticities: ElasticityTable::default(),
            technical: TechnicalParams::default(),
            correlation_window: default_correlation_window(),
        }
    }
}

impl RuntimeConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults
    /// with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            cot_threshold = config.cot_overcrowded_threshold,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` (write `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}
