// =============================================================================
// Cross-Asset Correlation — Pearson r against gold
// =============================================================================
//
//   r = (nΣxy - ΣxΣy) / sqrt((nΣx² - (Σx)²)(nΣy² - (Σy)²))
//
// A series with no variance has no defined correlation; it reports 0.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CORRELATION_WINDOW: usize = 30;

const STRONG_CORRELATION: f64 = 0.7;
const MODERATE_CORRELATION: f64 = 0.4;

/// Pearson correlation of two equal-length series.  Mismatched lengths,
/// fewer than two points, or zero variance all yield 0.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 || n != y.len() {
        return 0.0;
    }

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2, mut sum_y2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        sum_x += a;
        sum_y += b;
        sum_xy += a * b;
        sum_x2 += a * a;
        sum_y2 += b * b;
    }

    let n = n as f64;
    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    (numerator / denominator).clamp(-1.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
}

impl CorrelationStrength {
    pub fn classify(r: f64) -> Self {
        let r = r.abs();
        if r >= STRONG_CORRELATION {
            Self::Strong
        } else if r >= MODERATE_CORRELATION {
            Self::Moderate
        } else {
            Self::Weak
        }
    }
}

/// Closing prices of an asset to compare against gold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSeries {
    pub symbol: String,
    pub closes: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetCorrelation {
    pub symbol: String,
    pub correlation: f64,
    pub strength: CorrelationStrength,
    /// Number of trailing closes actually compared.
    pub sample_size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationReport {
    /// Sorted by absolute correlation, strongest first.
    pub correlations: Vec<AssetCorrelation>,
    pub strongest_positive: Option<AssetCorrelation>,
    pub strongest_negative: Option<AssetCorrelation>,
}

fn trailing(series: &[f64], len: usize) -> &[f64] {
    &series[series.len() - len..]
}

/// Correlate gold against each asset over the trailing `window` closes.
/// Series are aligned on their most recent values; an asset sharing fewer
/// than two closes with gold is skipped.
pub fn rank_correlations(gold: &[f64], assets: &[AssetSeries], window: usize) -> CorrelationReport {
    let mut correlations: Vec<AssetCorrelation> = assets
        .iter()
        .filter_map(|asset| {
            let len = window.min(gold.len()).min(asset.closes.len());
            if len < 2 {
                return None;
            }
            let r = pearson(trailing(gold, len), trailing(&asset.closes, len));
            Some(AssetCorrelation {
                symbol: asset.symbol.clone(),
                correlation: r,
                strength: CorrelationStrength::classify(r),
                sample_size: len,
            })
        })
        .collect();

    correlations.sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));

    let strongest_positive = correlations
        .iter()
        .filter(|c| c.correlation > 0.0)
        .max_by(|a, b| a.correlation.total_cmp(&b.correlation))
        .cloned();
    let strongest_negative = correlations
        .iter()
        .filter(|c| c.correlation < 0.0)
        .min_by(|a, b| a.correlation.total_cmp(&b.correlation))
        .cloned();

    CorrelationReport {
        correlations,
        strongest_positive,
        strongest_negative,
    }
}
