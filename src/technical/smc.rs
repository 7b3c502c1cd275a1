// =============================================================================
// Smart Money Concepts — Order Blocks & Fair Value Gaps
// =============================================================================
//
// Order block: the last opposing candle before a two-candle displacement.
//
//   bearish, bullish, bullish  with (close[2] - low[0]) / low[0]  > 0.5%
//     => bullish order block over candle 0's [low, high]
//   bullish, bearish, bearish  with (high[0] - close[2]) / high[0] > 0.5%
//     => bearish order block over candle 0's [low, high]
//
//   strength = min(100, move% * 10)
//
// Fair value gap: a three-candle imbalance where candle i never trades back
// into candle i-2.
//
//   low[i]  > high[i-2]  => bullish gap [high[i-2], low[i]]
//   high[i] < low[i-2]   => bearish gap [high[i], low[i-2]]
//
// A gap only counts when it exceeds 10% of the three candles' average range.

use serde::{Deserialize, Serialize};

use super::candle::{trailing_window, Candle};

pub const DEFAULT_SMC_LOOKBACK: usize = 50;

/// Minimum displacement after an order block, in percent.
pub const DEFAULT_MIN_MOVE_PCT: f64 = 0.5;
/// Minimum gap size as a fraction of the average candle range.
pub const DEFAULT_MIN_GAP_RATIO: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmcParams {
    pub lookback: usize,
    pub min_move_pct: f64,
    pub min_gap_ratio: f64,
}

impl Default for SmcParams {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_SMC_LOOKBACK,
            min_move_pct: DEFAULT_MIN_MOVE_PCT,
            min_gap_ratio: DEFAULT_MIN_GAP_RATIO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBlock {
    #[serde(rename = "type")]
    pub bias: Bias,
    pub high: f64,
    pub low: f64,
    pub strength: f64,
    /// Size of the displacement that confirmed the block, in percent.
    pub move_pct: f64,
    pub mitigated: bool,
    pub timestamp: i64,
    /// Position of the block candle in the analysed slice.
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairValueGap {
    #[serde(rename = "type")]
    pub bias: Bias,
    pub high: f64,
    pub low: f64,
    pub fill_percent: f64,
    pub filled: bool,
    pub timestamp: i64,
    /// Position of the third candle in the analysed slice.
    pub index: usize,
}

impl FairValueGap {
    pub fn size(&self) -> f64 {
        self.high - self.low
    }
}

fn order_block_at(window: &[Candle], i: usize, min_move_pct: f64) -> Option<(Bias, f64)> {
    let (c0, c1, c2) = (&window[i], &window[i + 1], &window[i + 2]);

    if c0.is_bearish() && c1.is_bullish() && c2.is_bullish() && c0.low > 0.0 {
        let move_pct = (c2.close - c0.low) / c0.low * 100.0;
        if move_pct > min_move_pct {
            return Some((Bias::Bullish, move_pct));
        }
    }

    if c0.is_bullish() && c1.is_bearish() && c2.is_bearish() && c0.high > 0.0 {
        let move_pct = (c0.high - c2.close) / c0.high * 100.0;
        if move_pct > min_move_pct {
            return Some((Bias::Bearish, move_pct));
        }
    }

    None
}

/// Order blocks in the trailing window, oldest first.
pub fn detect_order_blocks(candles: &[Candle], params: &SmcParams) -> Vec<OrderBlock> {
    let Some((offset, window)) = trailing_window(candles, params.lookback) else {
        return Vec::new();
    };
    if window.len() < 3 {
        return Vec::new();
    }

    (0..window.len() - 2)
        .filter_map(|i| {
            let (bias, move_pct) = order_block_at(window, i, params.min_move_pct)?;
            let c0 = &window[i];
            Some(OrderBlock {
                bias,
                high: c0.high,
                low: c0.low,
                strength: (move_pct * 10.0).min(100.0),
                move_pct,
                mitigated: false,
                timestamp: c0.timestamp,
                index: offset + i,
            })
        })
        .collect()
}

/// Fair value gaps in the trailing window, oldest first.  Every gap starts
/// unfilled; see [`track_fvg_fills`].
pub fn detect_fair_value_gaps(candles: &[Candle], params: &SmcParams) -> Vec<FairValueGap> {
    let Some((offset, window)) = trailing_window(candles, params.lookback) else {
        return Vec::new();
    };

    let mut gaps = Vec::new();
    for i in 2..window.len() {
        let (first, middle, third) = (&window[i - 2], &window[i - 1], &window[i]);
        let avg_range = (first.range() + middle.range() + third.range()) / 3.0;
        let min_gap = avg_range * params.min_gap_ratio;

        let gap = if third.low > first.high {
            Some((Bias::Bullish, third.low, first.high))
        } else if third.high < first.low {
            Some((Bias::Bearish, first.low, third.high))
        } else {
            None
        };

        if let Some((bias, high, low)) = gap {
            if high - low > min_gap {
                gaps.push(FairValueGap {
                    bias,
                    high,
                    low,
                    fill_percent: 0.0,
                    filled: false,
                    timestamp: middle.timestamp,
                    index: offset + i,
                });
            }
        }
    }
    gaps
}

/// Update each gap's fill from the candles that printed after it.  A bullish
/// gap fills from the top as price retraces down; a bearish gap from the
/// bottom as price retraces up.
pub fn track_fvg_fills(gaps: &mut [FairValueGap], candles: &[Candle]) {
    for gap in gaps.iter_mut() {
        let later = candles.get(gap.index + 1..).unwrap_or(&[]);
        let size = gap.size();
        if later.is_empty() || size <= 0.0 {
            continue;
        }

        let penetration = match gap.bias {
            Bias::Bullish => {
                let deepest = later.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
                gap.high - deepest
            }
            Bias::Bearish => {
                let highest = later.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
                highest - gap.low
            }
        };

        gap.fill_percent = (penetration / size * 100.0).clamp(0.0, 100.0);
        gap.filled = gap.fill_percent >= 100.0;
    }
}

/// Flag order blocks that price has traded back into after the displacement.
pub fn track_mitigation(blocks: &mut [OrderBlock], candles: &[Candle]) {
    for block in blocks.iter_mut() {
        let later = candles.get(block.index + 3..).unwrap_or(&[]);
        block.mitigated = match block.bias {
            Bias::Bullish => later.iter().any(|c| c.low <= block.high),
            Bias::Bearish => later.iter().any(|c| c.high >= block.low),
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmcAnalysis {
    pub order_blocks: Vec<OrderBlock>,
    pub fair_value_gaps: Vec<FairValueGap>,
}

/// Detect order blocks and gaps, then bring their state up to date with the
/// rest of the series.
pub fn analyze_smc(candles: &[Candle], params: &SmcParams) -> SmcAnalysis {
    let mut order_blocks = detect_order_blocks(candles, params);
    let mut fair_value_gaps = detect_fair_value_gaps(candles, params);
    track_mitigation(&mut order_blocks, candles);
    track_fvg_fills(&mut fair_value_gaps, candles);
    SmcAnalysis {
        order_blocks,
        fair_value_gaps,
    }
}
