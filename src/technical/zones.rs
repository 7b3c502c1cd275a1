// =============================================================================
// Supply & Demand Zones — Swing-based zone detection
// =============================================================================
//
// A supply zone forms at a swing high: a candle whose high is strictly above
// the highs of the two candles before and the two after it.  The zone spans
// from the bottom of that candle's body up to its high.  Demand zones mirror
// this at swing lows, spanning from the low up to the top of the body.
//
// Strength starts at 50 and is adjusted by the origin candle:
//
//   volume / window average > 1.5  =>  +20
//   body / range > 0.6             =>  +15  (decisive candle)
//   body / range < 0.3             =>  +10  (rejection wick)
//
// Overlapping zones of the same side are merged, keeping the widest span and
// the strongest score.

use serde::{Deserialize, Serialize};

use super::candle::{trailing_window, Candle};

pub const DEFAULT_ZONE_LOOKBACK: usize = 50;

/// Candles on each side a swing must dominate.
const SWING_SPAN: usize = 2;

const BASE_STRENGTH: f64 = 50.0;
const HIGH_VOLUME_RATIO: f64 = 1.5;
const HIGH_VOLUME_BONUS: f64 = 20.0;
const DECISIVE_BODY_RATIO: f64 = 0.6;
const DECISIVE_BODY_BONUS: f64 = 15.0;
const WICK_BODY_RATIO: f64 = 0.3;
const WICK_BODY_BONUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Supply,
    Demand,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(rename = "type")]
    pub kind: ZoneKind,
    pub high: f64,
    pub low: f64,
    pub strength: f64,
    /// Timestamp of the candle that formed the zone.
    pub timestamp: i64,
}

impl Zone {
    pub fn contains(&self, price: f64) -> bool {
        price >= self.low && price <= self.high
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneSet {
    pub supply: Vec<Zone>,
    pub demand: Vec<Zone>,
}

fn average_volume(window: &[Candle]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.iter().map(|c| c.volume.unwrap_or(0.0)).sum::<f64>() / window.len() as f64
}

fn zone_strength(candle: &Candle, avg_volume: f64) -> f64 {
    let volume_ratio = if avg_volume > 0.0 {
        candle.volume.unwrap_or(0.0) / avg_volume
    } else {
        0.0
    };
    let body_ratio = candle.body_ratio();

    let mut strength = BASE_STRENGTH;
    if volume_ratio > HIGH_VOLUME_RATIO {
        strength += HIGH_VOLUME_BONUS;
    }
    if body_ratio > DECISIVE_BODY_RATIO {
        strength += DECISIVE_BODY_BONUS;
    }
    if body_ratio < WICK_BODY_RATIO {
        strength += WICK_BODY_BONUS;
    }
    strength.clamp(0.0, 100.0)
}

fn is_swing<F>(window: &[Candle], i: usize, dominates: F) -> bool
where
    F: Fn(&Candle, &Candle) -> bool,
{
    let pivot = &window[i];
    (1..=SWING_SPAN).all(|k| dominates(pivot, &window[i - k]) && dominates(pivot, &window[i + k]))
}

fn detect(candles: &[Candle], lookback: usize, kind: ZoneKind) -> Vec<Zone> {
    let Some((_, window)) = trailing_window(candles, lookback) else {
        return Vec::new();
    };
    if window.len() < SWING_SPAN * 2 + 1 {
        return Vec::new();
    }

    let avg_volume = average_volume(window);
    let mut zones = Vec::new();

    for i in SWING_SPAN..window.len() - SWING_SPAN {
        let candle = &window[i];
        let zone = match kind {
            ZoneKind::Supply if is_swing(window, i, |p, o| p.high > o.high) => Zone {
                kind,
                high: candle.high,
                low: candle.body_bottom(),
                strength: zone_strength(candle, avg_volume),
                timestamp: candle.timestamp,
            },
            ZoneKind::Demand if is_swing(window, i, |p, o| p.low < o.low) => Zone {
                kind,
                high: candle.body_top(),
                low: candle.low,
                strength: zone_strength(candle, avg_volume),
                timestamp: candle.timestamp,
            },
            _ => continue,
        };
        zones.push(zone);
    }

    merge_zones(zones)
}

/// Supply zones over the trailing `lookback` candles.
pub fn detect_supply_zones(candles: &[Candle], lookback: usize) -> Vec<Zone> {
    detect(candles, lookback, ZoneKind::Supply)
}

/// Demand zones over the trailing `lookback` candles.
pub fn detect_demand_zones(candles: &[Candle], lookback: usize) -> Vec<Zone> {
    detect(candles, lookback, ZoneKind::Demand)
}

pub fn detect_zones(candles: &[Candle], lookback: usize) -> ZoneSet {
    ZoneSet {
        supply: detect_supply_zones(candles, lookback),
        demand: detect_demand_zones(candles, lookback),
    }
}

/// Merge overlapping zones.  Zones are walked by descending high; a zone whose
/// high reaches into the current merged zone is absorbed into it.
pub fn merge_zones(mut zones: Vec<Zone>) -> Vec<Zone> {
    zones.sort_by(|a, b| b.high.total_cmp(&a.high));

    let mut merged: Vec<Zone> = Vec::with_capacity(zones.len());
    for zone in zones {
        match merged.last_mut() {
            Some(current) if current.kind == zone.kind && zone.high >= current.low => {
                current.low = current.low.min(zone.low);
                current.strength = current.strength.max(zone.strength);
            }
            _ => merged.push(zone),
        }
    }
    merged
}
