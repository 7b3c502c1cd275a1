// =============================================================================
// Candle — OHLC bar shared by the technical detectors
// =============================================================================

use serde::{Deserialize, Serialize};

/// A single OHLC candle.  Callers guarantee `high >= max(open, close)` and
/// `low <= min(open, close)`; the detectors do not re-check it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Open time in epoch milliseconds.
    pub timestamp: i64,
}

impl Candle {
    pub fn new(open: f64, high: f64, low: f64, close: f64, timestamp: i64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume: None,
            timestamp,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn body_top(&self) -> f64 {
        self.open.max(self.close)
    }

    pub fn body_bottom(&self) -> f64 {
        self.open.min(self.close)
    }

    /// Body as a fraction of the full range; zero for a flat candle.
    pub fn body_ratio(&self) -> f64 {
        let range = self.range();
        if range > 0.0 {
            self.body() / range
        } else {
            0.0
        }
    }
}

/// The trailing `lookback` candles, or `None` when history is too short.
pub(crate) fn trailing_window(candles: &[Candle], lookback: usize) -> Option<(usize, &[Candle])> {
    if lookback == 0 || candles.len() < lookback {
        return None;
    }
    let offset = candles.len() - lookback;
    Some((offset, &candles[offset..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_geometry() {
        let c = Candle::new(100.0, 110.0, 95.0, 104.0, 0);
        assert!(c.is_bullish());
        assert_eq!(c.range(), 15.0);
        assert_eq!(c.body(), 4.0);
        assert_eq!(c.body_top(), 104.0);
        assert_eq!(c.body_bottom(), 100.0);
        assert!((c.body_ratio() - 4.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn flat_candle_has_zero_body_ratio() {
        let c = Candle::new(100.0, 100.0, 100.0, 100.0, 0);
        assert_eq!(c.body_ratio(), 0.0);
        assert!(!c.is_bullish() && !c.is_bearish());
    }

    #[test]
    fn trailing_window_requires_history() {
        let candles: Vec<Candle> = (0..10).map(|i| Candle::new(1.0, 2.0, 0.5, 1.5, i)).collect();
        assert!(trailing_window(&candles, 11).is_none());
        assert!(trailing_window(&candles, 0).is_none());
        let (offset, window) = trailing_window(&candles, 4).unwrap();
        assert_eq!(offset, 6);
        assert_eq!(window.len(), 4);
        assert_eq!(window[0].timestamp, 6);
    }

    #[test]
    fn volume_is_optional_on_the_wire() {
        let c: Candle =
            serde_json::from_str(r#"{"open":1,"high":2,"low":0.5,"close":1.5,"timestamp":7}"#).unwrap();
        assert!(c.volume.is_none());
    }
}
