// =============================================================================
// Real Yield & Yield-Curve Spread
// =============================================================================
//
// Real yield = nominal 10Y - inflation.  Gold pays no coupon, so a negative
// real yield removes the opportunity cost of holding it:
//
//   real < 0  =>  Bullish
//   real > 1  =>  Bearish
//   otherwise =>  Neutral
//
// The 10Y-2Y spread flags curve inversion, a classic recession warning.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::types::Impact;

/// Nominal 10Y yield paired with the inflation rate it is deflated by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldPair {
    #[serde(rename = "nominal10Y")]
    pub nominal_10y: f64,
    pub inflation_rate: f64,
}

/// Real yield with its gold impact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealYieldAnalysis {
    pub nominal: f64,
    pub inflation: f64,
    pub real_yield: f64,
    pub impact: Impact,
}

/// Nominal minus inflation, exact subtraction with no rounding.
pub fn real_yield(nominal: f64, inflation: f64) -> Result<f64, AnalyticsError> {
    let nominal = AnalyticsError::ensure_finite("nominal", nominal)?;
    let inflation = AnalyticsError::ensure_finite("inflation", inflation)?;
    Ok(nominal - inflation)
}

pub fn real_yield_impact(real_yield: f64) -> Impact {
    if real_yield < 0.0 {
        Impact::Bullish
    } else if real_yield > 1.0 {
        Impact::Bearish
    } else {
        Impact::Neutral
    }
}

pub fn analyze_real_yield(pair: YieldPair) -> Result<RealYieldAnalysis, AnalyticsError> {
    let real = real_yield(pair.nominal_10y, pair.inflation_rate)?;
    Ok(RealYieldAnalysis {
        nominal: pair.nominal_10y,
        inflation: pair.inflation_rate,
        real_yield: real,
        impact: real_yield_impact(real),
    })
}

/// Shape of the curve between two maturities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveStatus {
    Inverted,
    Flat,
    Normal,
}

impl std::fmt::Display for CurveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inverted => write!(f, "Inverted"),
            Self::Flat => write!(f, "Flat"),
            Self::Normal => write!(f, "Normal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldSpread {
    pub spread: f64,
    pub inverted: bool,
    pub status: CurveStatus,
}

/// Spread below which a non-inverted curve is called flat.
const FLAT_SPREAD: f64 = 0.5;

/// Long-end minus short-end yield and the resulting curve status.
pub fn yield_spread(long: f64, short: f64) -> Result<YieldSpread, AnalyticsError> {
    let long = AnalyticsError::ensure_finite("long", long)?;
    let short = AnalyticsError::ensure_finite("short", short)?;

    let spread = long - short;
    let inverted = spread < 0.0;
    let status = if inverted {
        CurveStatus::Inverted
    } else if spread < FLAT_SPREAD {
        CurveStatus::Flat
    } else {
        CurveStatus::Normal
    };

    Ok(YieldSpread {
        spread,
        inverted,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_yield_is_exact_subtraction() {
        let pairs = [(4.25, 3.1), (1.5, 2.75), (0.0, 0.0), (-0.5, 1.2), (5.123456, 2.987654)];
        for (nominal, inflation) in pairs {
            let r = real_yield(nominal, inflation).unwrap();
            assert!((r - (nominal - inflation)).abs() < 1e-10);
        }
    }

    #[test]
    fn real_yield_rejects_nan() {
        assert_eq!(
            real_yield(f64::NAN, 2.0),
            Err(AnalyticsError::NonFiniteValue { field: "nominal" })
        );
        assert_eq!(
            real_yield(4.0, f64::INFINITY),
            Err(AnalyticsError::NonFiniteValue { field: "inflation" })
        );
    }

    #[test]
    fn impact_bands() {
        assert_eq!(real_yield_impact(-0.4), Impact::Bullish);
        assert_eq!(real_yield_impact(0.0), Impact::Neutral);
        assert_eq!(real_yield_impact(1.0), Impact::Neutral);
        assert_eq!(real_yield_impact(1.8), Impact::Bearish);
    }

    #[test]
    fn analyze_bundles_value_and_impact() {
        let analysis = analyze_real_yield(YieldPair {
            nominal_10y: 4.3,
            inflation_rate: 2.9,
        })
        .unwrap();
        assert!((analysis.real_yield - 1.4).abs() < 1e-10);
        assert_eq!(analysis.impact, Impact::Bearish);
    }

    #[test]
    fn spread_status() {
        let inverted = yield_spread(3.9, 4.4).unwrap();
        assert!(inverted.inverted);
        assert_eq!(inverted.status, CurveStatus::Inverted);

        let flat = yield_spread(4.2, 4.0).unwrap();
        assert!(!flat.inverted);
        assert_eq!(flat.status, CurveStatus::Flat);

        let zero = yield_spread(4.0, 4.0).unwrap();
        assert_eq!(zero.status, CurveStatus::Flat);

        let normal = yield_spread(4.6, 4.0).unwrap();
        assert_eq!(normal.status, CurveStatus::Normal);
    }

    #[test]
    fn spread_rejects_non_finite() {
        assert!(yield_spread(f64::NAN, 4.0).is_err());
    }

    #[test]
    fn yield_pair_wire_names() {
        let pair: YieldPair =
            serde_json::from_str(r#"{ "nominal10Y": 4.1, "inflationRate": 2.6 }"#).unwrap();
        assert_eq!(pair.nominal_10y, 4.1);
        assert_eq!(pair.inflation_rate, 2.6);
    }
}
