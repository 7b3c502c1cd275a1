// =============================================================================
// Inflation Impact Tagger
// =============================================================================
//
// Hotter inflation prints are read as bullish for gold, cooler prints as
// bearish.  Each series has its own band:
//
//   CPI  > 3.0  => Bullish   < 2.0 => Bearish
//   PCE  > 2.5  => Bullish   < 1.5 => Bearish
//   PPI  > 4.0  => Bullish   < 1.0 => Bearish
//
// Anything inside the band is Neutral.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::types::{Impact, Trend};

/// The inflation series a reading belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InflationKind {
    Cpi,
    Ppi,
    Pce,
}

impl InflationKind {
    /// (bullish_above, bearish_below) thresholds in percent.
    pub fn thresholds(self) -> (f64, f64) {
        match self {
            Self::Cpi => (3.0, 2.0),
            Self::Pce => (2.5, 1.5),
            Self::Ppi => (4.0, 1.0),
        }
    }

    /// Classify a reading of this series.
    pub fn classify(self, value: f64) -> Impact {
        let (bullish_above, bearish_below) = self.thresholds();
        if value > bullish_above {
            Impact::Bullish
        } else if value < bearish_below {
            Impact::Bearish
        } else {
            Impact::Neutral
        }
    }
}

impl FromStr for InflationKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpi" => Ok(Self::Cpi),
            "ppi" => Ok(Self::Ppi),
            "pce" => Ok(Self::Pce),
            _ => Err(AnalyticsError::UnknownInflationKind {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for InflationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpi => write!(f, "cpi"),
            Self::Ppi => write!(f, "ppi"),
            Self::Pce => write!(f, "pce"),
        }
    }
}

/// A tagged inflation print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationReading {
    #[serde(rename = "type")]
    pub kind: InflationKind,
    pub value: f64,
    pub impact: Impact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

/// Tag an inflation value with its gold impact.
///
/// `previous` only contributes when it is itself finite; a NaN previous
/// reading is treated as absent.
pub fn tag(kind: InflationKind, value: f64, previous: Option<f64>) -> Result<InflationReading, AnalyticsError> {
    let value = AnalyticsError::ensure_finite("value", value)?;

    let change = previous.filter(|p| p.is_finite()).map(|p| value - p);

    Ok(InflationReading {
        kind,
        value,
        impact: kind.classify(value),
        change,
        trend: change.map(Trend::from_change),
    })
}

/// Same as [`tag`] but with the series given by name, as it arrives at the
/// HTTP boundary.
pub fn tag_named(kind: &str, value: f64, previous: Option<f64>) -> Result<InflationReading, AnalyticsError> {
    tag(kind.parse()?, value, previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpi_bands() {
        assert_eq!(tag(InflationKind::Cpi, 4.5, None).unwrap().impact, Impact::Bullish);
        assert_eq!(tag(InflationKind::Cpi, 1.5, None).unwrap().impact, Impact::Bearish);
        assert_eq!(tag(InflationKind::Cpi, 2.5, None).unwrap().impact, Impact::Neutral);
    }

    #[test]
    fn band_edges_are_neutral() {
        assert_eq!(InflationKind::Cpi.classify(3.0), Impact::Neutral);
        assert_eq!(InflationKind::Cpi.classify(2.0), Impact::Neutral);
        assert_eq!(InflationKind::Pce.classify(2.5), Impact::Neutral);
        assert_eq!(InflationKind::Pce.classify(1.5), Impact::Neutral);
        assert_eq!(InflationKind::Ppi.classify(4.0), Impact::Neutral);
        assert_eq!(InflationKind::Ppi.classify(1.0), Impact::Neutral);
    }

    #[test]
    fn pce_and_ppi_bands() {
        assert_eq!(InflationKind::Pce.classify(2.6), Impact::Bullish);
        assert_eq!(InflationKind::Pce.classify(1.4), Impact::Bearish);
        assert_eq!(InflationKind::Ppi.classify(4.2), Impact::Bullish);
        assert_eq!(InflationKind::Ppi.classify(0.5), Impact::Bearish);
        assert_eq!(InflationKind::Ppi.classify(2.5), Impact::Neutral);
    }

    #[test]
    fn previous_reading_adds_change_and_trend() {
        let reading = tag(InflationKind::Cpi, 3.2, Some(3.0)).unwrap();
        assert!((reading.change.unwrap() - 0.2).abs() < 1e-10);
        assert_eq!(reading.trend, Some(Trend::Rising));

        let falling = tag(InflationKind::Pce, 2.1, Some(2.4)).unwrap();
        assert_eq!(falling.trend, Some(Trend::Falling));

        let flat = tag(InflationKind::Ppi, 2.0, Some(2.0)).unwrap();
        assert_eq!(flat.trend, Some(Trend::Stable));
    }

    #[test]
    fn no_previous_means_no_trend() {
        let reading = tag(InflationKind::Cpi, 3.2, None).unwrap();
        assert!(reading.change.is_none());
        assert!(reading.trend.is_none());

        let nan_prev = tag(InflationKind::Cpi, 3.2, Some(f64::NAN)).unwrap();
        assert!(nan_prev.trend.is_none());
    }

    #[test]
    fn non_finite_value_is_an_error() {
        assert_eq!(
            tag(InflationKind::Cpi, f64::NAN, None),
            Err(AnalyticsError::NonFiniteValue { field: "value" })
        );
    }

    #[test]
    fn unknown_kind_is_an_error() {
        assert!(matches!(
            tag_named("gdp", 2.0, None),
            Err(AnalyticsError::UnknownInflationKind { .. })
        ));
        assert_eq!(tag_named("CPI", 4.5, None).unwrap().kind, InflationKind::Cpi);
    }

    #[test]
    fn reading_serialises_type_field() {
        let reading = tag(InflationKind::Cpi, 4.5, None).unwrap();
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["type"], "cpi");
        assert_eq!(json["impact"], "Bullish");
        assert!(json.get("trend").is_none());
    }
}
