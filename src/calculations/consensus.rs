// =============================================================================
// Consensus Price — Mean of bank gold forecasts
// =============================================================================
//
// Invalid forecasts (NaN, infinite, or negative prices) never fail the batch:
// they are dropped before averaging.  With nothing left the consensus is
// `None` rather than zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Horizon a bank forecast targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "3M")]
    ThreeMonth,
    #[serde(rename = "6M")]
    SixMonth,
    #[serde(rename = "12M")]
    TwelveMonth,
    #[serde(rename = "EOY")]
    EndOfYear,
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ThreeMonth => write!(f, "3M"),
            Self::SixMonth => write!(f, "6M"),
            Self::TwelveMonth => write!(f, "12M"),
            Self::EndOfYear => write!(f, "EOY"),
        }
    }
}

/// A single bank's published gold price target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankForecast {
    pub bank_name: String,
    pub forecast_price: f64,
    pub timeframe: Timeframe,
    pub analyst_logic: String,
}

impl BankForecast {
    /// Check every field; a forecast must name its bank, carry a finite
    /// non-negative price and explain its reasoning.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.bank_name.trim().is_empty() {
            return Err(AnalyticsError::EmptyField { field: "bankName" });
        }
        AnalyticsError::ensure_finite("forecastPrice", self.forecast_price)?;
        if self.forecast_price < 0.0 {
            return Err(AnalyticsError::NegativeValue {
                field: "forecastPrice",
            });
        }
        if self.analyst_logic.trim().is_empty() {
            return Err(AnalyticsError::EmptyField {
                field: "analystLogic",
            });
        }
        Ok(())
    }

    fn has_valid_price(&self) -> bool {
        is_valid_price(self.forecast_price)
    }
}

fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

/// Arithmetic mean of the valid prices, or `None` when there are none.
pub fn consensus_from_prices(prices: &[f64]) -> Option<f64> {
    let (sum, count) = prices
        .iter()
        .copied()
        .filter(|p| is_valid_price(*p))
        .fold((0.0_f64, 0_usize), |(sum, count), p| (sum + p, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Consensus price across a set of bank forecasts.
pub fn consensus_price(forecasts: &[BankForecast]) -> Option<f64> {
    let prices: Vec<f64> = forecasts.iter().map(|f| f.forecast_price).collect();
    consensus_from_prices(&prices)
}

/// Consensus plus the dispersion of the targets around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub consensus: f64,
    pub highest: f64,
    pub lowest: f64,
    pub bank_count: usize,
    /// Percentage distance from spot to consensus; `None` without a usable spot.
    pub upside_pct: Option<f64>,
}

/// Summarise the valid forecasts against the current spot price.
pub fn summarize_forecasts(forecasts: &[BankForecast], current_price: f64) -> Option<ForecastSummary> {
    let valid: Vec<f64> = forecasts
        .iter()
        .filter(|f| f.has_valid_price())
        .map(|f| f.forecast_price)
        .collect();

    let consensus = consensus_from_prices(&valid)?;
    let highest = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = valid.iter().copied().fold(f64::INFINITY, f64::min);

    let upside_pct = if current_price.is_finite() && current_price > 0.0 {
        Some((consensus - current_price) / current_price * 100.0)
    } else {
        None
    };

    Some(ForecastSummary {
        consensus,
        highest,
        lowest,
        bank_count: valid.len(),
        upside_pct,
    })
}

/// Consensus computed separately for each forecast horizon.
pub fn consensus_by_timeframe(forecasts: &[BankForecast]) -> BTreeMap<Timeframe, f64> {
    let mut grouped: BTreeMap<Timeframe, Vec<f64>> = BTreeMap::new();
    for forecast in forecasts {
        grouped
            .entry(forecast.timeframe)
            .or_default()
            .push(forecast.forecast_price);
    }

    grouped
        .into_iter()
        .filter_map(|(tf, prices)| consensus_from_prices(&prices).map(|c| (tf, c)))
        .collect()
}
