// =============================================================================
// Macro Calculations
// =============================================================================
//
// Small, side-effect-free calculators over macro inputs:
// - Bank forecast consensus
// - Inflation print tagging (CPI / PPI / PCE)
// - Real yield and yield-curve spread

pub mod consensus;
pub mod inflation;
pub mod yields;

pub use consensus::{
    consensus_by_timeframe, consensus_from_prices, consensus_price, summarize_forecasts,
    BankForecast, ForecastSummary, Timeframe,
};
pub use inflation::{tag, tag_named, InflationKind, InflationReading};
pub use yields::{
    analyze_real_yield, real_yield, real_yield_impact, yield_spread, CurveStatus,
    RealYieldAnalysis, YieldPair, YieldSpread,
};
