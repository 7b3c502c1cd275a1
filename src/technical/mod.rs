// =============================================================================
// Technical Structure Module
// =============================================================================
//
// Pattern detection over OHLC candle arrays:
// - Supply / demand zones from swing highs and lows
// - Smart-money order blocks and fair value gaps
//
// Every detector fails soft: too little history yields an empty result.

pub mod candle;
pub mod smc;
pub mod zones;

pub use candle::Candle;
pub use smc::{
    analyze_smc, detect_fair_value_gaps, detect_order_blocks, track_fvg_fills, track_mitigation,
    Bias, FairValueGap, OrderBlock, SmcAnalysis, SmcParams,
};
pub use zones::{
    detect_demand_zones, detect_supply_zones, detect_zones, merge_zones, Zone, ZoneKind, ZoneSet,
    DEFAULT_ZONE_LOOKBACK,
};
