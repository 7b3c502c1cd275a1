// =============================================================================
// Aurum Intel — Gold & forex analytics core
// =============================================================================
//
// Pure calculation modules (consensus, inflation, yields, COT, risk index,
// seasonality, scenarios, technical structure, correlation) plus the service
// layer that exposes them over HTTP.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod cache;
pub mod calculations;
pub mod correlation;
pub mod cot;
pub mod error;
pub mod risk_index;
pub mod runtime_config;
pub mod scenario;
pub mod seasonality;
pub mod technical;
pub mod types;

pub use error::AnalyticsError;
