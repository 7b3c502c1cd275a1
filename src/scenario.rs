// =============================================================================
// Scenario Simulator — Linear elasticity model for gold
// =============================================================================
//
// Each macro shock moves gold by a fixed dollar amount per "unit" of change:
//
//   Fed funds      -$45  per 25 bps
//   DXY            -$15  per index point
//   Inflation      +$30  per 0.5 pp
//   Real yield     -$80  per 0.5 pp
//   Geo risk       +$25  per 20 risk points
//
// The terms are independent and additive.  Confidence falls as the inputs
// become more extreme relative to a typical move, floored at 30 and capped
// at 95.

use serde::{Deserialize, Serialize};

use crate::types::round2;

/// Spot price used when the caller does not supply one.
pub const DEFAULT_CURRENT_PRICE: f64 = 2650.0;

const MAX_CONFIDENCE: f64 = 95.0;
const MIN_CONFIDENCE: f64 = 30.0;
const CONFIDENCE_PENALTY_PER_EXTREMITY: f64 = 15.0;

/// A dollar coefficient applied per `unit` of input change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Elasticity {
    pub unit: f64,
    pub dollars_per_unit: f64,
}

impl Elasticity {
    pub const fn new(unit: f64, dollars_per_unit: f64) -> Self {
        Self {
            unit,
            dollars_per_unit,
        }
    }

    fn impact(&self, change: f64) -> f64 {
        if self.unit == 0.0 {
            return 0.0;
        }
        // Adding 0.0 turns a -0.0 product into 0.0.
        change / self.unit * self.dollars_per_unit + 0.0
    }
}

fn default_fed_rate() -> Elasticity {
    Elasticity::new(25.0, -45.0)
}

fn default_dxy() -> Elasticity {
    Elasticity::new(1.0, -15.0)
}

fn default_inflation() -> Elasticity {
    Elasticity::new(0.5, 30.0)
}

fn default_real_yield() -> Elasticity {
    Elasticity::new(0.5, -80.0)
}

fn default_geopolitical() -> Elasticity {
    Elasticity::new(20.0, 25.0)
}

/// The full coefficient set.  Loaded from runtime config so desks can tune it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElasticityTable {
    #[serde(default = "default_fed_rate")]
    pub fed_rate: Elasticity,
    #[serde(default = "default_dxy")]
    pub dxy: Elasticity,
    #[serde(default = "default_inflation")]
    pub inflation: Elasticity,
    #[serde(default = "default_real_yield")]
    pub real_yield: Elasticity,
    #[serde(default = "default_geopolitical")]
    pub geopolitical: Elasticity,
}

impl Default for ElasticityTable {
    fn default() -> Self {
        Self {
            fed_rate: default_fed_rate(),
            dxy: default_dxy(),
            inflation: default_inflation(),
            real_yield: default_real_yield(),
            geopolitical: default_geopolitical(),
        }
    }
}

/// Size of a "typical" move per input, used to measure extremity.
#[derive(Debug, Clone, Copy)]
struct TypicalMove {
    unit: f64,
    weight: f64,
}

const TYPICAL_FED_BPS: TypicalMove = TypicalMove { unit: 100.0, weight: 1.0 };
const TYPICAL_DXY_POINTS: TypicalMove = TypicalMove { unit: 5.0, weight: 1.0 };
const TYPICAL_INFLATION_PP: TypicalMove = TypicalMove { unit: 1.0, weight: 1.0 };
const TYPICAL_REAL_YIELD_PP: TypicalMove = TypicalMove { unit: 1.0, weight: 1.0 };
const TYPICAL_GEO_RISK: TypicalMove = TypicalMove { unit: 100.0, weight: 0.5 };

/// Macro shocks to simulate.  Every field defaults to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioInput {
    /// Fed funds change in basis points.
    pub fed_rate_change: f64,
    /// DXY change in index points.
    pub dxy_change: f64,
    /// Inflation change in percentage points.
    pub inflation_change: f64,
    /// Real yield change in percentage points.
    pub real_yield_change: f64,
    /// Geopolitical risk level, 0-100.
    pub geopolitical_risk: f64,
}

impl ScenarioInput {
    /// Replace NaN/infinite fields with zero so the simulator never fails.
    fn sanitized(&self) -> Self {
        let clean = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            fed_rate_change: clean(self.fed_rate_change),
            dxy_change: clean(self.dxy_change),
            inflation_change: clean(self.inflation_change),
            real_yield_change: clean(self.real_yield_change),
            geopolitical_risk: clean(self.geopolitical_risk),
        }
    }

    fn extremity(&self) -> f64 {
        [
            (self.fed_rate_change, TYPICAL_FED_BPS),
            (self.dxy_change, TYPICAL_DXY_POINTS),
            (self.inflation_change, TYPICAL_INFLATION_PP),
            (self.real_yield_change, TYPICAL_REAL_YIELD_PP),
            (self.geopolitical_risk, TYPICAL_GEO_RISK),
        ]
        .iter()
        .map(|(value, typical)| value.abs() / typical.unit * typical.weight)
        .sum()
    }
}

/// Dollar impact of each factor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactBreakdown {
    pub fed_impact: f64,
    pub dxy_impact: f64,
    pub inflation_impact: f64,
    pub real_yield_impact: f64,
    pub geo_impact: f64,
}

impl ImpactBreakdown {
    pub fn total(&self) -> f64 {
        self.fed_impact + self.dxy_impact + self.inflation_impact + self.real_yield_impact + self.geo_impact
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub current_price: f64,
    pub projected_price: f64,
    pub total_impact: f64,
    pub percent_change: f64,
    pub breakdown: ImpactBreakdown,
    pub confidence: f64,
    pub explanation: String,
}

/// Run the scenario with the default coefficient table.
pub fn calculate_scenario(input: &ScenarioInput, current_price: f64) -> ScenarioResult {
    calculate_scenario_with(&ElasticityTable::default(), input, current_price)
}

/// Run the scenario against an explicit coefficient table.
pub fn calculate_scenario_with(
    table: &ElasticityTable,
    input: &ScenarioInput,
    current_price: f64,
) -> ScenarioResult {
    let input = input.sanitized();
    let current_price = if current_price.is_finite() {
        current_price
    } else {
        DEFAULT_CURRENT_PRICE
    };

    let breakdown = ImpactBreakdown {
        fed_impact: table.fed_rate.impact(input.fed_rate_change),
        dxy_impact: table.dxy.impact(input.dxy_change),
        inflation_impact: table.inflation.impact(input.inflation_change),
        real_yield_impact: table.real_yield.impact(input.real_yield_change),
        geo_impact: table.geopolitical.impact(input.geopolitical_risk),
    };

    let total_impact = breakdown.total();
    let projected_price = round2(current_price + total_impact);
    let percent_change = if current_price > 0.0 {
        total_impact / current_price * 100.0
    } else {
        0.0
    };

    let confidence = (MAX_CONFIDENCE - input.extremity() * CONFIDENCE_PENALTY_PER_EXTREMITY)
        .clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
        .round();

    let explanation = explain(&input, &breakdown, projected_price, percent_change);

    ScenarioResult {
        current_price,
        projected_price,
        total_impact,
        percent_change,
        breakdown,
        confidence,
        explanation,
    }
}

fn signed_dollars(amount: f64) -> String {
    if amount >= 0.0 {
        format!("+${:.2}", amount)
    } else {
        format!("-${:.2}", amount.abs())
    }
}

fn direction(amount: f64) -> &'static str {
    if amount >= 0.0 {
        "bullish"
    } else {
        "bearish"
    }
}

fn explain(
    input: &ScenarioInput,
    breakdown: &ImpactBreakdown,
    projected_price: f64,
    percent_change: f64,
) -> String {
    let mut lines = Vec::new();

    if input.fed_rate_change != 0.0 {
        let verb = if input.fed_rate_change < 0.0 { "cut" } else { "hike" };
        lines.push(format!(
            "Fed rate {} of {:.0} bps: {} for gold ({})",
            verb,
            input.fed_rate_change.abs(),
            direction(breakdown.fed_impact),
            signed_dollars(breakdown.fed_impact)
        ));
    }
    if input.dxy_change != 0.0 {
        let verb = if input.dxy_change < 0.0 { "falls" } else { "rises" };
        lines.push(format!(
            "DXY {} {:.2} points: {} for gold ({})",
            verb,
            input.dxy_change.abs(),
            direction(breakdown.dxy_impact),
            signed_dollars(breakdown.dxy_impact)
        ));
    }
    if input.inflation_change != 0.0 {
        let verb = if input.inflation_change < 0.0 { "cools" } else { "heats up" };
        lines.push(format!(
            "Inflation {} by {:.2} pp: {} for gold ({})",
            verb,
            input.inflation_change.abs(),
            direction(breakdown.inflation_impact),
            signed_dollars(breakdown.inflation_impact)
        ));
    }
    if input.real_yield_change != 0.0 {
        let verb = if input.real_yield_change < 0.0 { "fall" } else { "rise" };
        lines.push(format!(
            "Real yields {} {:.2} pp: {} for gold ({})",
            verb,
            input.real_yield_change.abs(),
            direction(breakdown.real_yield_impact),
            signed_dollars(breakdown.real_yield_impact)
        ));
    }
    if input.geopolitical_risk != 0.0 {
        lines.push(format!(
            "Geopolitical risk at {:.0}/100: {} for gold ({})",
            input.geopolitical_risk,
            direction(breakdown.geo_impact),
            signed_dollars(breakdown.geo_impact)
        ));
    }

    let sign = if percent_change >= 0.0 { "+" } else { "-" };
    lines.push(format!(
        "Projected price: ${:.2} ({}{:.2}%)",
        projected_price,
        sign,
        percent_change.abs()
    ));

    lines.join("\n")
}

// =============================================================================
// Presets
// =============================================================================

/// Canned macro shocks for quick what-if analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioPreset {
    FedPivot,
    DollarRally,
    Stagflation,
    GeopoliticalShock,
    HawkishSurprise,
}

impl ScenarioPreset {
    pub const ALL: [ScenarioPreset; 5] = [
        Self::FedPivot,
        Self::DollarRally,
        Self::Stagflation,
        Self::GeopoliticalShock,
        Self::HawkishSurprise,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::FedPivot => "Fed pivot: 50 bps of cuts, softer dollar",
            Self::DollarRally => "Dollar rally: DXY +4, real yields up",
            Self::Stagflation => "Stagflation: inflation re-accelerates, real yields fall",
            Self::GeopoliticalShock => "Geopolitical shock: risk index spikes",
            Self::HawkishSurprise => "Hawkish surprise: 25 bps hike, firmer dollar",
        }
    }

    pub fn input(self) -> ScenarioInput {
        match self {
            Self::FedPivot => ScenarioInput {
                fed_rate_change: -50.0,
                dxy_change: -2.0,
                ..Default::default()
            },
            Self::DollarRally => ScenarioInput {
                dxy_change: 4.0,
                real_yield_change: 0.25,
                ..Default::default()
            },
            Self::Stagflation => ScenarioInput {
                inflation_change: 1.0,
                real_yield_change: -0.5,
                ..Default::default()
            },
            Self::GeopoliticalShock => ScenarioInput {
                geopolitical_risk: 80.0,
                ..Default::default()
            },
            Self::HawkishSurprise => ScenarioInput {
                fed_rate_change: 25.0,
                dxy_change: 1.5,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fed_cut_and_weaker_dollar() {
        let input = ScenarioInput {
            fed_rate_change: -50.0,
            dxy_change: -2.0,
            ..Default::default()
        };
        let r = calculate_scenario(&input, 2650.0);
        assert!((r.breakdown.fed_impact - 90.0).abs() < 1e-9);
        assert!((r.breakdown.dxy_impact - 30.0).abs() < 1e-9);
        assert!((r.total_impact - 120.0).abs() < 1e-9);
        assert_eq!(r.projected_price, 2770.0);
        assert!((r.percent_change - 120.0 / 2650.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn untouched_factors_have_positive_zero_impact() {
        let r = calculate_scenario(
            &ScenarioInput {
                inflation_change: 0.5,
                ..Default::default()
            },
            2650.0,
        );
        // Negative coefficients on zero moves must not print as -0.0.
        assert!(r.breakdown.fed_impact.is_sign_positive());
        assert!(r.breakdown.dxy_impact.is_sign_positive());
        assert!(r.breakdown.real_yield_impact.is_sign_positive());

        let json = serde_json::to_string(&r.breakdown).unwrap();
        assert!(!json.contains("-0.0"), "{json}");
    }

    #[test]
    fn each_coefficient() {
        let r = calculate_scenario(
            &ScenarioInput {
                inflation_change: 0.5,
                real_yield_change: 0.5,
                geopolitical_risk: 20.0,
                ..Default::default()
            },
            2650.0,
        );
        assert!((r.breakdown.inflation_impact - 30.0).abs() < 1e-9);
        assert!((r.breakdown.real_yield_impact + 80.0).abs() < 1e-9);
        assert!((r.breakdown.geo_impact - 25.0).abs() < 1e-9);
        assert!((r.total_impact + 25.0).abs() < 1e-9);
    }

    #[test]
    fn empty_scenario_is_unchanged_and_confident() {
        let r = calculate_scenario(&ScenarioInput::default(), DEFAULT_CURRENT_PRICE);
        assert_eq!(r.projected_price, 2650.0);
        assert_eq!(r.total_impact, 0.0);
        assert_eq!(r.confidence, 95.0);
        assert_eq!(r.explanation, "Projected price: $2650.00 (+0.00%)");
    }

    #[test]
    fn projected_price_is_rounded_to_cents() {
        let input = ScenarioInput {
            dxy_change: 0.3333,
            ..Default::default()
        };
        let r = calculate_scenario(&input, 2650.0);
        assert_eq!(r.projected_price, round2(2650.0 + r.total_impact));
    }

    #[test]
    fn confidence_stays_in_bounds() {
        let inputs = [
            ScenarioInput::default(),
            ScenarioInput {
                fed_rate_change: -500.0,
                dxy_change: 25.0,
                inflation_change: 5.0,
                real_yield_change: -4.0,
                geopolitical_risk: 100.0,
            },
            ScenarioInput {
                fed_rate_change: 25.0,
                ..Default::default()
            },
        ];
        for input in inputs {
            let r = calculate_scenario(&input, 2650.0);
            assert!((30.0..=95.0).contains(&r.confidence), "confidence {}", r.confidence);
        }
    }

    #[test]
    fn extreme_inputs_hit_the_floor() {
        let r = calculate_scenario(
            &ScenarioInput {
                fed_rate_change: -500.0,
                ..Default::default()
            },
            2650.0,
        );
        assert_eq!(r.confidence, 30.0);
    }

    #[test]
    fn explanation_lists_non_zero_factors() {
        let input = ScenarioInput {
            fed_rate_change: -50.0,
            dxy_change: -2.0,
            ..Default::default()
        };
        let r = calculate_scenario(&input, 2650.0);
        let lines: Vec<&str> = r.explanation.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("cut of 50 bps"));
        assert!(lines[0].contains("+$90.00"));
        assert!(lines[1].contains("+$30.00"));
        assert_eq!(lines[2], "Projected price: $2770.00 (+4.53%)");
    }

    #[test]
    fn bearish_summary_uses_minus_sign() {
        let r = calculate_scenario(
            &ScenarioInput {
                fed_rate_change: 25.0,
                ..Default::default()
            },
            2650.0,
        );
        assert!(r.explanation.contains("-$45.00"));
        assert!(r.explanation.ends_with("(-1.70%)"));
    }

    #[test]
    fn non_finite_inputs_are_ignored() {
        let r = calculate_scenario(
            &ScenarioInput {
                fed_rate_change: f64::NAN,
                dxy_change: f64::INFINITY,
                ..Default::default()
            },
            2650.0,
        );
        assert_eq!(r.total_impact, 0.0);
        assert_eq!(r.projected_price, 2650.0);
    }

    #[test]
    fn zero_price_does_not_divide() {
        let r = calculate_scenario(&ScenarioInput { dxy_change: 1.0, ..Default::default() }, 0.0);
        assert_eq!(r.percent_change, 0.0);
        assert_eq!(r.projected_price, -15.0);
    }

    #[test]
    fn custom_table_overrides_coefficients() {
        let table = ElasticityTable {
            dxy: Elasticity::new(1.0, -20.0),
            ..Default::default()
        };
        let r = calculate_scenario_with(&table, &ScenarioInput { dxy_change: -1.0, ..Default::default() }, 2000.0);
        assert_eq!(r.projected_price, 2020.0);
    }

    #[test]
    fn table_deserialises_partially() {
        let table: ElasticityTable =
            serde_json::from_str(r#"{ "dxy": { "unit": 1.0, "dollars_per_unit": -10.0 } }"#).unwrap();
        assert_eq!(table.dxy.dollars_per_unit, -10.0);
        assert_eq!(table.fed_rate, Elasticity::new(25.0, -45.0));
    }

    #[test]
    fn input_fields_default_to_zero() {
        let input: ScenarioInput = serde_json::from_str(r#"{ "fedRateChange": -25 }"#).unwrap();
        assert_eq!(input.fed_rate_change, -25.0);
        assert_eq!(input.geopolitical_risk, 0.0);
    }

    #[test]
    fn presets_are_distinct_and_valid() {
        let pivot = calculate_scenario(&ScenarioPreset::FedPivot.input(), 2650.0);
        assert_eq!(pivot.projected_price, 2770.0);
        for preset in ScenarioPreset::ALL {
            assert!(!preset.label().is_empty());
            let r = calculate_scenario(&preset.input(), 2650.0);
            assert!(r.total_impact != 0.0);
        }
    }
}
