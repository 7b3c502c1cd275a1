// =============================================================================
// COT Positioning — Managed-money net position and crowding alerts
// =============================================================================
//
// The weekly CFTC Commitment of Traders report splits gold futures positions
// by trader category.  Managed money (hedge funds / CTAs) is the crowd we
// watch: when it is stretched to one side the trade is fragile.
//
// Alert precedence (first match wins):
//
//   long >= historic_high * threshold  =>  overcrowded    (high)
//   long / (long + short) > 0.85       =>  extreme_long   (medium)
//   long / (long + short) < 0.30       =>  extreme_short  (medium)
//   otherwise                          =>  no alert

use serde::{Deserialize, Serialize};

/// Fraction of the historic long high at which positioning is overcrowded.
pub const DEFAULT_OVERCROWDED_THRESHOLD: f64 = 0.9;

/// Long share above which managed money is extremely long.
const EXTREME_LONG_SHARE: f64 = 0.85;
/// Long share below which managed money is extremely short.
const EXTREME_SHORT_SHARE: f64 = 0.30;

/// One week of managed-money positioning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CotSnapshot {
    pub managed_money_long: f64,
    pub managed_money_short: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historic_high: Option<f64>,
}

impl CotSnapshot {
    pub fn new(long: f64, short: f64) -> Self {
        Self {
            managed_money_long: long,
            managed_money_short: short,
            historic_high: None,
        }
    }

    pub fn with_historic_high(mut self, high: f64) -> Self {
        self.historic_high = Some(high);
        self
    }

    /// Long share of the gross managed-money position, `None` when flat.
    pub fn long_share(&self) -> Option<f64> {
        let gross = self.managed_money_long + self.managed_money_short;
        if gross > 0.0 && gross.is_finite() {
            Some(self.managed_money_long / gross)
        } else {
            None
        }
    }
}

/// Longs minus shorts.
pub fn net_position(snapshot: &CotSnapshot) -> f64 {
    snapshot.managed_money_long - snapshot.managed_money_short
}

/// True when longs have reached `threshold` of the historic high.  A missing
/// or zero historic high can never be overcrowded.
pub fn is_overcrowded(snapshot: &CotSnapshot, threshold: f64) -> bool {
    match snapshot.historic_high {
        Some(high) if high != 0.0 && high.is_finite() => {
            snapshot.managed_money_long >= high * threshold
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CotAlertKind {
    Overcrowded,
    ExtremeLong,
    ExtremeShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CotAlert {
    #[serde(rename = "type")]
    pub kind: CotAlertKind,
    pub severity: Severity,
    pub message: String,
}

/// Produce at most one alert for the snapshot, overcrowding first.
pub fn generate_alert(snapshot: &CotSnapshot, threshold: f64) -> Option<CotAlert> {
    if is_overcrowded(snapshot, threshold) {
        return Some(CotAlert {
            kind: CotAlertKind::Overcrowded,
            severity: Severity::High,
            message: format!(
                "Managed money longs at {:.0} are within {:.0}% of the historic high",
                snapshot.managed_money_long,
                (1.0 - threshold) * 100.0
            ),
        });
    }

    let share = snapshot.long_share()?;
    if share > EXTREME_LONG_SHARE {
        Some(CotAlert {
            kind: CotAlertKind::ExtremeLong,
            severity: Severity::Medium,
            message: format!("Managed money is {:.1}% long, positioning is stretched", share * 100.0),
        })
    } else if share < EXTREME_SHORT_SHARE {
        Some(CotAlert {
            kind: CotAlertKind::ExtremeShort,
            severity: Severity::Medium,
            message: format!("Managed money is only {:.1}% long, shorts are crowded", share * 100.0),
        })
    } else {
        None
    }
}

/// Full read of a single snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CotAnalysis {
    pub net_position: f64,
    pub long_percentage: Option<f64>,
    pub overcrowded: bool,
    pub alert: Option<CotAlert>,
}

pub fn analyze(snapshot: &CotSnapshot, threshold: f64) -> CotAnalysis {
    CotAnalysis {
        net_position: net_position(snapshot),
        long_percentage: snapshot.long_share().map(|s| s * 100.0),
        overcrowded: is_overcrowded(snapshot, threshold),
        alert: generate_alert(snapshot, threshold),
    }
}

// =============================================================================
// Positioning history
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPosition {
    pub net_position: f64,
    /// Change from the prior week; `None` for the first week.
    pub weekly_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositioningHistory {
    pub weeks: Vec<WeeklyPosition>,
    /// Latest net position scaled into the series range, 0-100.
    pub cot_index: f64,
}

/// Net position series over `snapshots` (oldest first) with the COT index of
/// the latest week.  Empty input yields `None`.
pub fn positioning_history(snapshots: &[CotSnapshot]) -> Option<PositioningHistory> {
    let nets: Vec<f64> = snapshots.iter().map(net_position).collect();
    let latest = *nets.last()?;

    let weeks = nets
        .iter()
        .enumerate()
        .map(|(i, &net)| WeeklyPosition {
            net_position: net,
            weekly_change: if i == 0 { None } else { Some(net - nets[i - 1]) },
        })
        .collect();

    let min = nets.iter().copied().fold(f64::INFINITY, f64::min);
    let max = nets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let cot_index = if range > 0.0 {
        ((latest - min) / range * 100.0).clamp(0.0, 100.0)
    } else {
        50.0
    };

    Some(PositioningHistory { weeks, cot_index })
}
