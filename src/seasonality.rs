// =============================================================================
// Gold Seasonality — Static historical monthly return table
// =============================================================================
//
// Figures are percent returns of spot gold per calendar month.  The table is
// constant data; nothing here is computed from live prices.
//
// Strength by average return:
//
//   avg >=  2  =>  strong-bullish
//   avg >=  1  =>  bullish
//   avg >=  0  =>  neutral
//   avg >= -1  =>  bearish
//   otherwise  =>  strong-bearish

use chrono::Datelike;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeasonalStrength {
    StrongBullish,
    Bullish,
    Neutral,
    Bearish,
    StrongBearish,
}

impl SeasonalStrength {
    pub fn classify(avg_return: f64) -> Self {
        if avg_return >= 2.0 {
            Self::StrongBullish
        } else if avg_return >= 1.0 {
            Self::Bullish
        } else if avg_return >= 0.0 {
            Self::Neutral
        } else if avg_return >= -1.0 {
            Self::Bearish
        } else {
            Self::StrongBearish
        }
    }
}

/// Historical return profile of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySeasonality {
    pub month: u32,
    pub name: &'static str,
    pub avg: f64,
    pub median: f64,
    pub positive_pct: f64,
    pub best: f64,
    pub worst: f64,
}

impl MonthlySeasonality {
    pub fn strength(&self) -> SeasonalStrength {
        SeasonalStrength::classify(self.avg)
    }
}

const fn month(
    month: u32,
    name: &'static str,
    avg: f64,
    median: f64,
    positive_pct: f64,
    best: f64,
    worst: f64,
) -> MonthlySeasonality {
    MonthlySeasonality {
        month,
        name,
        avg,
        median,
        positive_pct,
        best,
        worst,
    }
}

pub const MONTHLY_RETURNS: [MonthlySeasonality; 12] = [
    month(1, "January", 2.1, 1.8, 68.0, 11.4, -8.9),
    month(2, "February", 0.9, 0.7, 58.0, 9.8, -7.6),
    month(3, "March", -0.6, -0.4, 45.0, 6.9, -8.2),
    month(4, "April", 0.8, 0.6, 56.0, 7.1, -6.5),
    month(5, "May", -0.3, 0.1, 50.0, 8.7, -7.8),
    month(6, "June", -0.9, -0.6, 42.0, 6.1, -9.4),
    month(7, "July", 1.2, 1.0, 60.0, 10.3, -6.8),
    month(8, "August", 1.9, 1.5, 65.0, 12.6, -9.1),
    month(9, "September", 0.6, 0.3, 52.0, 13.8, -11.6),
    month(10, "October", -0.2, 0.1, 50.0, 9.2, -18.3),
    month(11, "November", 0.5, 0.7, 55.0, 12.9, -12.8),
    month(12, "December", 1.1, 0.9, 60.0, 9.5, -6.2),
];

/// Look up a month by its 1-based number.
pub fn month_seasonality(month: u32) -> Option<&'static MonthlySeasonality> {
    MONTHLY_RETURNS.get(month.checked_sub(1)? as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlySeasonality {
    pub quarter: u32,
    pub avg: f64,
    pub strength: SeasonalStrength,
}

/// Simple average of a quarter's three monthly averages.  `quarter` is 1-4.
pub fn quarter_seasonality(quarter: u32) -> Option<QuarterlySeasonality> {
    if !(1..=4).contains(&quarter) {
        return None;
    }
    let start = ((quarter - 1) * 3) as usize;
    let avg = MONTHLY_RETURNS[start..start + 3]
        .iter()
        .map(|m| m.avg)
        .sum::<f64>()
        / 3.0;

    Some(QuarterlySeasonality {
        quarter,
        avg,
        strength: SeasonalStrength::classify(avg),
    })
}

pub fn quarterly_seasonality() -> Vec<QuarterlySeasonality> {
    (1..=4).filter_map(quarter_seasonality).collect()
}

/// Month row with its strength label attached, as served to dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthOutlook {
    #[serde(flatten)]
    pub month: MonthlySeasonality,
    pub strength: SeasonalStrength,
}

pub fn monthly_outlooks() -> Vec<MonthOutlook> {
    MONTHLY_RETURNS
        .iter()
        .map(|m| MonthOutlook {
            month: *m,
            strength: m.strength(),
        })
        .collect()
}

/// Seasonal profile of the month containing `date`.
pub fn current_month_outlook<D: Datelike>(date: &D) -> MonthOutlook {
    let m = MONTHLY_RETURNS[date.month0() as usize];
    MonthOutlook {
        month: m,
        strength: m.strength(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn table_covers_every_month_in_order() {
        for (i, m) in MONTHLY_RETURNS.iter().enumerate() {
            assert_eq!(m.month as usize, i + 1);
            assert!(m.best >= m.worst);
            assert!((0.0..=100.0).contains(&m.positive_pct));
        }
    }

    #[test]
    fn strength_thresholds() {
        assert_eq!(SeasonalStrength::classify(2.0), SeasonalStrength::StrongBullish);
        assert_eq!(SeasonalStrength::classify(1.99), SeasonalStrength::Bullish);
        assert_eq!(SeasonalStrength::classify(1.0), SeasonalStrength::Bullish);
        assert_eq!(SeasonalStrength::classify(0.0), SeasonalStrength::Neutral);
        assert_eq!(SeasonalStrength::classify(-0.5), SeasonalStrength::Bearish);
        assert_eq!(SeasonalStrength::classify(-1.0), SeasonalStrength::Bearish);
        assert_eq!(SeasonalStrength::classify(-1.01), SeasonalStrength::StrongBearish);
    }

    #[test]
    fn month_lookup_bounds() {
        assert_eq!(month_seasonality(1).unwrap().name, "January");
        assert_eq!(month_seasonality(12).unwrap().name, "December");
        assert!(month_seasonality(0).is_none());
        assert!(month_seasonality(13).is_none());
    }

    #[test]
    fn january_is_strong() {
        assert_eq!(
            month_seasonality(1).unwrap().strength(),
            SeasonalStrength::StrongBullish
        );
    }

    #[test]
    fn quarter_is_mean_of_its_months() {
        let q3 = quarter_seasonality(3).unwrap();
        let expected = (1.2 + 1.9 + 0.6) / 3.0;
        assert!((q3.avg - expected).abs() < 1e-10);
        assert_eq!(q3.strength, SeasonalStrength::Bullish);

        let q2 = quarter_seasonality(2).unwrap();
        assert_eq!(q2.strength, SeasonalStrength::Bearish);

        assert!(quarter_seasonality(0).is_none());
        assert!(quarter_seasonality(5).is_none());
        assert_eq!(quarterly_seasonality().len(), 4);
    }

    #[test]
    fn outlook_for_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 14).unwrap();
        let outlook = current_month_outlook(&date);
        assert_eq!(outlook.month.name, "August");
        assert_eq!(outlook.strength, SeasonalStrength::Bullish);
    }

    #[test]
    fn outlook_serialises_flat() {
        let json = serde_json::to_value(monthly_outlooks()[0]).unwrap();
        assert_eq!(json["name"], "January");
        assert_eq!(json["positivePct"], 68.0);
        assert_eq!(json["strength"], "strong-bullish");
    }
}
