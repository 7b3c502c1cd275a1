// =============================================================================
// Geopolitical Risk Index — Keyword-frequency scoring of news headlines
// =============================================================================
//
// Headlines are concatenated and scanned for four keyword buckets using
// case-insensitive whole-word matching.  A keyword may sit in more than one
// bucket ("tariff" counts toward both sanctions and tariffs).
//
//   score = min(100, round(hits / (headlines * hits_per_headline) * 100))
//
//   score > 50  =>  rising
//   score < 30  =>  falling
//   otherwise   =>  stable

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::types::Trend;

/// Keyword hits per headline that map to a score of 100.
pub const DEFAULT_HITS_PER_HEADLINE: f64 = 2.0;

const WAR_KEYWORDS: &[&str] = &["war", "conflict", "military", "attack", "invasion", "troops"];
const SANCTIONS_KEYWORDS: &[&str] = &["sanctions", "embargo", "ban", "restrictions", "tariff"];
const TARIFFS_KEYWORDS: &[&str] = &["tariff", "trade war", "import duty", "export ban"];
const RECESSION_KEYWORDS: &[&str] = &["recession", "downturn", "slowdown", "contraction", "crisis"];

/// Hit counts per bucket.  All four keys are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCounts {
    pub war: usize,
    pub sanctions: usize,
    pub tariffs: usize,
    pub recession: usize,
}

impl KeywordCounts {
    pub fn total(&self) -> usize {
        self.war + self.sanctions + self.tariffs + self.recession
    }
}

/// Market fear bucket derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FearLevel {
    #[serde(rename = "Extreme Fear")]
    ExtremeFear,
    Fear,
    Moderate,
    #[serde(rename = "Low Fear")]
    LowFear,
}

impl FearLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=u8::MAX => Self::ExtremeFear,
            50..=69 => Self::Fear,
            30..=49 => Self::Moderate,
            _ => Self::LowFear,
        }
    }

    /// Display color for dashboards.
    pub fn color(self) -> &'static str {
        match self {
            Self::ExtremeFear => "#dc2626",
            Self::Fear => "#f97316",
            Self::Moderate => "#eab308",
            Self::LowFear => "#22c55e",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ExtremeFear => "Extreme Fear",
            Self::Fear => "Fear",
            Self::Moderate => "Moderate",
            Self::LowFear => "Low Fear",
        }
    }
}

impl std::fmt::Display for FearLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskIndex {
    pub score: u8,
    pub keywords: KeywordCounts,
    pub trend: Trend,
    pub fear_level: FearLevel,
    pub color: String,
    pub headline_count: usize,
}

struct Bucket {
    patterns: Vec<Regex>,
}

impl Bucket {
    fn compile(keywords: &[&str]) -> Result<Self, AnalyticsError> {
        let patterns = keywords
            .iter()
            .map(|kw| {
                Regex::new(&format!(r"(?i)\b{}\b", regex::escape(kw))).map_err(|e| {
                    AnalyticsError::KeywordPattern {
                        keyword: kw.to_string(),
                        reason: e.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    fn count(&self, text: &str) -> usize {
        self.patterns.iter().map(|re| re.find_iter(text).count()).sum()
    }
}

/// Compiled keyword matcher.  Build once and share; scoring is read-only.
pub struct RiskScorer {
    war: Bucket,
    sanctions: Bucket,
    tariffs: Bucket,
    recession: Bucket,
    hits_per_headline: f64,
}

impl RiskScorer {
    pub fn new(hits_per_headline: f64) -> Result<Self, AnalyticsError> {
        Ok(Self {
            war: Bucket::compile(WAR_KEYWORDS)?,
            sanctions: Bucket::compile(SANCTIONS_KEYWORDS)?,
            tariffs: Bucket::compile(TARIFFS_KEYWORDS)?,
            recession: Bucket::compile(RECESSION_KEYWORDS)?,
            hits_per_headline,
        })
    }

    /// Count keyword hits across all headlines.
    pub fn count_keywords<S: AsRef<str>>(&self, headlines: &[S]) -> KeywordCounts {
        let text = headlines
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");

        KeywordCounts {
            war: self.war.count(&text),
            sanctions: self.sanctions.count(&text),
            tariffs: self.tariffs.count(&text),
            recession: self.recession.count(&text),
        }
    }

    /// Score a set of headlines.  An empty set scores zero.
    pub fn score<S: AsRef<str>>(&self, headlines: &[S]) -> RiskIndex {
        let keywords = if headlines.is_empty() {
            KeywordCounts::default()
        } else {
            self.count_keywords(headlines)
        };

        let denominator = headlines.len() as f64 * self.hits_per_headline;
        let score = if denominator > 0.0 {
            let raw = (keywords.total() as f64 / denominator * 100.0).round();
            raw.clamp(0.0, 100.0) as u8
        } else {
            0
        };

        let trend = if score > 50 {
            Trend::Rising
        } else if score < 30 {
            Trend::Falling
        } else {
            Trend::Stable
        };
        let fear_level = FearLevel::from_score(score);

        RiskIndex {
            score,
            keywords,
            trend,
            fear_level,
            color: fear_level.color().to_string(),
            headline_count: headlines.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> RiskScorer {
        RiskScorer::new(DEFAULT_HITS_PER_HEADLINE).unwrap()
    }

    #[test]
    fn empty_headlines_score_zero() {
        let idx = scorer().score::<&str>(&[]);
        assert_eq!(idx.score, 0);
        assert_eq!(idx.keywords, KeywordCounts::default());
        assert_eq!(idx.trend, Trend::Falling);
        assert_eq!(idx.fear_level, FearLevel::LowFear);
    }

    #[test]
    fn counts_are_case_insensitive_whole_words() {
        let counts = scorer().count_keywords(&[
            "WAR fears grow as troops mass at border",
            "Warning signs: software update",
        ]);
        // "Warning" is not the word "war".
        assert_eq!(counts.war, 2);
        assert_eq!(counts.recession, 0);
    }

    #[test]
    fn shared_keywords_count_in_every_bucket() {
        let counts = scorer().count_keywords(&["New tariff announced"]);
        assert_eq!(counts.sanctions, 1);
        assert_eq!(counts.tariffs, 1);
    }

    #[test]
    fn multi_word_keywords_match() {
        let counts = scorer().count_keywords(&["Trade war escalates with export ban"]);
        // "trade war" (tariffs) + "export ban" (tariffs); "war" and "ban" also hit.
        assert_eq!(counts.tariffs, 2);
        assert_eq!(counts.war, 1);
        assert_eq!(counts.sanctions, 1);
    }

    #[test]
    fn score_formula() {
        // 2 headlines, 3 hits: round(3 / 4 * 100) = 75
        let idx = scorer().score(&["Military attack reported", "Recession looms"]);
        assert_eq!(idx.keywords.total(), 3);
        assert_eq!(idx.score, 75);
        assert_eq!(idx.trend, Trend::Rising);
        assert_eq!(idx.fear_level, FearLevel::ExtremeFear);
        assert_eq!(idx.color, "#dc2626");
    }

    #[test]
    fn score_is_capped_at_100() {
        let idx = scorer().score(&["war war war war conflict crisis recession"]);
        assert_eq!(idx.score, 100);
    }

    #[test]
    fn quiet_news_is_low_fear() {
        let idx = scorer().score(&["Gold edges higher", "Central banks keep buying", "Markets calm"]);
        assert_eq!(idx.score, 0);
        assert!(idx.keywords.total() == 0);
    }

    #[test]
    fn fear_level_boundaries() {
        assert_eq!(FearLevel::from_score(70), FearLevel::ExtremeFear);
        assert_eq!(FearLevel::from_score(69), FearLevel::Fear);
        assert_eq!(FearLevel::from_score(50), FearLevel::Fear);
        assert_eq!(FearLevel::from_score(30), FearLevel::Moderate);
        assert_eq!(FearLevel::from_score(29), FearLevel::LowFear);
    }

    #[test]
    fn stable_band() {
        // 5 headlines, 4 hits: 4 / 10 = 40
        let idx = scorer().score(&["war", "crisis", "embargo", "slowdown", "gold"]);
        assert_eq!(idx.score, 40);
        assert_eq!(idx.trend, Trend::Stable);
        assert_eq!(idx.fear_level, FearLevel::Moderate);
    }

    #[test]
    fn custom_divisor_changes_sensitivity() {
        let strict = RiskScorer::new(4.0).unwrap();
        let idx = strict.score(&["Military attack reported", "Recession looms"]);
        // round(3 / 8 * 100) = 38
        assert_eq!(idx.score, 38);
    }

    #[test]
    fn serialises_all_keyword_keys() {
        let json = serde_json::to_value(scorer().score::<&str>(&[])).unwrap();
        for key in ["war", "sanctions", "tariffs", "recession"] {
            assert_eq!(json["keywords"][key], 0);
        }
        assert_eq!(json["fearLevel"], "Low Fear");
    }
}
