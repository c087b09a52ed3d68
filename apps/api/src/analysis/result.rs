//! AnalysisResult: the fixed JSON contract returned to UI consumers.
//!
//! Field names and nesting must not change. Deserialization tolerates the usual
//! model drift (floats for integers, numbers for strings) but the invariants
//! hold on every value that leaves this module: radar scores are in [1, 10],
//! the percentage is in [0, 100] and ratios are `a/b` with `a <= b`.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use tracing::warn;

static RATIO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s*/\s*(\d+)\s*$").expect("ratio pattern is a valid regex")
});

pub const RADAR_MIN: u8 = 1;
pub const RADAR_MAX: u8 = 10;

// ────────────────────────────────────────────────────────────────────────────
// Schema
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub personal_info: PersonalInfo,
    pub matching_score: MatchingScore,
    pub requirements_breakdown: RequirementsBreakdown,
    pub matched_keywords: Vec<String>,
    pub radar_chart: RadarDimensions<RadarScore>,
    pub radar_reasoning: RadarDimensions<BilingualText>,
    pub bilingual_content: BilingualContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub position: String,
    /// Models sometimes answer `3` instead of `"3 years"`.
    #[serde(deserialize_with = "string_or_number")]
    pub experience: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingScore {
    #[serde(deserialize_with = "percentage")]
    pub percentage: u8,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementsBreakdown {
    pub must_have_ratio: Ratio,
    pub nice_to_have_ratio: Ratio,
}

/// One value per radar axis, keyed by the axis display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarDimensions<T> {
    #[serde(rename = "Hard Skills")]
    pub hard_skills: T,
    #[serde(rename = "Soft Skills")]
    pub soft_skills: T,
    #[serde(rename = "Experience")]
    pub experience: T,
    #[serde(rename = "Education")]
    pub education: T,
    #[serde(rename = "Domain Knowledge")]
    pub domain_knowledge: T,
}

impl<T> RadarDimensions<T> {
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        [
            &self.hard_skills,
            &self.soft_skills,
            &self.experience,
            &self.education,
            &self.domain_knowledge,
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BilingualText {
    pub en: String,
    pub vi: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BilingualList {
    pub en: Vec<String>,
    pub vi: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BilingualContent {
    pub general_assessment: BilingualText,
    pub comparison_table: Vec<ComparisonRow>,
    pub strengths: BilingualList,
    pub weaknesses_missing_skills: BilingualList,
    pub interview_questions: BilingualList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub jd_requirement: String,
    pub cv_evidence: String,
    pub status: MatchStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[serde(rename = "Matched", alias = "matched")]
    Matched,
    #[serde(rename = "Not Matched", alias = "Not matched", alias = "not matched")]
    NotMatched,
}

/// What the caller receives: the full schema or a single `error` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Complete(Box<AnalysisResult>),
    Failed { error: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Radar score
// ────────────────────────────────────────────────────────────────────────────

/// Integer radar score, always within [`RADAR_MIN`, `RADAR_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RadarScore(u8);

impl RadarScore {
    /// Clamps `raw` into the radar range.
    pub fn clamped(raw: i64) -> Self {
        let clamped = raw.clamp(RADAR_MIN as i64, RADAR_MAX as i64);
        if clamped != raw {
            warn!("Radar score {raw} outside {RADAR_MIN}-{RADAR_MAX}, clamped to {clamped}");
        }
        Self(clamped as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl<'de> Deserialize<'de> for RadarScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(LenientIntVisitor)
            .map(RadarScore::clamped)
    }
}

fn percentage<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = deserializer.deserialize_any(LenientIntVisitor)?;
    let clamped = raw.clamp(0, 100);
    if clamped != raw {
        warn!("Match percentage {raw} outside 0-100, clamped to {clamped}");
    }
    Ok(clamped as u8)
}

/// Accepts integers, floats (rounded) and numeric strings such as `"7"` or `"80%"`.
#[derive(Clone, Copy)]
struct LenientIntVisitor;

impl<'de> Visitor<'de> for LenientIntVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer, a float or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        Ok(i64::try_from(v).unwrap_or(i64::MAX))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        if v.is_finite() {
            Ok(v.round() as i64)
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        let trimmed = v.trim().trim_end_matches('%').trim();
        trimmed
            .parse::<f64>()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            .and_then(|n| self.visit_f64(n))
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Text(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Ratio
// ────────────────────────────────────────────────────────────────────────────

/// A `matched/total` requirement ratio. Serialized as the string `"a/b"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    matched: u32,
    total: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct RatioParseError(String);

impl Ratio {
    pub fn new(matched: u32, total: u32) -> Result<Self, RatioParseError> {
        if matched > total {
            return Err(RatioParseError(format!(
                "ratio numerator {matched} exceeds denominator {total}"
            )));
        }
        Ok(Self { matched, total })
    }
}

impl FromStr for Ratio {
    type Err = RatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = RATIO_RE
            .captures(s)
            .ok_or_else(|| RatioParseError(format!("'{s}' is not of the form a/b")))?;
        let parse = |i: usize| {
            caps[i]
                .parse::<u32>()
                .map_err(|e| RatioParseError(format!("'{s}': {e}")))
        };
        Ratio::new(parse(1)?, parse(2)?)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.matched, self.total)
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
