use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AnalysisError, QuarterParseError};

/// Company classification profile. Each variant has its own weights,
/// breakpoints and label thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyArchetype {
    TechPlatform,
    TechMature,
    PharmaInnovation,
    PharmaMature,
    Financial,
    Manufacturing,
}

impl CompanyArchetype {
    pub const ALL: [CompanyArchetype; 6] = [
        CompanyArchetype::TechPlatform,
        CompanyArchetype::TechMature,
        CompanyArchetype::PharmaInnovation,
        CompanyArchetype::PharmaMature,
        CompanyArchetype::Financial,
        CompanyArchetype::Manufacturing,
    ];

    /// Wire tag, e.g. `TECH_PLATFORM`
    pub fn as_tag(&self) -> &'static str {
        match self {
            CompanyArchetype::TechPlatform => "TECH_PLATFORM",
            CompanyArchetype::TechMature => "TECH_MATURE",
            CompanyArchetype::PharmaInnovation => "PHARMA_INNOVATION",
            CompanyArchetype::PharmaMature => "PHARMA_MATURE",
            CompanyArchetype::Financial => "FINANCIAL",
            CompanyArchetype::Manufacturing => "MANUFACTURING",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            CompanyArchetype::TechPlatform => "Tech platform",
            CompanyArchetype::TechMature => "Mature tech",
            CompanyArchetype::PharmaInnovation => "Innovative pharma",
            CompanyArchetype::PharmaMature => "Mature pharma",
            CompanyArchetype::Financial => "Financial",
            CompanyArchetype::Manufacturing => "Manufacturing",
        }
    }
}

impl fmt::Display for CompanyArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for CompanyArchetype {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.as_tag().eq_ignore_ascii_case(tag))
            .ok_or_else(|| AnalysisError::UnsupportedArchetype(s.to_string()))
    }
}

/// One quarter of reported ratios. Percentage-style fields are carried in
/// whatever unit the caller supplies (typically `18.0` for 18%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuarterMetrics {
    #[serde(default)]
    pub pe: Option<f64>,
    #[serde(default)]
    pub pb: Option<f64>,
    #[serde(default)]
    pub ps: Option<f64>,
    #[serde(default)]
    pub roe: Option<f64>,
    #[serde(default)]
    pub roic: Option<f64>,
    #[serde(default)]
    pub wacc: Option<f64>,
    #[serde(default)]
    pub revenue_yoy: Option<f64>,
    #[serde(default)]
    pub gross_margin: Option<f64>,
    #[serde(default)]
    pub fcf_margin: Option<f64>,
    #[serde(default)]
    pub capex_ratio: Option<f64>,
}

impl QuarterMetrics {
    /// Copy with every non-finite value (NaN, ±inf) replaced by `None`.
    pub fn sanitized(&self) -> Self {
        fn finite(v: Option<f64>) -> Option<f64> {
            v.filter(|x| x.is_finite())
        }

        Self {
            pe: finite(self.pe),
            pb: finite(self.pb),
            ps: finite(self.ps),
            roe: finite(self.roe),
            roic: finite(self.roic),
            wacc: finite(self.wacc),
            revenue_yoy: finite(self.revenue_yoy),
            gross_margin: finite(self.gross_margin),
            fcf_margin: finite(self.fcf_margin),
            capex_ratio: finite(self.capex_ratio),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Scores, labels and digest produced for one quarter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub quality_score: f64,   // 0 to 100
    pub valuation_score: f64, // 0 to 100, higher = cheaper
    pub trend_score: f64,     // 0 to 100, 50 = unchanged
    pub labels: Vec<String>,
    pub summary: String,
}

/// Calendar quarter identifier, serialized as `YYYY-Qn`.
///
/// Ordering is chronological: year first, then quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuarterId {
    year: u16,
    quarter: u8,
}

impl QuarterId {
    pub fn new(year: u16, quarter: u8) -> Result<Self, QuarterParseError> {
        if !(1..=4).contains(&quarter) {
            return Err(QuarterParseError::QuarterOutOfRange(format!("{year:04}-Q{quarter}")));
        }
        Ok(Self { year, quarter })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// The calendar quarter immediately before this one
    pub fn preceding(&self) -> Option<Self> {
        match self.quarter {
            1 => self.year.checked_sub(1).map(|year| Self { year, quarter: 4 }),
            q => Some(Self { year: self.year, quarter: q - 1 }),
        }
    }
}

impl fmt::Display for QuarterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-Q{}", self.year, self.quarter)
    }
}

impl FromStr for QuarterId {
    type Err = QuarterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QuarterParseError::InvalidFormat(s.to_string());

        let (year, quarter) = s.split_once("-Q").ok_or_else(invalid)?;
        if year.len() != 4 || quarter.len() != 1 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: u16 = year.parse().map_err(|_| invalid())?;
        let quarter: u8 = quarter.parse().map_err(|_| invalid())?;

        if !(1..=4).contains(&quarter) {
            return Err(QuarterParseError::QuarterOutOfRange(s.to_string()));
        }
        Ok(Self { year, quarter })
    }
}

impl TryFrom<String> for QuarterId {
    type Error = QuarterParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuarterId> for String {
    fn from(value: QuarterId) -> Self {
        value.to_string()
    }
}

/// A quarter identifier paired with that quarter's metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterRecord {
    pub quarter: QuarterId,
    #[serde(flatten)]
    pub metrics: QuarterMetrics,
}

/// Everything the downstream narrative generator receives for one quarter.
/// It never sees the summary string or the previous quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptContext {
    pub company_name: String,
    pub company_type: CompanyArchetype,
    pub quarter: QuarterId,
    pub metrics: QuarterMetrics,
    pub labels: Vec<String>,
}

impl PromptContext {
    pub fn new(
        company_name: impl Into<String>,
        company_type: CompanyArchetype,
        record: &QuarterRecord,
        result: &AnalysisResult,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            company_type,
            quarter: record.quarter,
            metrics: record.metrics.clone(),
            labels: result.labels.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_tags_round_trip() {
        for archetype in CompanyArchetype::ALL {
            let parsed: CompanyArchetype = archetype.as_tag().parse().unwrap();
            assert_eq!(parsed, archetype);

            let json = serde_json::to_string(&archetype).unwrap();
            assert_eq!(json, format!("\"{}\"", archetype.as_tag()));
        }
    }

    #[test]
    fn test_archetype_parse_is_case_insensitive() {
        assert_eq!(
            "tech_platform".parse::<CompanyArchetype>().unwrap(),
            CompanyArchetype::TechPlatform
        );
        assert_eq!(
            " Financial ".parse::<CompanyArchetype>().unwrap(),
            CompanyArchetype::Financial
        );
    }

    #[test]
    fn test_unknown_archetype_rejected() {
        let err = "BIOTECH".parse::<CompanyArchetype>().unwrap_err();
        assert_eq!(err, AnalysisError::UnsupportedArchetype("BIOTECH".to_string()));
        assert!("".parse::<CompanyArchetype>().is_err());
    }

    #[test]
    fn test_metrics_missing_fields_default_to_none() {
        let metrics: QuarterMetrics = serde_json::from_str(r#"{"pe": 12.5, "roe": null}"#).unwrap();
        assert_eq!(metrics.pe, Some(12.5));
        assert_eq!(metrics.roe, None);
        assert_eq!(metrics.capex_ratio, None);
        assert!(!metrics.is_empty());
        assert!(QuarterMetrics::default().is_empty());
    }

    #[test]
    fn test_sanitized_drops_non_finite() {
        let metrics = QuarterMetrics {
            pe: Some(f64::NAN),
            pb: Some(f64::INFINITY),
            ps: Some(3.0),
            ..Default::default()
        };
        let clean = metrics.sanitized();
        assert_eq!(clean.pe, None);
        assert_eq!(clean.pb, None);
        assert_eq!(clean.ps, Some(3.0));
    }

    #[test]
    fn test_quarter_id_parse_and_display() {
        let q: QuarterId = "2024-Q3".parse().unwrap();
        assert_eq!(q.year(), 2024);
        assert_eq!(q.quarter(), 3);
        assert_eq!(q.to_string(), "2024-Q3");
    }

    #[test]
    fn test_quarter_id_rejects_malformed() {
        for bad in ["2024Q3", "24-Q1", "2024-Q", "2024-Q12", "abcd-Q1", "2024-q1", ""] {
            assert!(
                matches!(bad.parse::<QuarterId>(), Err(QuarterParseError::InvalidFormat(_))),
                "{bad} should be rejected"
            );
        }
        assert_eq!(
            "2024-Q5".parse::<QuarterId>(),
            Err(QuarterParseError::QuarterOutOfRange("2024-Q5".to_string()))
        );
        assert!(QuarterId::new(2024, 0).is_err());
    }

    #[test]
    fn test_quarter_id_chronological_order() {
        let a: QuarterId = "2023-Q4".parse().unwrap();
        let b: QuarterId = "2024-Q1".parse().unwrap();
        let c: QuarterId = "2024-Q2".parse().unwrap();
        assert!(a < b && b < c);
        assert_eq!(b.preceding(), Some(a));
        assert_eq!(c.preceding(), Some(b));
    }

    #[test]
    fn test_quarter_record_flattens_metrics() {
        let record: QuarterRecord =
            serde_json::from_str(r#"{"quarter": "2024-Q2", "roic": 18.0, "wacc": 9.0}"#).unwrap();
        assert_eq!(record.quarter, QuarterId::new(2024, 2).unwrap());
        assert_eq!(record.metrics.roic, Some(18.0));
        assert_eq!(record.metrics.wacc, Some(9.0));

        let bad = serde_json::from_str::<QuarterRecord>(r#"{"quarter": "2024-Q9"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_prompt_context_carries_labels_not_summary() {
        let record = QuarterRecord {
            quarter: "2024-Q1".parse().unwrap(),
            metrics: QuarterMetrics { pb: Some(0.9), ..Default::default() },
        };
        let result = AnalysisResult {
            quality_score: 0.0,
            valuation_score: 100.0,
            trend_score: 50.0,
            labels: vec!["deeply undervalued".to_string()],
            summary: "ignored".to_string(),
        };
        let ctx = PromptContext::new("Acme Bank", CompanyArchetype::Financial, &record, &result);
        assert_eq!(ctx.company_name, "Acme Bank");
        assert_eq!(ctx.labels, result.labels);
        assert_eq!(ctx.metrics.pb, Some(0.9));

        let json = serde_json::to_value(&ctx).unwrap();
        assert!(json.get("summary").is_none());
        assert_eq!(json["company_type"], "FINANCIAL");
        assert_eq!(json["quarter"], "2024-Q1");
    }
}
