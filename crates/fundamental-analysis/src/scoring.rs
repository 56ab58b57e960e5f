//! Shared plumbing for the archetype scorers: input preparation, score
//! clamping, ordered label rules and the fixed-format summary.

use analysis_core::{clamp_score, delta, round2, AnalysisResult, QuarterMetrics, NEUTRAL_SCORE};

/// Label separator in the summary. Tags contain commas, so a comma won't do.
pub const LABEL_SEPARATOR: &str = "; ";

/// Sanitized current quarter plus the previous quarter (all-`None` when absent).
pub(crate) struct Inputs {
    pub current: QuarterMetrics,
    pub previous: QuarterMetrics,
}

impl Inputs {
    pub fn new(current: &QuarterMetrics, previous: Option<&QuarterMetrics>) -> Self {
        Self {
            current: current.sanitized(),
            previous: previous.map(QuarterMetrics::sanitized).unwrap_or_default(),
        }
    }

    pub fn delta(&self, field: fn(&QuarterMetrics) -> Option<f64>) -> f64 {
        delta(field(&self.current), field(&self.previous))
    }
}

/// Missing quality inputs contribute nothing.
pub(crate) fn or_zero(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// The three scores clamped to [0, 100]. Label rules see these full-precision
/// values; only the reported copy is rounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores {
    pub quality: f64,
    pub valuation: f64,
    pub trend: f64,
}

impl Scores {
    pub fn new(quality: f64, valuation: f64, trend: f64) -> Self {
        Self {
            quality: clamp_score(quality, 0.0),
            valuation: clamp_score(valuation, NEUTRAL_SCORE),
            trend: clamp_score(trend, NEUTRAL_SCORE),
        }
    }

    /// Copy rounded to 2 dp, the precision scores are reported at.
    pub fn rounded(&self) -> Self {
        Self {
            quality: round2(self.quality),
            valuation: round2(self.valuation),
            trend: round2(self.trend),
        }
    }
}

/// One threshold rule. Rules in a list are evaluated independently and every
/// match appends its tag in list order.
pub(crate) struct LabelRule {
    pub tag: &'static str,
    pub applies: fn(&Scores, &QuarterMetrics) -> bool,
}

pub(crate) fn apply_rules(rules: &[LabelRule], scores: &Scores, metrics: &QuarterMetrics) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| (rule.applies)(scores, metrics))
        .map(|rule| rule.tag.to_string())
        .collect()
}

/// Render the digest: three score lines, an optional archetype-specific
/// line, then the labels when there are any.
pub fn render_summary(scores: &Scores, extra: Option<&str>, labels: &[String]) -> String {
    let mut lines = vec![
        format!("Quality score: {:.2}/100", scores.quality),
        format!("Valuation: {:.2}/100 (higher = cheaper)", scores.valuation),
        format!("Trend score: {:.2}/100", scores.trend),
    ];
    if let Some(extra) = extra {
        lines.push(extra.to_string());
    }
    if !labels.is_empty() {
        lines.push(format!("Labels: {}", labels.join(LABEL_SEPARATOR)));
    }
    lines.join("\n")
}

/// Labels must already be computed from the unrounded `scores`.
pub(crate) fn finish(scores: Scores, labels: Vec<String>, extra: Option<String>) -> AnalysisResult {
    let scores = scores.rounded();
    let summary = render_summary(&scores, extra.as_deref(), &labels);
    AnalysisResult {
        quality_score: scores.quality,
        valuation_score: scores.valuation,
        trend_score: scores.trend,
        labels,
        summary,
    }
}
