use analysis_core::{AnalysisResult, ArchetypeScorer, Breakpoints, CompanyArchetype, QuarterMetrics};

use crate::scoring::{apply_rules, finish, or_zero, Inputs, LabelRule, Scores};

const PB: Breakpoints = Breakpoints::new(1.0, 3.0, 6.0);
const PE: Breakpoints = Breakpoints::new(10.0, 18.0, 30.0);

const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        tag: "mature and stable pharma",
        applies: |s, _| s.quality >= 75.0,
    },
    LabelRule {
        tag: "low valuation, margin of safety",
        applies: |s, _| s.valuation >= 70.0,
    },
];

pub struct PharmaMatureScorer;

impl ArchetypeScorer for PharmaMatureScorer {
    fn archetype(&self) -> CompanyArchetype {
        CompanyArchetype::PharmaMature
    }

    fn score(&self, current: &QuarterMetrics, previous: Option<&QuarterMetrics>) -> AnalysisResult {
        let input = Inputs::new(current, previous);
        let m = &input.current;

        let quality =
            (or_zero(m.roe) * 0.50 + or_zero(m.fcf_margin) * 0.30 + or_zero(m.gross_margin) * 0.20) * 100.0;

        let valuation = 100.0 - (PB.normalize(m.pb) * 0.60 + PE.normalize(m.pe) * 0.40);

        let trend = (input.delta(|q| q.roe) * 0.60 + input.delta(|q| q.fcf_margin) * 0.40) * 100.0 + 50.0;

        let scores = Scores::new(quality, valuation, trend);
        let labels = apply_rules(LABEL_RULES, &scores, m);
        finish(scores, labels, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stable_cheap_pharma() {
        let current = QuarterMetrics {
            pb: Some(2.0),
            pe: Some(12.0),
            roe: Some(22.0),
            fcf_margin: Some(24.0),
            gross_margin: Some(68.0),
            ..Default::default()
        };
        let result = PharmaMatureScorer.score(&current, None);

        assert_relative_eq!(result.quality_score, 100.0);
        // PB 2 -> 25, PE 12 -> 12.5; 100 - (15 + 5)
        assert_relative_eq!(result.valuation_score, 80.0);
        assert_relative_eq!(result.trend_score, 50.0);
        assert_eq!(
            result.labels,
            vec!["mature and stable pharma", "low valuation, margin of safety"]
        );
    }

    #[test]
    fn test_fractional_inputs_stay_below_label_threshold() {
        let previous = QuarterMetrics {
            roe: Some(0.20),
            fcf_margin: Some(0.22),
            ..Default::default()
        };
        let current = QuarterMetrics {
            pb: Some(5.0),
            pe: Some(25.0),
            roe: Some(0.18),
            fcf_margin: Some(0.22),
            gross_margin: Some(0.65),
            ..Default::default()
        };
        let result = PharmaMatureScorer.score(&current, Some(&previous));

        // (0.18 * 0.5 + 0.22 * 0.3 + 0.65 * 0.2) * 100
        assert_relative_eq!(result.quality_score, 28.6);
        // (-0.02 * 0.6) * 100 + 50
        assert_relative_eq!(result.trend_score, 48.8);
        assert!(result.labels.is_empty());
    }

    #[test]
    fn test_valuation_just_below_threshold_reports_seventy_without_label() {
        let current = QuarterMetrics {
            pb: Some(1.66693),
            ..Default::default()
        };
        let result = PharmaMatureScorer.score(&current, None);

        // 100 - (16.67325 * 0.6 + 50 * 0.4) = 69.99605
        assert_eq!(result.valuation_score, 70.0);
        assert!(result.summary.contains("Valuation: 70.00/100"));
        assert!(result.labels.is_empty());
    }
}
