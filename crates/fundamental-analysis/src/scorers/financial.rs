use analysis_core::{AnalysisResult, ArchetypeScorer, Breakpoints, CompanyArchetype, QuarterMetrics};

use crate::scoring::{apply_rules, finish, or_zero, Inputs, LabelRule, Scores};

const PB: Breakpoints = Breakpoints::new(0.8, 1.5, 3.0);

/// Below this ROE a financial's quality score is zero regardless of cash flow.
const ROE_FLOOR: f64 = 12.0;

const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        tag: "high-ROE financial",
        applies: |_, m| or_zero(m.roe) >= 15.0,
    },
    LabelRule {
        tag: "deeply undervalued",
        applies: |_, m| or_zero(m.pb) < 1.0,
    },
];

/// Banks and insurers: book value and return on equity drive everything.
pub struct FinancialScorer;

impl ArchetypeScorer for FinancialScorer {
    fn archetype(&self) -> CompanyArchetype {
        CompanyArchetype::Financial
    }

    fn score(&self, current: &QuarterMetrics, previous: Option<&QuarterMetrics>) -> AnalysisResult {
        let input = Inputs::new(current, previous);
        let m = &input.current;

        let roe = or_zero(m.roe);
        let quality = if roe < ROE_FLOOR {
            0.0
        } else {
            (roe * 0.60 + or_zero(m.fcf_margin) * 0.40) * 100.0
        };

        let valuation = 100.0 - PB.normalize(m.pb);

        let trend = input.delta(|q| q.roe) * 100.0 + 50.0;

        let scores = Scores::new(quality, valuation, trend);
        let labels = apply_rules(LABEL_RULES, &scores, m);
        finish(scores, labels, None)
    }
}
