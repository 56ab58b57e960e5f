use analysis_core::{AnalysisResult, ArchetypeScorer, Breakpoints, CompanyArchetype, QuarterMetrics};

use crate::scoring::{apply_rules, finish, or_zero, Inputs, LabelRule, Scores};

const PB: Breakpoints = Breakpoints::new(1.0, 2.5, 5.0);
const PS: Breakpoints = Breakpoints::new(0.5, 1.5, 3.0);

const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        tag: "cycle trough, high quality",
        applies: |s, _| s.quality >= 70.0 && s.valuation >= 70.0,
    },
    LabelRule {
        tag: "signs of cyclical recovery",
        applies: |s, _| s.trend >= 70.0,
    },
];

pub struct ManufacturingScorer;

impl ArchetypeScorer for ManufacturingScorer {
    fn archetype(&self) -> CompanyArchetype {
        CompanyArchetype::Manufacturing
    }

    fn score(&self, current: &QuarterMetrics, previous: Option<&QuarterMetrics>) -> AnalysisResult {
        let input = Inputs::new(current, previous);
        let m = &input.current;

        let quality =
            (or_zero(m.roic) * 0.40 + or_zero(m.gross_margin) * 0.30 + or_zero(m.fcf_margin) * 0.30) * 100.0;

        let valuation = 100.0 - (PB.normalize(m.pb) * 0.50 + PS.normalize(m.ps) * 0.50);

        let trend = (input.delta(|q| q.roic) * 0.40
            + input.delta(|q| q.gross_margin) * 0.40
            + input.delta(|q| q.revenue_yoy) * 0.20)
            * 100.0
            + 50.0;

        let scores = Scores::new(quality, valuation, trend);
        let labels = apply_rules(LABEL_RULES, &scores, m);
        finish(scores, labels, None)
    }
}
