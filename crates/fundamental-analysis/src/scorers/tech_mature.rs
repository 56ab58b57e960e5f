use analysis_core::{AnalysisResult, ArchetypeScorer, Breakpoints, CompanyArchetype, QuarterMetrics};

use crate::scoring::{apply_rules, finish, or_zero, Inputs, LabelRule, Scores};

const PE: Breakpoints = Breakpoints::new(15.0, 25.0, 40.0);
const PB: Breakpoints = Breakpoints::new(4.0, 8.0, 15.0);
const PS: Breakpoints = Breakpoints::new(4.0, 8.0, 15.0);

const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        tag: "mature high-quality",
        applies: |s, _| s.quality >= 85.0,
    },
    LabelRule {
        tag: "valuation in fair zone",
        applies: |s, _| s.valuation >= 70.0,
    },
    LabelRule {
        tag: "steady growth",
        applies: |s, _| s.trend >= 70.0,
    },
];

pub struct TechMatureScorer;

impl ArchetypeScorer for TechMatureScorer {
    fn archetype(&self) -> CompanyArchetype {
        CompanyArchetype::TechMature
    }

    fn score(&self, current: &QuarterMetrics, previous: Option<&QuarterMetrics>) -> AnalysisResult {
        let input = Inputs::new(current, previous);
        let m = &input.current;

        let quality = (or_zero(m.roic) * 0.45 + or_zero(m.fcf_margin) * 0.30 + or_zero(m.roe) * 0.25) * 100.0;

        let valuation =
            100.0 - (PE.normalize(m.pe) * 0.50 + PB.normalize(m.pb) * 0.30 + PS.normalize(m.ps) * 0.20);

        let trend =
            (input.delta(|q| q.roic) * 0.50 + input.delta(|q| q.revenue_yoy) * 0.50) * 100.0 + 50.0;

        let scores = Scores::new(quality, valuation, trend);
        let labels = apply_rules(LABEL_RULES, &scores, m);
        finish(scores, labels, None)
    }
}
