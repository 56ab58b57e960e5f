use std::fmt;

use analysis_core::{AnalysisResult, ArchetypeScorer, Breakpoints, CompanyArchetype, QuarterMetrics};

use crate::scoring::{apply_rules, finish, or_zero, Inputs, LabelRule, Scores};

const PB: Breakpoints = Breakpoints::new(8.0, 20.0, 40.0);
const PE: Breakpoints = Breakpoints::new(20.0, 50.0, 100.0);
const PS: Breakpoints = Breakpoints::new(8.0, 20.0, 40.0);

const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        tag: "high-quality pharma, innovation premium",
        applies: |s, m| s.quality >= 80.0 && m.pb.is_some_and(|pb| pb > 30.0),
    },
    LabelRule {
        tag: "high valuation, growth-slowdown risk",
        applies: |s, m| m.pb.is_some_and(|pb| pb > 35.0) && s.trend < 40.0,
    },
];

/// Where price/book sits for a research-driven drug maker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PbBand {
    QuestionableQuality,
    Reasonable,
    InnovationPremium,
    NeedsSustainedGrowth,
}

impl PbBand {
    pub fn classify(pb: f64) -> Self {
        if pb < 10.0 {
            PbBand::QuestionableQuality
        } else if pb <= 20.0 {
            PbBand::Reasonable
        } else if pb <= 35.0 {
            PbBand::InnovationPremium
        } else {
            PbBand::NeedsSustainedGrowth
        }
    }
}

impl fmt::Display for PbBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PbBand::QuestionableQuality => "questionable quality",
            PbBand::Reasonable => "reasonable",
            PbBand::InnovationPremium => "innovation premium",
            PbBand::NeedsSustainedGrowth => "needs sustained growth delivery",
        })
    }
}

pub struct PharmaInnovationScorer;

impl ArchetypeScorer for PharmaInnovationScorer {
    fn archetype(&self) -> CompanyArchetype {
        CompanyArchetype::PharmaInnovation
    }

    fn score(&self, current: &QuarterMetrics, previous: Option<&QuarterMetrics>) -> AnalysisResult {
        let input = Inputs::new(current, previous);
        let m = &input.current;

        let roic = or_zero(m.roic);
        let wacc = or_zero(m.wacc);
        let quality = (roic * 0.40
            + (roic - wacc).max(0.0) * 0.30
            + or_zero(m.fcf_margin) * 0.20
            + or_zero(m.roe) * 0.10)
            * 100.0;

        let valuation =
            100.0 - (PB.normalize(m.pb) * 0.45 + PE.normalize(m.pe) * 0.35 + PS.normalize(m.ps) * 0.20);

        let trend = (input.delta(|q| q.roic) * 0.40
            + input.delta(|q| q.fcf_margin) * 0.30
            + input.delta(|q| q.gross_margin) * 0.30)
            * 100.0
            + 50.0;

        let scores = Scores::new(quality, valuation, trend);
        let labels = apply_rules(LABEL_RULES, &scores, m);
        let band = m
            .pb
            .filter(|pb| *pb != 0.0)
            .map(|pb| format!("PB band: {}", PbBand::classify(pb)));
        finish(scores, labels, band)
    }
}
