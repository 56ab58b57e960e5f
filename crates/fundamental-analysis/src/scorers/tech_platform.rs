use std::fmt;

use analysis_core::{AnalysisResult, ArchetypeScorer, Breakpoints, CompanyArchetype, QuarterMetrics};

use crate::scoring::{apply_rules, finish, or_zero, Inputs, LabelRule, Scores};

const PS: Breakpoints = Breakpoints::new(5.0, 15.0, 30.0);
const PE: Breakpoints = Breakpoints::new(20.0, 50.0, 100.0);
const PB: Breakpoints = Breakpoints::new(5.0, 15.0, 30.0);

const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        tag: "high-quality, fair valuation",
        applies: |s, _| s.quality >= 80.0 && s.valuation >= 70.0,
    },
    LabelRule {
        tag: "high-quality, growth-premium valuation",
        applies: |s, _| s.quality >= 80.0 && s.valuation < 40.0,
    },
    LabelRule {
        tag: "late expansion, watch ROIC inflection",
        applies: |s, m| {
            // Zero ROIC or WACC counts as unreported
            matches!((m.roic, m.wacc), (Some(roic), Some(wacc)) if roic != 0.0 && wacc != 0.0 && roic < wacc)
                && s.trend >= 70.0
        },
    },
    LabelRule {
        tag: "fundamentals weakening",
        applies: |s, _| s.trend <= 30.0,
    },
];

/// Spread between ROIC and WACC, bucketed. Only rendered in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCreation {
    Strong,
    Creating,
    Marginal,
    Expansion,
    Consuming,
    InsufficientData,
}

impl ValueCreation {
    pub fn classify(roic: Option<f64>, wacc: Option<f64>) -> Self {
        let (Some(roic), Some(wacc)) = (roic, wacc) else {
            return ValueCreation::InsufficientData;
        };
        match roic - wacc {
            d if d >= 8.0 => ValueCreation::Strong,
            d if d >= 3.0 => ValueCreation::Creating,
            d if d >= 0.0 => ValueCreation::Marginal,
            d if d >= -5.0 => ValueCreation::Expansion,
            _ => ValueCreation::Consuming,
        }
    }
}

impl fmt::Display for ValueCreation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueCreation::Strong => "strong value creation",
            ValueCreation::Creating => "value creation",
            ValueCreation::Marginal => "marginal value creation",
            ValueCreation::Expansion => "normal for expansion phase",
            ValueCreation::Consuming => "heavy capital consumption",
            ValueCreation::InsufficientData => "insufficient data",
        })
    }
}

/// Platform businesses: capital efficiency above cost of capital, margins,
/// and falling capex intensity.
pub struct TechPlatformScorer;

impl ArchetypeScorer for TechPlatformScorer {
    fn archetype(&self) -> CompanyArchetype {
        CompanyArchetype::TechPlatform
    }

    fn score(&self, current: &QuarterMetrics, previous: Option<&QuarterMetrics>) -> AnalysisResult {
        let input = Inputs::new(current, previous);
        let m = &input.current;

        let roic = or_zero(m.roic);
        let wacc = or_zero(m.wacc);
        let quality = (roic * 0.35
            + (roic - wacc).max(0.0) * 0.35
            + or_zero(m.gross_margin) * 0.15
            + or_zero(m.fcf_margin) * 0.15)
            * 100.0;

        let valuation =
            100.0 - (PS.normalize(m.ps) * 0.40 + PE.normalize(m.pe) * 0.30 + PB.normalize(m.pb) * 0.30);

        // Falling capex intensity counts as an improvement
        let trend = (input.delta(|q| q.roic) * 0.40
            + input.delta(|q| q.gross_margin) * 0.30
            + (-input.delta(|q| q.capex_ratio)) * 0.30)
            * 100.0
            + 50.0;

        let scores = Scores::new(quality, valuation, trend);
        let labels = apply_rules(LABEL_RULES, &scores, m);
        let spread = ValueCreation::classify(m.roic, m.wacc);
        finish(scores, labels, Some(format!("ROIC-WACC: {spread}")))
    }
}
