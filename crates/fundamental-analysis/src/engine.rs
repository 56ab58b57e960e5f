use analysis_core::{AnalysisError, AnalysisResult, ArchetypeScorer, CompanyArchetype, QuarterMetrics};

use crate::scorers::{
    FinancialScorer, ManufacturingScorer, PharmaInnovationScorer, PharmaMatureScorer, TechMatureScorer,
    TechPlatformScorer,
};

/// Deterministic quarter scoring. Routes each call to the scorer for the
/// company's archetype.
#[derive(Debug, Clone, Copy)]
pub struct SystemAnalysisEngine;

impl SystemAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    /// Scorer for `archetype`. Adding an archetype fails to compile until it is mapped here.
    pub fn scorer(archetype: CompanyArchetype) -> &'static dyn ArchetypeScorer {
        match archetype {
            CompanyArchetype::TechPlatform => &TechPlatformScorer,
            CompanyArchetype::TechMature => &TechMatureScorer,
            CompanyArchetype::PharmaInnovation => &PharmaInnovationScorer,
            CompanyArchetype::PharmaMature => &PharmaMatureScorer,
            CompanyArchetype::Financial => &FinancialScorer,
            CompanyArchetype::Manufacturing => &ManufacturingScorer,
        }
    }

    /// Score `current` against `previous` (absent previous = no change).
    pub fn analyze(
        &self,
        archetype: CompanyArchetype,
        current: &QuarterMetrics,
        previous: Option<&QuarterMetrics>,
    ) -> AnalysisResult {
        let result = Self::scorer(archetype).score(current, previous);
        tracing::debug!(
            archetype = %archetype,
            has_previous = previous.is_some(),
            quality = result.quality_score,
            valuation = result.valuation_score,
            trend = result.trend_score,
            labels = result.labels.len(),
            "Quarter scored"
        );
        result
    }

    /// Same as [`analyze`](Self::analyze) but takes the raw company-type tag.
    /// Unknown tags fail before any scoring happens.
    pub fn analyze_tag(
        &self,
        company_type: &str,
        current: &QuarterMetrics,
        previous: Option<&QuarterMetrics>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let archetype: CompanyArchetype = company_type.parse()?;
        Ok(self.analyze(archetype, current, previous))
    }
}

impl Default for SystemAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
