//! Scoring a company's full quarter history. Every quarter is scored against
//! the chronologically preceding record, whether or not the two quarters are
//! adjacent on the calendar.

use std::collections::BTreeMap;

use analysis_core::{AnalysisResult, CompanyArchetype, QuarterId, QuarterRecord};
use serde::{Deserialize, Serialize};

use crate::SystemAnalysisEngine;

/// Result for one quarter, keyed by quarter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterAnalysis {
    pub quarter: QuarterId,
    /// Quarter the trend was measured against, if any
    pub previous_quarter: Option<QuarterId>,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

/// The latest record strictly before `target`.
/// With duplicate quarter ids the one appearing last in `records` wins.
pub fn previous_quarter(records: &[QuarterRecord], target: QuarterId) -> Option<&QuarterRecord> {
    records
        .iter()
        .filter(|r| r.quarter < target)
        .max_by_key(|r| r.quarter)
}

/// Most recent analysis in the slice
pub fn latest(analyses: &[QuarterAnalysis]) -> Option<&QuarterAnalysis> {
    analyses.iter().max_by_key(|a| a.quarter)
}

impl SystemAnalysisEngine {
    /// Score every quarter in `records`, oldest first.
    pub fn analyze_series(&self, archetype: CompanyArchetype, records: &[QuarterRecord]) -> Vec<QuarterAnalysis> {
        // Later duplicates overwrite earlier ones
        let ordered: BTreeMap<QuarterId, &QuarterRecord> = records.iter().map(|r| (r.quarter, r)).collect();
        if ordered.len() < records.len() {
            tracing::warn!(
                archetype = %archetype,
                duplicates = records.len() - ordered.len(),
                "Duplicate quarters in series, keeping the last occurrence"
            );
        }

        let mut previous: Option<&QuarterRecord> = None;
        let mut analyses = Vec::with_capacity(ordered.len());

        for record in ordered.into_values() {
            tracing::debug!(
                quarter = %record.quarter,
                previous = ?previous.map(|p| p.quarter.to_string()),
                "Scoring quarter"
            );
            let result = self.analyze(archetype, &record.metrics, previous.map(|p| &p.metrics));
            analyses.push(QuarterAnalysis {
                quarter: record.quarter,
                previous_quarter: previous.map(|p| p.quarter),
                result,
            });
            previous = Some(record);
        }

        analyses
    }
}
