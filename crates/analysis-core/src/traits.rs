use crate::{AnalysisResult, CompanyArchetype, QuarterMetrics};

/// Scores one quarter for a single company archetype.
///
/// Implementations are stateless: the result depends only on the two
/// metric records passed in.
pub trait ArchetypeScorer: Send + Sync {
    fn archetype(&self) -> CompanyArchetype;

    fn score(&self, current: &QuarterMetrics, previous: Option<&QuarterMetrics>) -> AnalysisResult;
}
