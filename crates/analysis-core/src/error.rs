use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Unsupported company type: {0}")]
    UnsupportedArchetype(String),
}

/// Errors raised while reading a `YYYY-Qn` quarter identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuarterParseError {
    #[error("Invalid quarter format '{0}', expected YYYY-Qn")]
    InvalidFormat(String),

    #[error("Quarter number out of range in '{0}', expected Q1-Q4")]
    QuarterOutOfRange(String),
}
