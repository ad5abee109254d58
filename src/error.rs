//! Error types for the prediction engine.
//!
//! Two tiers, matching the failure taxonomy of the engine:
//!
//! - [`PredictError`] is fatal and surfaces to the caller — a prediction
//!   run either returns a fully-formed result or one of these.
//! - [`AnalyzerError`] is recoverable: a failing analyzer is logged and
//!   excluded from the ensemble without aborting the run. It only
//!   escalates to [`PredictError::AllAnalyzersFailed`] when no analyzer
//!   survives.

use thiserror::Error;

/// Fatal errors returned by [`PredictionEngine::predict`](crate::engine::PredictionEngine::predict).
#[derive(Error, Debug)]
pub enum PredictError {
    /// The history is shorter than the minimum the preprocessor accepts.
    ///
    /// Retrying without more data is pointless.
    #[error("insufficient history: {got} records, need at least {min}")]
    InsufficientData { got: usize, min: usize },

    /// A record violates the draw scheme (wrong count, out of range,
    /// or duplicate values).
    #[error("invalid record {period}: {reason}")]
    InvalidRecord { period: String, reason: String },

    /// Every analyzer in the pool failed; there is no degraded mode.
    #[error("all {count} analyzers failed: {}", failures.join("; "))]
    AllAnalyzersFailed {
        count: usize,
        failures: Vec<String>,
    },

    /// The engine was built with an unusable configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Recoverable per-analyzer failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    /// The dataset carries no categorical axis with this name.
    #[error("dataset has no tag axis named {0:?}")]
    MissingAxis(String),

    /// The dataset is too thin for this analyzer's window or matrix.
    #[error("not enough data: {0}")]
    NotEnoughData(String),

    /// The analyzer panicked; contained by the fan-out harness.
    #[error("analyzer panicked: {0}")]
    Panicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_error_display() {
        let err = PredictError::InsufficientData { got: 9, min: 10 };
        assert_eq!(
            err.to_string(),
            "insufficient history: 9 records, need at least 10"
        );
    }

    #[test]
    fn test_all_failed_joins_sources() {
        let err = PredictError::AllAnalyzersFailed {
            count: 2,
            failures: vec!["a: boom".into(), "b: bust".into()],
        };
        assert_eq!(err.to_string(), "all 2 analyzers failed: a: boom; b: bust");
    }

    #[test]
    fn test_analyzer_error_display() {
        let err = AnalyzerError::MissingAxis("color".into());
        assert_eq!(err.to_string(), "dataset has no tag axis named \"color\"");
    }
}
