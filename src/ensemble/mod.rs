//! Fan-in: weighted voting, quota normalization and result assembly.
//!
//! The pipeline after the analyzer fan-out:
//!
//! 1. [`aggregate`] merges surviving [`AnalyzerResult`]s under an
//!    [`EnsembleWeights`] table into one ranked candidate list.
//! 2. [`normalize`] restores the exact-size / uniqueness / range
//!    invariants by deterministic backfill.
//! 3. [`assemble`](crate::engine::PredictionEngine::predict) packages
//!    everything into the serializable [`FinalPrediction`].
//!
//! [`AnalyzerResult`]: crate::analyzers::AnalyzerResult

mod aggregator;
mod assembler;
mod normalizer;
mod weights;

pub use aggregator::{aggregate, Aggregate, CONFIDENCE_CAP};
pub use assembler::{
    Analysis, DataQuality, FinalPrediction, Metadata, Predictions, Statistics, SCHEMA_VERSION,
};
pub use normalizer::{normalize, NormalizedLists};
pub use weights::{EnsembleWeights, NORMALIZATION_TOLERANCE};

pub(crate) use assembler::assemble;
