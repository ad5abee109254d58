//! Ensemble prediction engine for bounded-integer draw histories.
//!
//! Runs a pool of independent statistical analyzers over a shared
//! preprocessed history and combines their votes into one well-formed
//! recommendation:
//!
//! - **Data preprocessing**: frequency tables, per-record features and
//!   summary statistics computed once per run ([`data`]).
//! - **Analyzer pool**: eleven pluggable scoring strategies behind one
//!   trait — frequency ranking, Markov transitions, Bayesian
//!   posteriors, genetic refinement, Monte Carlo resampling and more
//!   ([`analyzers`]).
//! - **Weighted ensemble**: fan-in aggregation under a per-analyzer
//!   trust table, quota normalization and result assembly
//!   ([`ensemble`]).
//! - **Deterministic randomness**: every random draw comes from a
//!   seeded generator forked per analyzer, so identical inputs
//!   reproduce identical outputs bit for bit ([`rng`]).
//! - **Outcome tracking**: in-memory accuracy bookkeeping that adapts
//!   the weight table over time ([`tracking`]).
//!
//! The engine is fault-tolerant by exclusion: a failing analyzer is
//! logged and dropped from the vote, and only an all-analyzer failure
//! surfaces as an error.
//!
//! # Example
//!
//! ```no_run
//! use drawcast::data::Record;
//! use drawcast::engine::{PredictOptions, PredictionEngine};
//!
//! # fn history() -> Vec<Record> { unimplemented!() }
//! let engine = PredictionEngine::new();
//! let prediction = engine.predict(&history(), &PredictOptions::new())?;
//! println!("{:?}", prediction.predictions.recommended);
//! # Ok::<(), drawcast::error::PredictError>(())
//! ```
//!
//! The crate makes no claim of predictive validity; the analyzers are
//! statistical heuristics over an inherently unpredictable domain. What
//! it does guarantee is the engineering contract: deterministic,
//! fault-tolerant, invariant-preserving aggregation.

pub mod analyzers;
pub mod data;
pub mod engine;
pub mod ensemble;
pub mod error;
pub mod rng;
pub mod tracking;

pub use data::{Dataset, DrawScheme, Record};
pub use engine::{PredictOptions, PredictionEngine};
pub use ensemble::{EnsembleWeights, FinalPrediction};
pub use error::{AnalyzerError, PredictError};
