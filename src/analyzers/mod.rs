//! The analyzer pool: pluggable scoring strategies.
//!
//! Every analyzer implements [`Analyzer`] — one method over the shared
//! immutable [`Dataset`] — and is registered by name in an
//! [`AnalyzerPool`]. Analyzers are stateless across calls, never mutate
//! shared state, and receive their own forked [`Lcg`] when they need
//! randomness. A failing analyzer is excluded by the engine's fan-out
//! harness; it cannot abort the run.
//!
//! The standard pool ships the full strategy family:
//!
//! | analyzer | idea |
//! |---|---|
//! | [`FrequencyRank`] | prefer mid-frequency numbers over hot/cold extremes |
//! | [`MarkovTransition`] | record-to-record transition probabilities |
//! | [`BayesPosterior`] | long-run prior × smoothed recent likelihood |
//! | [`MovingAverage`] | greedy walk toward the recent mean record-sum |
//! | [`NearestNeighbor`] | numbers that followed similar historical records |
//! | [`WeightedLinear`] | fixed linear blend of frequency and gap |
//! | [`OmissionReversion`] | tiered hot-streak / overdue scoring |
//! | [`GeneticRefine`] | iterative refinement of candidate sets |
//! | [`MonteCarlo`] | resampling from the cumulative frequency distribution |
//! | [`Categorical`] | dominant-class representatives per tag axis |
//! | [`CoOccurrence`] | numbers that followed overlapping past records |

mod bayesian;
mod categorical;
mod co_occurrence;
mod frequency;
mod genetic;
mod linear;
mod markov;
mod monte_carlo;
mod moving_average;
mod neighbors;
mod omission;

pub use bayesian::BayesPosterior;
pub use categorical::Categorical;
pub use co_occurrence::CoOccurrence;
pub use frequency::FrequencyRank;
pub use genetic::GeneticRefine;
pub use linear::WeightedLinear;
pub use markov::MarkovTransition;
pub use monte_carlo::MonteCarlo;
pub use moving_average::MovingAverage;
pub use neighbors::NearestNeighbor;
pub use omission::OmissionReversion;

use crate::data::Dataset;
use crate::error::AnalyzerError;
use crate::rng::Lcg;

/// A pluggable scoring strategy.
///
/// `Send + Sync` because the engine fans analyzers out across threads
/// over the shared dataset.
pub trait Analyzer: Send + Sync {
    /// Stable identifier used for weights, logging and the output
    /// `analysis.algorithms` list.
    fn name(&self) -> &str;

    /// Scores candidates from the preprocessed dataset.
    ///
    /// `rng` is this analyzer's private sub-stream; implementations
    /// must not reach for any other randomness source.
    fn analyze(&self, data: &Dataset, rng: &mut Lcg) -> Result<AnalyzerResult, AnalyzerError>;
}

/// One analyzer's scored candidate lists.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerResult {
    /// The producing analyzer's name.
    pub algorithm: String,

    /// First-choice candidates, at most `k`, unique, in range.
    pub recommended: Vec<u8>,

    /// Second-choice candidates, disjoint from `recommended`.
    pub alternative: Vec<u8>,

    /// Self-assessed reliability in `[0, 100]`.
    pub confidence: f64,

    /// Free-form fragments for the reasoning trace; never parsed.
    pub details: Vec<String>,
}

impl AnalyzerResult {
    /// Builds a result from per-number scores: top-`k` become
    /// `recommended`, the next `k` become `alternative`.
    ///
    /// Sorting is descending by score with ties broken by ascending
    /// numeric value, so equal inputs always produce equal lists.
    pub fn from_scores(
        algorithm: &str,
        scores: Vec<(u8, f64)>,
        picks: usize,
        confidence: f64,
    ) -> Self {
        let ranked = rank(scores);
        let recommended: Vec<u8> = ranked.iter().take(picks).map(|&(n, _)| n).collect();
        let alternative: Vec<u8> = ranked
            .iter()
            .skip(picks)
            .take(picks)
            .map(|&(n, _)| n)
            .collect();
        Self {
            algorithm: algorithm.to_owned(),
            recommended,
            alternative,
            confidence,
            details: Vec::new(),
        }
    }

    /// Appends an explanatory fragment.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }
}

/// Sorts `(number, score)` pairs descending by score, ties by ascending
/// number. Zero- and negative-scored entries are kept: an analyzer that
/// wants to exclude a number simply omits it.
pub(crate) fn rank(mut scores: Vec<(u8, f64)>) -> Vec<(u8, f64)> {
    scores.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scores
}

/// Name-keyed registry of analyzers.
///
/// # Examples
///
/// ```
/// use drawcast::analyzers::{AnalyzerPool, FrequencyRank, MonteCarlo};
///
/// let pool = AnalyzerPool::new()
///     .with_analyzer(FrequencyRank)
///     .with_analyzer(MonteCarlo::default());
/// assert_eq!(pool.names(), vec!["frequency-rank", "monte-carlo"]);
/// ```
pub struct AnalyzerPool {
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl AnalyzerPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self {
            analyzers: Vec::new(),
        }
    }

    /// The full standard family, including one categorical analyzer per
    /// conventional tag axis (`color`, `zodiac`). Categorical analyzers
    /// fail recoverably on datasets without their axis.
    pub fn standard() -> Self {
        Self::new()
            .with_analyzer(FrequencyRank)
            .with_analyzer(MarkovTransition)
            .with_analyzer(BayesPosterior::default())
            .with_analyzer(MovingAverage::default())
            .with_analyzer(NearestNeighbor::default())
            .with_analyzer(WeightedLinear::default())
            .with_analyzer(OmissionReversion)
            .with_analyzer(GeneticRefine::default())
            .with_analyzer(MonteCarlo::default())
            .with_analyzer(Categorical::new("color"))
            .with_analyzer(Categorical::new("zodiac"))
            .with_analyzer(CoOccurrence)
    }

    /// Registers an analyzer. Order determines output listing order only;
    /// it never affects scores.
    pub fn with_analyzer<A: Analyzer + 'static>(mut self, analyzer: A) -> Self {
        self.analyzers.push(Box::new(analyzer));
        self
    }

    /// Number of registered analyzers.
    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.analyzers.iter().map(|a| a.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Box<dyn Analyzer>> {
        self.analyzers.iter()
    }

    pub(crate) fn as_slice(&self) -> &[Box<dyn Analyzer>] {
        &self.analyzers
    }
}

impl Default for AnalyzerPool {
    fn default() -> Self {
        Self::standard()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_deterministic_tie_break() {
        let ranked = rank(vec![(9, 1.0), (3, 2.0), (7, 1.0), (1, 1.0)]);
        let order: Vec<u8> = ranked.iter().map(|&(n, _)| n).collect();
        assert_eq!(order, vec![3, 1, 7, 9]);
    }

    #[test]
    fn test_from_scores_splits_top_and_next() {
        let scores = (1u8..=20).map(|n| (n, n as f64)).collect();
        let result = AnalyzerResult::from_scores("test", scores, 6, 80.0);
        assert_eq!(result.recommended, vec![20, 19, 18, 17, 16, 15]);
        assert_eq!(result.alternative, vec![14, 13, 12, 11, 10, 9]);
    }

    #[test]
    fn test_from_scores_short_input() {
        let result = AnalyzerResult::from_scores("test", vec![(4, 1.0), (2, 0.5)], 6, 70.0);
        assert_eq!(result.recommended, vec![4, 2]);
        assert!(result.alternative.is_empty());
    }

    #[test]
    fn test_standard_pool_names() {
        let pool = AnalyzerPool::standard();
        assert_eq!(pool.len(), 12);
        let names = pool.names();
        assert!(names.contains(&"frequency-rank"));
        assert!(names.contains(&"genetic-refine"));
        assert!(names.contains(&"categorical-color"));
        assert!(names.contains(&"co-occurrence"));
    }
}
