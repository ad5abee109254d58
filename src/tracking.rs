//! Outcome tracking and adaptive weight adjustment.
//!
//! Pure in-memory bookkeeping: record each analyzer's prediction
//! against the actual draw, maintain per-analyzer performance, and
//! derive an adjusted [`EnsembleWeights`] table from the accumulated
//! accuracy. Persistence is the caller's concern.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::ensemble::EnsembleWeights;

/// Thresholds and factors for the adaptive mechanism.
///
/// # Examples
///
/// ```
/// use drawcast::tracking::TrackerConfig;
///
/// let config = TrackerConfig::default()
///     .with_hit_threshold(4)
///     .with_failure_threshold(5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Minimum matched numbers for a prediction to count as a hit.
    pub hit_threshold: usize,

    /// Accuracy below which an analyzer's weight is reduced; above
    /// this plus [`high_margin`](Self::high_margin) it is raised.
    pub min_accuracy: f64,
    pub high_margin: f64,

    /// Consecutive misses before the dampening rule fires.
    pub failure_threshold: u32,
    /// Multiplier applied by the dampening rule.
    pub failure_dampening: f64,

    /// Low-performance reduction factor and its weight floor.
    pub low_factor: f64,
    pub min_weight: f64,
    /// Largest fraction of the current weight one adjustment may drop.
    pub max_weight_drop: f64,

    /// High-performance growth factor and its weight ceiling.
    pub high_factor: f64,
    pub max_weight: f64,

    /// Rolling window length for the recent-accuracy trend.
    pub trend_window: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            hit_threshold: 3,
            min_accuracy: 0.2,
            high_margin: 0.1,
            failure_threshold: 3,
            failure_dampening: 0.1,
            low_factor: 0.8,
            min_weight: 0.02,
            max_weight_drop: 0.5,
            high_factor: 1.2,
            max_weight: 0.5,
            trend_window: 10,
        }
    }
}

impl TrackerConfig {
    pub fn with_hit_threshold(mut self, threshold: usize) -> Self {
        self.hit_threshold = threshold;
        self
    }

    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    pub fn with_min_accuracy(mut self, accuracy: f64) -> Self {
        self.min_accuracy = accuracy;
        self
    }

    pub fn with_trend_window(mut self, window: usize) -> Self {
        self.trend_window = window.max(1);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.hit_threshold == 0 {
            return Err("hit_threshold must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.min_accuracy) {
            return Err(format!("min_accuracy {} out of [0, 1]", self.min_accuracy));
        }
        if self.min_weight > self.max_weight {
            return Err(format!(
                "min_weight {} above max_weight {}",
                self.min_weight, self.max_weight
            ));
        }
        if !(0.0..=1.0).contains(&self.failure_dampening) {
            return Err(format!(
                "failure_dampening {} out of [0, 1]",
                self.failure_dampening
            ));
        }
        Ok(())
    }
}

/// Accumulated performance of one analyzer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzerPerformance {
    pub algorithm: String,
    pub total: u32,
    pub correct: u32,
    /// `correct / total`; 0 before the first record.
    pub accuracy: f64,
    pub average_confidence: f64,
    pub consecutive_failures: u32,
    /// Most recent outcomes (1.0 hit, 0.0 miss), oldest first, capped
    /// at the configured window.
    pub trend: Vec<f64>,
    pub weight: f64,
}

impl AnalyzerPerformance {
    fn new(algorithm: String, weight: f64) -> Self {
        Self {
            algorithm,
            total: 0,
            correct: 0,
            accuracy: 0.0,
            average_confidence: 0.0,
            consecutive_failures: 0,
            trend: Vec::new(),
            weight,
        }
    }

    /// Mean of the rolling trend window.
    pub fn trend_accuracy(&self) -> f64 {
        if self.trend.is_empty() {
            0.0
        } else {
            self.trend.iter().sum::<f64>() / self.trend.len() as f64
        }
    }
}

/// Per-analyzer performance snapshot, accuracy descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub min_accuracy: f64,
    pub entries: Vec<AnalyzerPerformance>,
}

/// Records prediction outcomes and adapts analyzer weights.
///
/// ```
/// use drawcast::tracking::{OutcomeTracker, TrackerConfig};
///
/// let mut tracker = OutcomeTracker::new(TrackerConfig::default());
/// tracker.register("frequency-rank", 0.2);
/// let hit = tracker.record("frequency-rank", &[1, 2, 3, 4, 5, 6], &[1, 2, 3, 9, 10, 11], 78.0);
/// assert_eq!(hit, Some(true)); // three matches meets the threshold
/// ```
#[derive(Debug, Clone)]
pub struct OutcomeTracker {
    config: TrackerConfig,
    performance: BTreeMap<String, AnalyzerPerformance>,
}

impl OutcomeTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            performance: BTreeMap::new(),
        }
    }

    /// Starts tracking one analyzer at an initial weight.
    pub fn register(&mut self, algorithm: impl Into<String>, weight: f64) {
        let algorithm = algorithm.into();
        self.performance
            .entry(algorithm.clone())
            .or_insert_with(|| AnalyzerPerformance::new(algorithm, weight));
    }

    /// Scores one prediction against the actual draw.
    ///
    /// Returns whether it counted as a hit, or `None` for an analyzer
    /// that was never registered (logged, not an error).
    pub fn record(
        &mut self,
        algorithm: &str,
        predicted: &[u8],
        actual: &[u8],
        confidence: f64,
    ) -> Option<bool> {
        let Some(perf) = self.performance.get_mut(algorithm) else {
            warn!(algorithm, "outcome for unregistered analyzer ignored");
            return None;
        };

        let hits = predicted.iter().filter(|n| actual.contains(n)).count();
        let correct = hits >= self.config.hit_threshold;

        perf.total += 1;
        if correct {
            perf.correct += 1;
            perf.consecutive_failures = 0;
        } else {
            perf.consecutive_failures += 1;
        }
        perf.accuracy = perf.correct as f64 / perf.total as f64;
        perf.average_confidence = (perf.average_confidence * (perf.total - 1) as f64
            + confidence)
            / perf.total as f64;
        perf.trend.push(if correct { 1.0 } else { 0.0 });
        if perf.trend.len() > self.config.trend_window {
            perf.trend.remove(0);
        }

        adjust(perf, &self.config);
        Some(correct)
    }

    pub fn performance(&self, algorithm: &str) -> Option<&AnalyzerPerformance> {
        self.performance.get(algorithm)
    }

    /// The current weights as an [`EnsembleWeights`] table, renormalized
    /// to sum 1.
    pub fn adjusted_weights(&self) -> EnsembleWeights {
        self.performance
            .values()
            .fold(EnsembleWeights::new(), |weights, perf| {
                weights.with_weight(perf.algorithm.clone(), perf.weight)
            })
            .normalized()
    }

    /// The registered analyzer with the highest accuracy among those
    /// with at least `min_predictions` recorded outcomes.
    pub fn best(&self, min_predictions: u32) -> Option<&str> {
        self.performance
            .values()
            .filter(|perf| perf.total >= min_predictions)
            .max_by(|a, b| {
                a.accuracy
                    .partial_cmp(&b.accuracy)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|perf| perf.algorithm.as_str())
    }

    pub fn report(&self) -> PerformanceReport {
        let mut entries: Vec<AnalyzerPerformance> = self.performance.values().cloned().collect();
        entries.sort_by(|a, b| {
            b.accuracy
                .partial_cmp(&a.accuracy)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.algorithm.cmp(&b.algorithm))
        });
        PerformanceReport {
            min_accuracy: self.config.min_accuracy,
            entries,
        }
    }
}

/// Applies the weight adjustment rules after one recorded outcome.
fn adjust(perf: &mut AnalyzerPerformance, config: &TrackerConfig) {
    if perf.consecutive_failures >= config.failure_threshold {
        let old = perf.weight;
        perf.weight *= config.failure_dampening;
        warn!(
            algorithm = %perf.algorithm,
            failures = perf.consecutive_failures,
            old, new = perf.weight,
            "consecutive failures, weight dampened"
        );
        return;
    }

    if perf.accuracy < config.min_accuracy {
        let old = perf.weight;
        let mut new = (perf.weight * config.low_factor).max(config.min_weight);
        if old - new > old * config.max_weight_drop {
            new = old * (1.0 - config.max_weight_drop);
        }
        perf.weight = new;
        info!(algorithm = %perf.algorithm, old, new, "low accuracy, weight reduced");
    } else if perf.accuracy > config.min_accuracy + config.high_margin {
        let old = perf.weight;
        perf.weight = (perf.weight * config.high_factor).min(config.max_weight);
        info!(algorithm = %perf.algorithm, old, new = perf.weight, "high accuracy, weight raised");
    }
}
