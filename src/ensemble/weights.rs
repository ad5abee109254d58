//! Per-analyzer trust weights.

use std::collections::BTreeMap;

use tracing::warn;

/// Tolerance within which a weight table counts as normalized.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-6;

/// Relative trust per analyzer, keyed by analyzer name.
///
/// Weights are nonnegative and are expected to sum to 1; a table that
/// does not is renormalized with a warning, never rejected. Analyzers
/// missing from the table fall back to a uniform share at aggregation
/// time.
///
/// # Examples
///
/// ```
/// use drawcast::ensemble::EnsembleWeights;
///
/// let weights = EnsembleWeights::new()
///     .with_weight("frequency-rank", 0.6)
///     .with_weight("monte-carlo", 0.4);
/// assert!(weights.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnsembleWeights {
    weights: BTreeMap<String, f64>,
}

impl EnsembleWeights {
    /// Creates an empty table; every analyzer then gets a uniform share.
    pub fn new() -> Self {
        Self::default()
    }

    /// Equal weight for each of the given analyzer names.
    pub fn uniform<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let share = if names.is_empty() {
            0.0
        } else {
            1.0 / names.len() as f64
        };
        Self {
            weights: names.into_iter().map(|n| (n, share)).collect(),
        }
    }

    /// Sets one analyzer's weight.
    pub fn with_weight(mut self, algorithm: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(algorithm.into(), weight);
        self
    }

    /// Rejects negative entries. Sum deviations are not an error; they
    /// are repaired by [`normalized`](Self::normalized).
    pub fn validate(&self) -> Result<(), String> {
        for (algorithm, &w) in &self.weights {
            if w < 0.0 || !w.is_finite() {
                return Err(format!("weight for {algorithm:?} must be nonnegative, got {w}"));
            }
        }
        Ok(())
    }

    /// The raw weight for one analyzer, if configured.
    pub fn get(&self, algorithm: &str) -> Option<f64> {
        self.weights.get(algorithm).copied()
    }

    /// `true` when no analyzer has an explicit weight.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Sum of all configured weights.
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Returns a table summing to `1 ± 1e-6`.
    ///
    /// A misconfigured sum is scaled back with a `warn` event; an empty
    /// or all-zero table is returned unchanged (aggregation then uses
    /// the uniform fallback for every analyzer).
    pub fn normalized(&self) -> Self {
        let total = self.total();
        if self.weights.is_empty() || total <= 0.0 {
            if total < 0.0 {
                warn!(total, "ensemble weights sum below zero, using uniform fallback");
                return Self::default();
            }
            return self.clone();
        }
        if (total - 1.0).abs() <= NORMALIZATION_TOLERANCE {
            return self.clone();
        }
        warn!(total, "ensemble weights do not sum to 1, renormalizing");
        Self {
            weights: self
                .weights
                .iter()
                .map(|(k, &v)| (k.clone(), v / total))
                .collect(),
        }
    }

    /// Effective weight during aggregation: the configured value, or a
    /// uniform `1 / pool_len` share for analyzers the table never names.
    pub(crate) fn resolve(&self, algorithm: &str, pool_len: usize) -> f64 {
        self.get(algorithm)
            .unwrap_or(1.0 / pool_len.max(1) as f64)
    }

    /// A `BTreeMap` copy for the output contract's weight table.
    pub(crate) fn to_map(&self) -> BTreeMap<String, f64> {
        self.weights.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_shares() {
        let weights = EnsembleWeights::uniform(["a", "b", "c", "d"]);
        assert_eq!(weights.get("a"), Some(0.25));
        assert!((weights.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_repairs_sum() {
        let weights = EnsembleWeights::new()
            .with_weight("a", 0.5)
            .with_weight("b", 0.3); // sums to 0.8
        let normalized = weights.normalized();
        assert!((normalized.total() - 1.0).abs() <= NORMALIZATION_TOLERANCE);
        assert!((normalized.get("a").unwrap() - 0.625).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_keeps_good_table() {
        let weights = EnsembleWeights::uniform(["a", "b"]);
        assert_eq!(weights.normalized(), weights);
    }

    #[test]
    fn test_validate_rejects_negative() {
        let weights = EnsembleWeights::new().with_weight("a", -0.1);
        assert!(weights.validate().is_err());
        assert!(EnsembleWeights::new().validate().is_ok());
    }

    #[test]
    fn test_resolve_falls_back_to_uniform_share() {
        let weights = EnsembleWeights::new().with_weight("known", 0.7);
        assert_eq!(weights.resolve("known", 10), 0.7);
        assert_eq!(weights.resolve("unknown", 10), 0.1);
    }
}
