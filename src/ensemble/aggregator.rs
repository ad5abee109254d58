//! Weighted-vote fan-in over analyzer results.

use tracing::debug;

use super::weights::EnsembleWeights;
use crate::analyzers::AnalyzerResult;
use crate::data::DrawScheme;

/// First-choice votes count double.
const RECOMMENDED_VOTE: f64 = 2.0;
const ALTERNATIVE_VOTE: f64 = 1.0;

/// Upper bound on the ensemble confidence, below the theoretical max.
pub const CONFIDENCE_CAP: f64 = 95.0;

/// The merged vote of all surviving analyzers.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// Every voted-for candidate, score descending, ties by ascending
    /// numeric value.
    pub ranked: Vec<(u8, f64)>,

    /// Top-`k` candidates. May be short of `k` when few analyzers
    /// voted; the quota normalizer restores the size invariant.
    pub recommended: Vec<u8>,

    /// Next-`k` candidates.
    pub alternative: Vec<u8>,

    /// Mean survivor confidence, capped at [`CONFIDENCE_CAP`].
    pub confidence: f64,

    /// `1 − (max − min) / max` over the ranked scores: 1 when the vote
    /// concentrated on equally-scored candidates, near 0 when it spread.
    pub consistency: f64,
}

/// Merges surviving analyzer results under a normalized weight table.
///
/// Each number accumulates `weight × confidence/100 × 2` per analyzer
/// recommending it and `× 1` per analyzer listing it as an alternative.
/// Analyzers absent from the table get a uniform `1/n` share.
pub fn aggregate(
    results: &[AnalyzerResult],
    weights: &EnsembleWeights,
    scheme: &DrawScheme,
) -> Aggregate {
    let mut scores = vec![0.0f64; scheme.max_number as usize + 1];

    for result in results {
        let weight = weights.resolve(&result.algorithm, results.len());
        let strength = weight * result.confidence / 100.0;
        for &n in &result.recommended {
            scores[n as usize] += strength * RECOMMENDED_VOTE;
        }
        for &n in &result.alternative {
            scores[n as usize] += strength * ALTERNATIVE_VOTE;
        }
        debug!(
            algorithm = %result.algorithm,
            weight,
            confidence = result.confidence,
            "vote accumulated"
        );
    }

    let mut ranked: Vec<(u8, f64)> = (1..=scheme.max_number)
        .filter(|&n| scores[n as usize] > 0.0)
        .map(|n| (n, scores[n as usize]))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let recommended: Vec<u8> = ranked.iter().take(scheme.picks).map(|&(n, _)| n).collect();
    let alternative: Vec<u8> = ranked
        .iter()
        .skip(scheme.picks)
        .take(scheme.picks)
        .map(|&(n, _)| n)
        .collect();

    let confidence = if results.is_empty() {
        0.0
    } else {
        let mean = results.iter().map(|r| r.confidence).sum::<f64>() / results.len() as f64;
        mean.min(CONFIDENCE_CAP)
    };

    let consistency = match (ranked.first(), ranked.last()) {
        (Some(&(_, max)), Some(&(_, min))) if max > 0.0 => 1.0 - (max - min) / max,
        _ => 0.0,
    };

    Aggregate {
        ranked,
        recommended,
        alternative,
        confidence,
        consistency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(algorithm: &str, recommended: Vec<u8>, alternative: Vec<u8>, confidence: f64) -> AnalyzerResult {
        AnalyzerResult {
            algorithm: algorithm.into(),
            recommended,
            alternative,
            confidence,
            details: Vec::new(),
        }
    }

    #[test]
    fn test_recommended_votes_count_double() {
        let results = vec![
            result("a", vec![1], vec![2], 100.0),
            result("b", vec![2], vec![], 100.0),
        ];
        let weights = EnsembleWeights::uniform(["a", "b"]);
        let agg = aggregate(&results, &weights, &DrawScheme::default());

        // 1: 0.5 × 1.0 × 2 = 1.0; 2: 0.5 × 1 (alt) + 0.5 × 2 (rec) = 1.5.
        assert_eq!(agg.ranked[0], (2, 1.5));
        assert_eq!(agg.ranked[1], (1, 1.0));
    }

    #[test]
    fn test_ties_break_by_ascending_number() {
        let results = vec![result("a", vec![30, 7, 19], vec![], 80.0)];
        let weights = EnsembleWeights::uniform(["a"]);
        let agg = aggregate(&results, &weights, &DrawScheme::default());
        let order: Vec<u8> = agg.ranked.iter().map(|&(n, _)| n).collect();
        assert_eq!(order, vec![7, 19, 30]);
    }

    #[test]
    fn test_confidence_is_capped_mean() {
        let results = vec![
            result("a", vec![1], vec![], 92.0),
            result("b", vec![2], vec![], 88.0),
        ];
        let weights = EnsembleWeights::uniform(["a", "b"]);
        let agg = aggregate(&results, &weights, &DrawScheme::default());
        assert!((agg.confidence - 90.0).abs() < 1e-12);

        let loud = vec![
            result("a", vec![1], vec![], 100.0),
            result("b", vec![2], vec![], 100.0),
        ];
        let agg = aggregate(&loud, &weights, &DrawScheme::default());
        assert_eq!(agg.confidence, CONFIDENCE_CAP);
    }

    #[test]
    fn test_consistency_bounds() {
        // Unanimous equal scores → consistency 1.
        let results = vec![result("a", vec![1, 2, 3], vec![], 80.0)];
        let weights = EnsembleWeights::uniform(["a"]);
        let agg = aggregate(&results, &weights, &DrawScheme::default());
        assert!((agg.consistency - 1.0).abs() < 1e-12);

        // Spread vote → strictly below 1.
        let results = vec![
            result("a", vec![1], vec![2], 80.0),
            result("b", vec![1], vec![3], 80.0),
        ];
        let agg = aggregate(&results, &weights, &DrawScheme::default());
        assert!(agg.consistency > 0.0 && agg.consistency < 1.0);
    }

    #[test]
    fn test_top_and_next_k_split() {
        let results = vec![result(
            "a",
            vec![10, 11, 12, 13, 14, 15],
            vec![20, 21, 22, 23, 24, 25],
            80.0,
        )];
        let weights = EnsembleWeights::uniform(["a"]);
        let agg = aggregate(&results, &weights, &DrawScheme::default());
        assert_eq!(agg.recommended, vec![10, 11, 12, 13, 14, 15]);
        assert_eq!(agg.alternative, vec![20, 21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_unknown_algorithm_gets_uniform_share() {
        let results = vec![
            result("configured", vec![1], vec![], 100.0),
            result("stranger", vec![2], vec![], 100.0),
        ];
        let weights = EnsembleWeights::new().with_weight("configured", 0.5);
        let agg = aggregate(&results, &weights, &DrawScheme::default());
        // Both end up at 0.5 × 1.0 × 2 = 1.0.
        assert_eq!(agg.ranked[0].1, agg.ranked[1].1);
    }

    #[test]
    fn test_empty_input() {
        let agg = aggregate(&[], &EnsembleWeights::new(), &DrawScheme::default());
        assert!(agg.ranked.is_empty());
        assert_eq!(agg.confidence, 0.0);
        assert_eq!(agg.consistency, 0.0);
    }
}
