//! Moving-average (record-sum targeting) analyzer.

use super::{rank, Analyzer, AnalyzerResult};
use crate::data::Dataset;
use crate::error::AnalyzerError;
use crate::rng::Lcg;

const CONFIDENCE: f64 = 75.0;

/// Targets the short-window moving average of record sums.
///
/// Computes the mean sum of the last few records, then greedily picks
/// frequency-ranked numbers whose cumulative sum stays at or below the
/// target. If the greedy walk underfills, the remaining slots are
/// backfilled deterministically with the highest-frequency numbers left.
pub struct MovingAverage {
    window: usize,
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self { window: 5 }
    }
}

impl MovingAverage {
    pub fn new(window: usize) -> Self {
        Self { window: window.max(1) }
    }
}

impl Analyzer for MovingAverage {
    fn name(&self) -> &str {
        "moving-average"
    }

    fn analyze(&self, data: &Dataset, _rng: &mut Lcg) -> Result<AnalyzerResult, AnalyzerError> {
        let window = self.window.min(data.len());
        let target: f64 = data.features[..window]
            .iter()
            .map(|f| f.sum as f64)
            .sum::<f64>()
            / window as f64;

        // Frequency-ranked walk order, ties by ascending value.
        let by_frequency = rank(
            data.all_numbers()
                .map(|n| (n, data.count(n) as f64))
                .collect(),
        );

        let picks = data.scheme.picks;
        let mut selected: Vec<u8> = Vec::with_capacity(picks);
        let mut cumulative = 0.0;
        for &(n, _) in &by_frequency {
            if selected.len() == picks {
                break;
            }
            if cumulative + n as f64 <= target {
                selected.push(n);
                cumulative += n as f64;
            }
        }

        // Deterministic backfill with the best remaining numbers.
        for &(n, _) in &by_frequency {
            if selected.len() == picks {
                break;
            }
            if !selected.contains(&n) {
                selected.push(n);
            }
        }

        let alternative: Vec<u8> = by_frequency
            .iter()
            .map(|&(n, _)| n)
            .filter(|n| !selected.contains(n))
            .take(picks)
            .collect();

        Ok(AnalyzerResult {
            algorithm: self.name().to_owned(),
            recommended: selected,
            alternative,
            confidence: CONFIDENCE,
            details: vec![format!(
                "targeting record sum {target:.1} over a {window}-record window"
            )],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::testutil::{assert_result_well_formed, synthetic_dataset};

    #[test]
    fn test_well_formed() {
        let data = synthetic_dataset(30);
        let result = MovingAverage::default()
            .analyze(&data, &mut Lcg::new(1))
            .unwrap();
        assert_result_well_formed(&result, &data);
        assert_eq!(result.recommended.len(), 6);
        assert_eq!(result.alternative.len(), 6);
    }

    #[test]
    fn test_selection_respects_sum_target_before_backfill() {
        let data = synthetic_dataset(30);
        let target: f64 = data.features[..5].iter().map(|f| f.sum as f64).sum::<f64>() / 5.0;

        let result = MovingAverage::default()
            .analyze(&data, &mut Lcg::new(1))
            .unwrap();
        // The greedy prefix (before any backfill) never exceeds the target.
        let mut cumulative = 0.0;
        let mut greedy_len = 0;
        for &n in &result.recommended {
            if cumulative + n as f64 > target {
                break;
            }
            cumulative += n as f64;
            greedy_len += 1;
        }
        assert!(greedy_len >= 1, "greedy walk selected nothing");
    }

    #[test]
    fn test_deterministic() {
        let data = synthetic_dataset(25);
        let a = MovingAverage::default()
            .analyze(&data, &mut Lcg::new(1))
            .unwrap();
        let b = MovingAverage::default()
            .analyze(&data, &mut Lcg::new(999))
            .unwrap();
        // No randomness consumed: the rng seed must not matter.
        assert_eq!(a, b);
    }
}
