//! Weighted-linear analyzer.

use super::{Analyzer, AnalyzerResult};
use crate::data::Dataset;
use crate::error::AnalyzerError;
use crate::rng::Lcg;

const CONFIDENCE: f64 = 80.0;

/// Scores each number as a fixed linear combination of normalized
/// historical frequency and normalized gap-since-last-seen.
///
/// The blend is static: frequency carries most of the signal, the gap
/// term nudges long-absent numbers upward.
pub struct WeightedLinear {
    frequency_weight: f64,
    gap_weight: f64,
}

impl Default for WeightedLinear {
    fn default() -> Self {
        Self {
            frequency_weight: 0.65,
            gap_weight: 0.35,
        }
    }
}

impl WeightedLinear {
    /// Custom blend; weights are used as given (they need not sum to 1).
    pub fn new(frequency_weight: f64, gap_weight: f64) -> Self {
        Self {
            frequency_weight,
            gap_weight,
        }
    }
}

impl Analyzer for WeightedLinear {
    fn name(&self) -> &str {
        "weighted-linear"
    }

    fn analyze(&self, data: &Dataset, _rng: &mut Lcg) -> Result<AnalyzerResult, AnalyzerError> {
        let max_count = data
            .frequency
            .iter()
            .copied()
            .max()
            .unwrap_or(1)
            .max(1) as f64;
        let max_gap = data.len() as f64;

        let scores: Vec<(u8, f64)> = data
            .all_numbers()
            .map(|n| {
                let freq_norm = data.count(n) as f64 / max_count;
                // A number never seen gets the full history as its gap.
                let gap = data.gap(n).unwrap_or(data.len()) as f64;
                let gap_norm = gap / max_gap;
                (
                    n,
                    self.frequency_weight * freq_norm + self.gap_weight * gap_norm,
                )
            })
            .collect();

        Ok(
            AnalyzerResult::from_scores(self.name(), scores, data.scheme.picks, CONFIDENCE)
                .with_detail(format!(
                    "linear blend {:.2}·frequency + {:.2}·gap",
                    self.frequency_weight, self.gap_weight
                )),
        )
    }
}
