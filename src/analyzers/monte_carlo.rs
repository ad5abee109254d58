//! Monte Carlo resampling analyzer.

use super::{Analyzer, AnalyzerResult};
use crate::data::Dataset;
use crate::error::AnalyzerError;
use crate::rng::Lcg;

const CONFIDENCE: f64 = 83.0;

const SAMPLES: usize = 2000;

/// Resamples the historical frequency distribution.
///
/// Builds a cumulative distribution over `[1, N]` from occurrence
/// counts, draws a fixed number of samples from the analyzer's PRNG
/// stream, and ranks numbers by how often they were sampled. A noisy
/// but bias-respecting restatement of the frequency table.
pub struct MonteCarlo {
    samples: usize,
}

impl Default for MonteCarlo {
    fn default() -> Self {
        Self { samples: SAMPLES }
    }
}

impl MonteCarlo {
    pub fn new(samples: usize) -> Self {
        Self {
            samples: samples.max(1),
        }
    }
}

impl Analyzer for MonteCarlo {
    fn name(&self) -> &str {
        "monte-carlo"
    }

    fn analyze(&self, data: &Dataset, rng: &mut Lcg) -> Result<AnalyzerResult, AnalyzerError> {
        // Cumulative counts; index n holds the count of values ≤ n.
        let mut cumulative = vec![0u32; data.scheme.max_number as usize + 1];
        let mut running = 0u32;
        for n in 1..=data.scheme.max_number as usize {
            running += data.frequency[n];
            cumulative[n] = running;
        }
        let total = running;
        if total == 0 {
            return Err(AnalyzerError::NotEnoughData(
                "empty frequency distribution".into(),
            ));
        }

        let mut tallies = vec![0u32; data.scheme.max_number as usize + 1];
        for _ in 0..self.samples {
            let point = (rng.next_f64() * total as f64) as u32;
            // First number whose cumulative count exceeds the sample point.
            let n = cumulative.partition_point(|&c| c <= point);
            tallies[n.min(data.scheme.max_number as usize)] += 1;
        }

        let scores: Vec<(u8, f64)> = data
            .all_numbers()
            .filter(|&n| tallies[n as usize] > 0)
            .map(|n| (n, tallies[n as usize] as f64))
            .collect();

        Ok(
            AnalyzerResult::from_scores(self.name(), scores, data.scheme.picks, CONFIDENCE)
                .with_detail(format!("{} samples over the frequency distribution", self.samples)),
        )
    }
}
