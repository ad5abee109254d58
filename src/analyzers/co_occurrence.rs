//! Co-occurrence / association analyzer.

use super::{rank, Analyzer, AnalyzerResult};
use crate::data::Dataset;
use crate::error::AnalyzerError;
use crate::rng::Lcg;

const CONFIDENCE: f64 = 70.0;
const FALLBACK_CONFIDENCE: f64 = 65.0;

/// Minimum shared numbers for a past record to count as a match.
const MIN_OVERLAP: usize = 2;

/// Pools the numbers that followed past records similar to the latest.
///
/// Finds every past record sharing at least two numbers with the latest
/// one, weights it by overlap size, and accumulates that weight onto
/// each number of the record that *followed* the match. When no past
/// record overlaps enough, falls back to a fixed frequency-ordered
/// default at reduced confidence.
pub struct CoOccurrence;

impl Analyzer for CoOccurrence {
    fn name(&self) -> &str {
        "co-occurrence"
    }

    fn analyze(&self, data: &Dataset, _rng: &mut Lcg) -> Result<AnalyzerResult, AnalyzerError> {
        let latest = &data.latest().numbers;
        let mut weights = vec![0.0f64; data.scheme.max_number as usize + 1];
        let mut matches = 0usize;

        for idx in 1..data.records.len() {
            let overlap = data.records[idx]
                .numbers
                .iter()
                .filter(|n| latest.contains(n))
                .count();
            if overlap < MIN_OVERLAP {
                continue;
            }
            matches += 1;
            // records[idx - 1] is the record that followed records[idx].
            for &n in &data.records[idx - 1].numbers {
                weights[n as usize] += overlap as f64;
            }
        }

        if matches == 0 {
            // Fixed default: frequency order, clearly marked low-trust.
            let scores: Vec<(u8, f64)> = data
                .all_numbers()
                .map(|n| (n, data.count(n) as f64))
                .collect();
            return Ok(AnalyzerResult::from_scores(
                self.name(),
                scores,
                data.scheme.picks,
                FALLBACK_CONFIDENCE,
            )
            .with_detail("no past record overlaps the latest; frequency fallback"));
        }

        let scores: Vec<(u8, f64)> = data
            .all_numbers()
            .filter(|&n| weights[n as usize] > 0.0)
            .map(|n| (n, weights[n as usize]))
            .collect();

        Ok(
            AnalyzerResult::from_scores(self.name(), rank(scores), data.scheme.picks, CONFIDENCE)
                .with_detail(format!("{matches} overlapping past records pooled")),
        )
    }
}
