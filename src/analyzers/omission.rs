//! Omission / mean-reversion analyzer.

use super::{Analyzer, AnalyzerResult};
use crate::data::Dataset;
use crate::error::AnalyzerError;
use crate::rng::Lcg;

const CONFIDENCE: f64 = 76.0;

/// Tiered scoring over each number's gap-since-last-seen.
///
/// Three signals, in dominance order:
/// 1. hot streak — the number appeared in the last two records;
/// 2. overdue — the current gap has exceeded the number's historical
///    average gap;
/// 3. near-due — the gap is approaching the average (≥ 80% of it).
///
/// The hot-streak bonus dominates, the due bonuses are secondary, and a
/// small fraction of the gap ratio orders numbers within a tier.
pub struct OmissionReversion;

const HOT_BONUS: f64 = 10.0;
const OVERDUE_BONUS: f64 = 5.0;
const NEAR_DUE_BONUS: f64 = 2.5;

impl Analyzer for OmissionReversion {
    fn name(&self) -> &str {
        "omission-reversion"
    }

    fn analyze(&self, data: &Dataset, _rng: &mut Lcg) -> Result<AnalyzerResult, AnalyzerError> {
        let scores: Vec<(u8, f64)> = data
            .all_numbers()
            .map(|n| {
                let count = data.count(n);
                if count == 0 {
                    // Never drawn: no gap statistics to revert to.
                    return (n, 0.0);
                }
                let gap = data.gap(n).unwrap_or(data.len()) as f64;
                let avg_gap = data.len() as f64 / count as f64;
                let ratio = gap / avg_gap;

                let mut score = ratio * 0.1;
                if gap <= 1.0 {
                    score += HOT_BONUS;
                } else if ratio >= 1.0 {
                    score += OVERDUE_BONUS;
                } else if ratio >= 0.8 {
                    score += NEAR_DUE_BONUS;
                }
                (n, score)
            })
            .collect();

        Ok(
            AnalyzerResult::from_scores(self.name(), scores, data.scheme.picks, CONFIDENCE)
                .with_detail("tiered gap scoring: hot streak over overdue over near-due"),
        )
    }
}
