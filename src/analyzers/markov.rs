//! Transition-matrix (Markov) analyzer.

use super::{Analyzer, AnalyzerResult};
use crate::data::Dataset;
use crate::error::AnalyzerError;
use crate::rng::Lcg;

const CONFIDENCE: f64 = 82.0;

/// First-order transition model between consecutive records.
///
/// Builds an `N×N` count matrix — "`y` in record *i+1* was followed by
/// `x` in record *i*" — row-normalizes it into transition probabilities,
/// then scores every candidate by the summed outgoing probability from
/// the most recent record's numbers.
pub struct MarkovTransition;

impl Analyzer for MarkovTransition {
    fn name(&self) -> &str {
        "markov-transition"
    }

    fn analyze(&self, data: &Dataset, _rng: &mut Lcg) -> Result<AnalyzerResult, AnalyzerError> {
        let n = data.scheme.max_number as usize;
        let mut counts = vec![vec![0u32; n + 1]; n + 1];
        let mut row_totals = vec![0u32; n + 1];

        // records[i] follows records[i + 1] in time.
        for i in 0..data.records.len() - 1 {
            for &next in &data.records[i].numbers {
                for &prev in &data.records[i + 1].numbers {
                    counts[prev as usize][next as usize] += 1;
                    row_totals[prev as usize] += 1;
                }
            }
        }

        let latest = &data.latest().numbers;
        let scores: Vec<(u8, f64)> = data
            .all_numbers()
            .map(|candidate| {
                let score: f64 = latest
                    .iter()
                    .map(|&source| {
                        let total = row_totals[source as usize];
                        if total == 0 {
                            0.0
                        } else {
                            counts[source as usize][candidate as usize] as f64 / total as f64
                        }
                    })
                    .sum();
                (candidate, score)
            })
            .collect();

        Ok(
            AnalyzerResult::from_scores(self.name(), scores, data.scheme.picks, CONFIDENCE)
                .with_detail(format!(
                    "transition probabilities from latest record {:?}",
                    latest
                )),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::testutil::{assert_result_well_formed, synthetic_dataset};
    use crate::data::{Dataset, DrawScheme, Record};

    #[test]
    fn test_well_formed() {
        let data = synthetic_dataset(30);
        let result = MarkovTransition.analyze(&data, &mut Lcg::new(1)).unwrap();
        assert_result_well_formed(&result, &data);
        assert_eq!(result.recommended.len(), 6);
    }

    #[test]
    fn test_learns_alternating_pattern() {
        let scheme = DrawScheme::default();
        let set_a = vec![1u8, 2, 3, 4, 5, 6];
        let set_b = vec![11u8, 12, 13, 14, 15, 16];
        // Strict alternation: ... B A B A, latest = A, so B always follows A.
        let records: Vec<Record> = (0..20)
            .map(|i| {
                let numbers = if i % 2 == 0 { set_a.clone() } else { set_b.clone() };
                Record::new(format!("p{i}"), numbers, &scheme).unwrap()
            })
            .collect();
        let data = Dataset::prepare(records, scheme).unwrap();

        let result = MarkovTransition.analyze(&data, &mut Lcg::new(1)).unwrap();
        let mut got = result.recommended.clone();
        got.sort_unstable();
        assert_eq!(got, set_b, "A-records are always followed by B-records");
    }
}
