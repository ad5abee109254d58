//! Bayesian posterior analyzer.

use super::{Analyzer, AnalyzerResult};
use crate::data::Dataset;
use crate::error::AnalyzerError;
use crate::rng::Lcg;

const CONFIDENCE: f64 = 85.0;

/// Posterior ∝ prior × likelihood per number.
///
/// Prior: long-run frequency over all slots. Likelihood: frequency in a
/// short recent window with Laplace (+1) smoothing, so recent absence
/// never zeroes a posterior outright.
pub struct BayesPosterior {
    /// Recent-window length in records.
    window: usize,
}

impl Default for BayesPosterior {
    fn default() -> Self {
        Self { window: 15 }
    }
}

impl BayesPosterior {
    pub fn new(window: usize) -> Self {
        Self { window: window.max(1) }
    }
}

impl Analyzer for BayesPosterior {
    fn name(&self) -> &str {
        "bayes-posterior"
    }

    fn analyze(&self, data: &Dataset, _rng: &mut Lcg) -> Result<AnalyzerResult, AnalyzerError> {
        let window = self.window.min(data.len());
        let total_slots = data.flattened.len() as f64;
        let window_slots = (window * data.scheme.picks) as f64;
        let range = data.scheme.max_number as f64;

        let mut recent = vec![0u32; data.scheme.max_number as usize + 1];
        for record in &data.records[..window] {
            for &n in &record.numbers {
                recent[n as usize] += 1;
            }
        }

        let scores: Vec<(u8, f64)> = data
            .all_numbers()
            .map(|n| {
                let prior = data.count(n) as f64 / total_slots;
                let likelihood = (recent[n as usize] as f64 + 1.0) / (window_slots + range);
                (n, prior * likelihood)
            })
            .collect();

        Ok(
            AnalyzerResult::from_scores(self.name(), scores, data.scheme.picks, CONFIDENCE)
                .with_detail(format!(
                    "posterior over a {window}-record window with Laplace smoothing"
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
        let result = BayesPosterior::default()
            .analyze(&data, &mut Lcg::new(1))
            .unwrap();
        assert_result_well_formed(&result, &data);
        assert_eq!(result.recommended.len(), 6);
    }

    #[test]
    fn test_recent_and_frequent_wins() {
        let scheme = DrawScheme::default();
        // 9 is everywhere; 40 only in old records, outside the window.
        let records: Vec<Record> = (0..20)
            .map(|i| {
                let numbers = if i < 15 {
                    vec![9, 18, 27, 36, 45, 3]
                } else {
                    vec![9, 40, 41, 42, 43, 44]
                };
                Record::new(format!("p{i}"), numbers, &scheme).unwrap()
            })
            .collect();
        let data = Dataset::prepare(records, scheme).unwrap();

        let result = BayesPosterior::default()
            .analyze(&data, &mut Lcg::new(1))
            .unwrap();
        assert_eq!(result.recommended[0], 9);
        assert!(!result.recommended.contains(&40));
    }

    #[test]
    fn test_window_clamped_to_history() {
        let data = synthetic_dataset(10);
        // Window larger than the history must not panic.
        let result = BayesPosterior::new(50)
            .analyze(&data, &mut Lcg::new(1))
            .unwrap();
        assert_eq!(result.recommended.len(), 6);
    }
}
