//! Frequency-rank analyzer.

use super::{Analyzer, AnalyzerResult};
use crate::data::Dataset;
use crate::error::AnalyzerError;
use crate::rng::Lcg;

const CONFIDENCE: f64 = 78.0;

/// Ranks numbers by closeness to the mean occurrence count.
///
/// Both over-represented (hot) and under-represented (cold) numbers are
/// pushed down: the preference is for the mid-frequency band, where the
/// historical signal is least likely to be a streak artifact.
pub struct FrequencyRank;

impl Analyzer for FrequencyRank {
    fn name(&self) -> &str {
        "frequency-rank"
    }

    fn analyze(&self, data: &Dataset, _rng: &mut Lcg) -> Result<AnalyzerResult, AnalyzerError> {
        let expected = data.flattened.len() as f64 / data.scheme.max_number as f64;

        let scores: Vec<(u8, f64)> = data
            .all_numbers()
            .map(|n| (n, -(data.count(n) as f64 - expected).abs()))
            .collect();

        Ok(
            AnalyzerResult::from_scores(self.name(), scores, data.scheme.picks, CONFIDENCE)
                .with_detail(format!(
                    "mid-band preference around {expected:.1} occurrences per number"
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
    fn test_well_formed_on_synthetic_data() {
        let data = synthetic_dataset(40);
        let result = FrequencyRank
            .analyze(&data, &mut Lcg::new(1))
            .unwrap();
        assert_result_well_formed(&result, &data);
        assert_eq!(result.recommended.len(), 6);
        assert_eq!(result.confidence, CONFIDENCE);
    }

    #[test]
    fn test_extremes_are_demoted() {
        let scheme = DrawScheme::default();
        // Number 1 appears in every record (hot); 49 never (cold);
        // 40..45 appear in roughly half the records (mid band).
        let records: Vec<Record> = (0..20)
            .map(|i| {
                let numbers = if i % 2 == 0 {
                    vec![1, 40, 41, 42, 43, 44]
                } else {
                    vec![1, 10, 15, 20, 25, 30]
                };
                Record::new(format!("p{i}"), numbers, &scheme).unwrap()
            })
            .collect();
        let data = Dataset::prepare(records, scheme).unwrap();

        let result = FrequencyRank.analyze(&data, &mut Lcg::new(1)).unwrap();
        assert!(!result.recommended.contains(&1), "hot number kept");
        assert!(!result.recommended.contains(&49), "cold number kept");
    }
}
