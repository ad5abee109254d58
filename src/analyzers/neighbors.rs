//! Nearest-neighbor (cluster) analyzer.

use super::{Analyzer, AnalyzerResult};
use crate::data::Dataset;
use crate::error::AnalyzerError;
use crate::rng::Lcg;

const CONFIDENCE: f64 = 72.0;

/// Pools the numbers that followed historically similar records.
///
/// Each record is reduced to a `(mean, spread)` feature vector. The `m`
/// past records closest to the latest one (Euclidean distance) are
/// found, and the record *following* each neighbor contributes its
/// numbers to a pool ranked by co-occurrence count.
pub struct NearestNeighbor {
    neighbors: usize,
}

impl Default for NearestNeighbor {
    fn default() -> Self {
        Self { neighbors: 5 }
    }
}

impl NearestNeighbor {
    pub fn new(neighbors: usize) -> Self {
        Self {
            neighbors: neighbors.max(1),
        }
    }
}

impl Analyzer for NearestNeighbor {
    fn name(&self) -> &str {
        "nearest-neighbor"
    }

    fn analyze(&self, data: &Dataset, _rng: &mut Lcg) -> Result<AnalyzerResult, AnalyzerError> {
        let latest = &data.features[0];
        let point = (latest.mean, latest.variance.sqrt());

        // Candidates are indices 1.. (the latest record is not its own
        // neighbor); each needs a follower at index - 1, which every
        // non-latest record has.
        let mut distances: Vec<(usize, f64)> = data.features[1..]
            .iter()
            .enumerate()
            .map(|(offset, f)| {
                let idx = offset + 1;
                let dm = f.mean - point.0;
                let ds = f.variance.sqrt() - point.1;
                (idx, (dm * dm + ds * ds).sqrt())
            })
            .collect();
        distances.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let mut pooled = vec![0u32; data.scheme.max_number as usize + 1];
        for &(idx, _) in distances.iter().take(self.neighbors) {
            for &n in &data.records[idx - 1].numbers {
                pooled[n as usize] += 1;
            }
        }

        let scores: Vec<(u8, f64)> = data
            .all_numbers()
            .filter(|&n| pooled[n as usize] > 0)
            .map(|n| (n, pooled[n as usize] as f64))
            .collect();

        Ok(
            AnalyzerResult::from_scores(self.name(), scores, data.scheme.picks, CONFIDENCE)
                .with_detail(format!(
                    "pooled followers of the {} records nearest (mean {:.1}, spread {:.1})",
                    self.neighbors, point.0, point.1
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
        let result = NearestNeighbor::default()
            .analyze(&data, &mut Lcg::new(1))
            .unwrap();
        assert_result_well_formed(&result, &data);
        assert!(!result.recommended.is_empty());
    }

    #[test]
    fn test_followers_of_similar_records_pooled() {
        let scheme = DrawScheme::default();
        let low = vec![1u8, 2, 3, 4, 5, 6]; // low mean, tight spread
        let high = vec![44u8, 45, 46, 47, 48, 49];
        let follower = vec![10u8, 20, 30, 40, 41, 42];

        // History (most recent first): low, follower, low, follower, low, ...
        // plus some high-mean noise records. Every "low" record is
        // followed (in time) by `follower`.
        let mut records = Vec::new();
        records.push(Record::new("p0", low.clone(), &scheme).unwrap());
        for i in 0..8 {
            records.push(Record::new(format!("f{i}"), follower.clone(), &scheme).unwrap());
            records.push(Record::new(format!("l{i}"), low.clone(), &scheme).unwrap());
        }
        for i in 0..4 {
            records.push(Record::new(format!("h{i}"), high.clone(), &scheme).unwrap());
        }
        let data = Dataset::prepare(records, scheme).unwrap();

        let result = NearestNeighbor::default()
            .analyze(&data, &mut Lcg::new(1))
            .unwrap();
        let mut got = result.recommended.clone();
        got.sort_unstable();
        let mut expected = follower.clone();
        expected.sort_unstable();
        assert_eq!(got, expected);
    }
}
