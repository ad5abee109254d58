//! The preprocessed dataset shared by all analyzers.

use std::collections::BTreeMap;

use super::record::{DrawScheme, Record};
use crate::error::PredictError;

/// Minimum history length the preprocessor accepts.
pub const MIN_RECORDS: usize = 10;

/// Derived per-record features, computed once.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFeatures {
    pub sum: u32,
    pub mean: f64,
    pub variance: f64,
    pub odd_count: usize,
    pub even_count: usize,
    /// Pairs of adjacent values when the record is sorted
    /// (e.g. `[7, 8]` counts one).
    pub consecutive_pairs: usize,
}

/// Read-only bundle of derived aggregates over a record history.
///
/// Convention throughout the engine: **index 0 is the most recent
/// record**. Created once per prediction call by
/// [`Dataset::prepare`]; analyzers only ever borrow it.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub scheme: DrawScheme,
    pub records: Vec<Record>,

    /// Occurrence count per number; index `n` holds the count of `n`
    /// (index 0 is unused).
    pub frequency: Vec<u32>,

    /// Every drawn value across all records, in record order.
    pub flattened: Vec<u8>,

    /// Mean of the flattened values.
    pub mean: f64,
    /// Population variance of the flattened values.
    pub variance: f64,
    pub std_dev: f64,

    /// Feature row per record, aligned with `records`.
    pub features: Vec<RecordFeatures>,

    /// Per axis name: label → occurrence count across all positions.
    pub axis_frequencies: BTreeMap<String, BTreeMap<String, u32>>,
}

impl Dataset {
    /// Runs the preprocessor over a record history.
    ///
    /// Pure, `O(records × picks)`. Fails when the history is shorter
    /// than [`MIN_RECORDS`] or any record violates the scheme.
    pub fn prepare(records: Vec<Record>, scheme: DrawScheme) -> Result<Self, PredictError> {
        if records.len() < MIN_RECORDS {
            return Err(PredictError::InsufficientData {
                got: records.len(),
                min: MIN_RECORDS,
            });
        }
        for record in &records {
            record.validate(&scheme)?;
        }

        let mut frequency = vec![0u32; scheme.max_number as usize + 1];
        let mut flattened = Vec::with_capacity(records.len() * scheme.picks);
        let mut features = Vec::with_capacity(records.len());
        let mut axis_frequencies: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();

        for record in &records {
            for &n in &record.numbers {
                frequency[n as usize] += 1;
                flattened.push(n);
            }
            features.push(record_features(&record.numbers));

            for axis in &record.tags {
                let per_label = axis_frequencies.entry(axis.name.clone()).or_default();
                for label in &axis.labels {
                    *per_label.entry(label.clone()).or_insert(0) += 1;
                }
            }
        }

        let (mean, variance) = mean_variance(&flattened);

        Ok(Self {
            scheme,
            records,
            frequency,
            flattened,
            mean,
            variance,
            std_dev: variance.sqrt(),
            features,
            axis_frequencies,
        })
    }

    /// Number of records in the history.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Never true: `prepare` enforces the minimum length.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record (index 0).
    pub fn latest(&self) -> &Record {
        &self.records[0]
    }

    /// Occurrence count of one number.
    pub fn count(&self, n: u8) -> u32 {
        self.frequency[n as usize]
    }

    /// How many records ago `n` was last drawn (0 = in the latest
    /// record). `None` if it never appeared.
    pub fn gap(&self, n: u8) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.numbers.contains(&n))
    }

    /// All drawable numbers, `1..=N`.
    pub fn all_numbers(&self) -> impl Iterator<Item = u8> {
        1..=self.scheme.max_number
    }
}

fn record_features(numbers: &[u8]) -> RecordFeatures {
    let sum: u32 = numbers.iter().map(|&n| n as u32).sum();
    let mean = sum as f64 / numbers.len() as f64;
    let variance = numbers
        .iter()
        .map(|&n| {
            let d = n as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / numbers.len() as f64;
    let odd_count = numbers.iter().filter(|&&n| n % 2 == 1).count();

    let mut sorted: Vec<u8> = numbers.to_vec();
    sorted.sort_unstable();
    let consecutive_pairs = sorted.windows(2).filter(|w| w[1] - w[0] == 1).count();

    RecordFeatures {
        sum,
        mean,
        variance,
        odd_count,
        even_count: numbers.len() - odd_count,
        consecutive_pairs,
    }
}

fn mean_variance(values: &[u8]) -> (f64, f64) {
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64;
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64;
    (mean, variance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_records(n: usize) -> Vec<Record> {
        let scheme = DrawScheme::default();
        (0..n)
            .map(|i| {
                let base = (i % 7) as u8;
                Record::new(
                    format!("p{i:03}"),
                    vec![
                        base + 1,
                        base + 9,
                        base + 17,
                        base + 25,
                        base + 33,
                        base + 41,
                    ],
                    &scheme,
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_minimum_length_enforced() {
        let err = Dataset::prepare(fixed_records(9), DrawScheme::default()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::PredictError::InsufficientData { got: 9, min: 10 }
        ));
        assert!(Dataset::prepare(fixed_records(10), DrawScheme::default()).is_ok());
    }

    #[test]
    fn test_frequency_and_flattened() {
        let data = Dataset::prepare(fixed_records(14), DrawScheme::default()).unwrap();
        assert_eq!(data.flattened.len(), 14 * 6);
        assert_eq!(
            data.frequency.iter().sum::<u32>(),
            (14 * 6) as u32
        );
        // base cycles 0..7 over 14 records, so number 1 (base 0) appears twice.
        assert_eq!(data.count(1), 2);
    }

    #[test]
    fn test_record_features() {
        let f = record_features(&[7, 8, 10, 20, 31, 44]);
        assert_eq!(f.sum, 120);
        assert!((f.mean - 20.0).abs() < 1e-10);
        assert_eq!(f.odd_count, 2); // 7, 31
        assert_eq!(f.even_count, 4);
        assert_eq!(f.consecutive_pairs, 1); // 7-8
    }

    #[test]
    fn test_gap() {
        let data = Dataset::prepare(fixed_records(10), DrawScheme::default()).unwrap();
        // records[0] has base 0 → contains 1, 9, 17, ...
        assert_eq!(data.gap(1), Some(0));
        // base 1 is at index 1
        assert_eq!(data.gap(2), Some(1));
        // 49 never appears (max base 6 → max value 47)
        assert_eq!(data.gap(49), None);
    }

    #[test]
    fn test_summary_statistics_match_direct_computation() {
        let data = Dataset::prepare(fixed_records(10), DrawScheme::default()).unwrap();
        let values: Vec<f64> = data.flattened.iter().map(|&v| v as f64).collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        assert!((data.mean - mean).abs() < 1e-10);
        assert!((data.std_dev * data.std_dev - data.variance).abs() < 1e-10);
    }

    #[test]
    fn test_axis_frequencies() {
        let scheme = DrawScheme::default();
        let mut records = fixed_records(10);
        records[0] = Record::new("tagged", vec![1, 2, 3, 4, 5, 6], &scheme)
            .unwrap()
            .with_axis(
                "color",
                vec![
                    "red".into(),
                    "red".into(),
                    "blue".into(),
                    "blue".into(),
                    "blue".into(),
                    "green".into(),
                ],
            )
            .unwrap();

        let data = Dataset::prepare(records, scheme).unwrap();
        let colors = &data.axis_frequencies["color"];
        assert_eq!(colors["red"], 2);
        assert_eq!(colors["blue"], 3);
        assert_eq!(colors["green"], 1);
    }

    #[test]
    fn test_invalid_record_rejected_by_prepare() {
        let scheme = DrawScheme::default();
        let mut records = fixed_records(10);
        records[3].numbers[0] = records[3].numbers[1]; // force a duplicate
        assert!(Dataset::prepare(records, scheme).is_err());
    }
}
