//! Categorical-attribute analyzer (one instance per tag axis).

use std::collections::BTreeMap;

use super::{rank, Analyzer, AnalyzerResult};
use crate::data::Dataset;
use crate::error::AnalyzerError;
use crate::rng::Lcg;

const CONFIDENCE: f64 = 68.0;

/// Representatives taken per class before moving to the next class.
const REPRESENTATIVES_PER_CLASS: usize = 4;

/// Scores numbers through one categorical tag axis.
///
/// Determines the axis's dominant class by label frequency, maps every
/// class to its representative numbers (the numbers most often drawn at
/// positions carrying that label), and merges dominant-class then
/// secondary-class representatives until `k` numbers are collected.
///
/// Fails with [`AnalyzerError::MissingAxis`] when the dataset carries
/// no axis of this name — a recoverable failure the engine excludes.
pub struct Categorical {
    axis: String,
    name: String,
}

impl Categorical {
    pub fn new(axis: impl Into<String>) -> Self {
        let axis = axis.into();
        let name = format!("categorical-{axis}");
        Self { axis, name }
    }
}

impl Analyzer for Categorical {
    fn name(&self) -> &str {
        &self.name
    }

    fn analyze(&self, data: &Dataset, _rng: &mut Lcg) -> Result<AnalyzerResult, AnalyzerError> {
        let class_frequency = data
            .axis_frequencies
            .get(&self.axis)
            .ok_or_else(|| AnalyzerError::MissingAxis(self.axis.clone()))?;

        // label → (number → co-occurrence count at tagged positions)
        let mut by_class: BTreeMap<&str, Vec<(u8, f64)>> = BTreeMap::new();
        {
            let mut counts: BTreeMap<(&str, u8), u32> = BTreeMap::new();
            for record in &data.records {
                if let Some(labels) = record.axis(&self.axis) {
                    for (label, &n) in labels.iter().zip(&record.numbers) {
                        *counts.entry((label.as_str(), n)).or_insert(0) += 1;
                    }
                }
            }
            for ((label, n), count) in counts {
                by_class.entry(label).or_default().push((n, count as f64));
            }
        }

        // Classes ordered dominant-first; ties by label for determinism.
        let mut classes: Vec<(&str, u32)> = class_frequency
            .iter()
            .map(|(label, &count)| (label.as_str(), count))
            .collect();
        classes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let picks = data.scheme.picks;
        let mut merged: Vec<u8> = Vec::new();
        for &(label, _) in &classes {
            if merged.len() >= picks * 2 {
                break;
            }
            let representatives = rank(by_class.remove(label).unwrap_or_default());
            for &(n, _) in representatives.iter().take(REPRESENTATIVES_PER_CLASS) {
                if !merged.contains(&n) {
                    merged.push(n);
                }
            }
        }

        let recommended: Vec<u8> = merged.iter().copied().take(picks).collect();
        let alternative: Vec<u8> = merged.iter().copied().skip(picks).take(picks).collect();
        let dominant = classes.first().map(|&(label, _)| label).unwrap_or("-");

        Ok(AnalyzerResult {
            algorithm: self.name.clone(),
            recommended,
            alternative,
            confidence: CONFIDENCE,
            details: vec![format!(
                "axis {:?}: dominant class {:?} of {}",
                self.axis,
                dominant,
                classes.len()
            )],
        })
    }
}
