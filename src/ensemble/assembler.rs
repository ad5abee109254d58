//! Final result assembly.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::aggregator::Aggregate;
use super::normalizer::NormalizedLists;
use super::weights::EnsembleWeights;
use crate::analyzers::AnalyzerResult;
use crate::data::Dataset;

/// Bumped whenever the serialized layout changes shape.
pub const SCHEMA_VERSION: &str = "1";

const ALGORITHM_LABEL: &str = "weighted-ensemble";

/// Dataset-size tier reported in the output metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl DataQuality {
    pub fn from_record_count(count: usize) -> Self {
        match count {
            n if n >= 100 => Self::Excellent,
            n if n >= 50 => Self::Good,
            n if n >= 20 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        };
        f.write_str(s)
    }
}

/// The number lists handed to the caller, numerically sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Predictions {
    pub recommended: Vec<u8>,
    pub alternative: Vec<u8>,

    /// Optional explicitly-sized extension of the recommended set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<Vec<u8>>,
}

/// How the ensemble arrived at its vote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Number of historical records analyzed.
    pub periods: usize,

    /// Surviving analyzer names, in pool order.
    pub algorithms: Vec<String>,

    /// The normalized weight table the vote used.
    pub weights: BTreeMap<String, f64>,

    /// Vote concentration in `[0, 1]`.
    pub consistency: f64,
}

/// Summary statistics of the historical values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub schema_version: &'static str,
    pub algorithm: &'static str,
    pub data_quality: DataQuality,

    /// The context period label, passed through from the options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,

    /// The derived base seed, for reproducing the run.
    pub seed: u64,
}

/// The engine's one output value.
///
/// Either fully formed and invariant-satisfying, or never produced —
/// there is no partially-populated variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalPrediction {
    pub predictions: Predictions,

    /// Ensemble confidence in `[0, 95]`.
    pub confidence: f64,

    pub analysis: Analysis,
    pub statistics: Statistics,

    /// Ordered human-readable trace; template sentences first, then
    /// per-analyzer fragments.
    pub reasoning: Vec<String>,

    pub metadata: Metadata,
}

/// Packages the normalized lists and the run's context into a
/// [`FinalPrediction`]. Pure transformation.
#[allow(clippy::too_many_arguments)]
pub(crate) fn assemble(
    data: &Dataset,
    aggregate: &Aggregate,
    lists: NormalizedLists,
    survivors: &[AnalyzerResult],
    weights: &EnsembleWeights,
    seed: u64,
    period: Option<&str>,
    system_size: Option<usize>,
) -> FinalPrediction {
    let quality = DataQuality::from_record_count(data.len());

    let system = system_size.map(|m| {
        system_list(
            &lists.recommended,
            &lists.alternative,
            &aggregate.ranked,
            data.scheme.max_number,
            m.max(data.scheme.picks),
        )
    });

    let mut recommended = lists.recommended;
    let mut alternative = lists.alternative;
    recommended.sort_unstable();
    alternative.sort_unstable();

    let algorithms: Vec<String> = survivors.iter().map(|r| r.algorithm.clone()).collect();

    let mut reasoning = vec![
        format!(
            "analyzed {} historical draws (data quality: {quality})",
            data.len()
        ),
        format!(
            "combined weighted votes from {} analyzers: {}",
            survivors.len(),
            algorithms.join(", ")
        ),
        format!(
            "vote consistency {:.2}, ensemble confidence {:.1}",
            aggregate.consistency, aggregate.confidence
        ),
    ];
    for result in survivors {
        for detail in &result.details {
            reasoning.push(format!("{}: {}", result.algorithm, detail));
        }
    }

    FinalPrediction {
        predictions: Predictions {
            recommended,
            alternative,
            system,
        },
        confidence: aggregate.confidence,
        analysis: Analysis {
            periods: data.len(),
            algorithms,
            weights: weights.to_map(),
            consistency: aggregate.consistency,
        },
        statistics: Statistics {
            mean: data.mean,
            variance: data.variance,
            std_dev: data.std_dev,
        },
        reasoning,
        metadata: Metadata {
            schema_version: SCHEMA_VERSION,
            algorithm: ALGORITHM_LABEL,
            data_quality: quality,
            period: period.map(str::to_owned),
            seed,
        },
    }
}

/// An `m`-sized superset of the recommended list: recommended first,
/// then the alternatives and ranked tail, then ascending unused values.
fn system_list(
    recommended: &[u8],
    alternative: &[u8],
    ranked: &[(u8, f64)],
    max_number: u8,
    m: usize,
) -> Vec<u8> {
    let mut out: Vec<u8> = recommended.to_vec();
    let candidates = alternative
        .iter()
        .copied()
        .chain(ranked.iter().map(|&(n, _)| n))
        .chain(1..=max_number);
    for n in candidates {
        if out.len() == m {
            break;
        }
        if !out.contains(&n) {
            out.push(n);
        }
    }
    out.sort_unstable();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_quality_tiers() {
        assert_eq!(DataQuality::from_record_count(100), DataQuality::Excellent);
        assert_eq!(DataQuality::from_record_count(99), DataQuality::Good);
        assert_eq!(DataQuality::from_record_count(50), DataQuality::Good);
        assert_eq!(DataQuality::from_record_count(49), DataQuality::Fair);
        assert_eq!(DataQuality::from_record_count(20), DataQuality::Fair);
        assert_eq!(DataQuality::from_record_count(19), DataQuality::Poor);
    }

    #[test]
    fn test_system_list_extends_recommended() {
        let system = system_list(
            &[3, 9, 17, 25, 33, 41],
            &[1, 2, 4, 5, 6, 7],
            &[(3, 9.0), (44, 1.0)],
            49,
            9,
        );
        assert_eq!(system.len(), 9);
        for n in [3, 9, 17, 25, 33, 41] {
            assert!(system.contains(&n));
        }
        // 1, 2, 4 come from the alternatives before the ranked tail.
        assert_eq!(system, vec![1, 2, 3, 4, 9, 17, 25, 33, 41]);
    }

    #[test]
    fn test_system_list_is_unique() {
        let system = system_list(&[1, 2, 3, 4, 5, 6], &[1, 2, 3, 4, 5, 6], &[], 49, 12);
        let mut unique = system.clone();
        unique.dedup(); // already sorted
        assert_eq!(unique.len(), 12);
    }
}
