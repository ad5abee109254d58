//! Draw records and the domain scheme they must satisfy.

use crate::error::PredictError;
use serde::{Deserialize, Serialize};

/// The `(k, N)` domain of a draw: how many numbers per record, and the
/// inclusive upper bound of the value range `[1, N]`.
///
/// # Defaults
///
/// ```
/// use drawcast::data::DrawScheme;
///
/// let scheme = DrawScheme::default();
/// assert_eq!(scheme.picks, 6);
/// assert_eq!(scheme.max_number, 49);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawScheme {
    /// Numbers drawn per record (`k`).
    pub picks: usize,

    /// Largest drawable number (`N`); values live in `[1, N]`.
    pub max_number: u8,
}

impl Default for DrawScheme {
    fn default() -> Self {
        Self {
            picks: 6,
            max_number: 49,
        }
    }
}

impl DrawScheme {
    /// Creates a scheme, checking that `2·k ≤ N` so that a recommended
    /// and a disjoint alternative list can both exist.
    pub fn new(picks: usize, max_number: u8) -> Result<Self, PredictError> {
        if picks == 0 {
            return Err(PredictError::Config("picks must be at least 1".into()));
        }
        if (picks * 2) > max_number as usize {
            return Err(PredictError::Config(format!(
                "range [1, {max_number}] too small for two disjoint lists of {picks}"
            )));
        }
        Ok(Self { picks, max_number })
    }
}

/// One categorical classification axis over a record's positions.
///
/// Labels are aligned by position: `labels[i]` classifies `numbers[i]`.
/// A record may carry several independent axes (e.g. a color class and
/// a cyclical label).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAxis {
    pub name: String,
    pub labels: Vec<String>,
}

/// One historical draw: period id, drawn numbers, optional tag axes,
/// optional timestamp. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Period label; opaque but sortable (e.g. `"2024088"`).
    pub period: String,

    /// The drawn numbers, exactly `scheme.picks` of them, unique,
    /// each in `[1, scheme.max_number]`. Draw order is preserved.
    pub numbers: Vec<u8>,

    /// Independent categorical axes aligned with `numbers`.
    #[serde(default)]
    pub tags: Vec<TagAxis>,

    /// Unix timestamp of the draw, when known.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl Record {
    /// Creates a validated record.
    pub fn new(
        period: impl Into<String>,
        numbers: Vec<u8>,
        scheme: &DrawScheme,
    ) -> Result<Self, PredictError> {
        let period = period.into();
        validate_numbers(&period, &numbers, scheme)?;
        Ok(Self {
            period,
            numbers,
            tags: Vec::new(),
            timestamp: None,
        })
    }

    /// Attaches a categorical axis; label count must match the numbers.
    pub fn with_axis(
        mut self,
        name: impl Into<String>,
        labels: Vec<String>,
    ) -> Result<Self, PredictError> {
        if labels.len() != self.numbers.len() {
            return Err(PredictError::InvalidRecord {
                period: self.period.clone(),
                reason: format!(
                    "axis has {} labels for {} numbers",
                    labels.len(),
                    self.numbers.len()
                ),
            });
        }
        self.tags.push(TagAxis {
            name: name.into(),
            labels,
        });
        Ok(self)
    }

    /// Sets the draw timestamp.
    pub fn with_timestamp(mut self, ts: i64) -> Self {
        self.timestamp = Some(ts);
        self
    }

    /// Returns the labels of a named axis, if the record carries it.
    pub fn axis(&self, name: &str) -> Option<&[String]> {
        self.tags
            .iter()
            .find(|axis| axis.name == name)
            .map(|axis| axis.labels.as_slice())
    }

    /// Re-checks this record against a scheme. Used by the preprocessor
    /// so that deserialized records get the same guarantees as ones
    /// built through [`Record::new`].
    pub(crate) fn validate(&self, scheme: &DrawScheme) -> Result<(), PredictError> {
        validate_numbers(&self.period, &self.numbers, scheme)
    }
}

fn validate_numbers(period: &str, numbers: &[u8], scheme: &DrawScheme) -> Result<(), PredictError> {
    let invalid = |reason: String| PredictError::InvalidRecord {
        period: period.to_owned(),
        reason,
    };

    if numbers.len() != scheme.picks {
        return Err(invalid(format!(
            "expected {} numbers, got {}",
            scheme.picks,
            numbers.len()
        )));
    }
    for &n in numbers {
        if n < 1 || n > scheme.max_number {
            return Err(invalid(format!(
                "{n} outside [1, {}]",
                scheme.max_number
            )));
        }
    }
    let mut seen = vec![false; scheme.max_number as usize + 1];
    for &n in numbers {
        if seen[n as usize] {
            return Err(invalid(format!("duplicate value {n}")));
        }
        seen[n as usize] = true;
    }
    Ok(())
}
