//! Historical records and the preprocessed dataset.
//!
//! [`Record`] is one historical draw as produced by an external data
//! source; [`Dataset`] is the read-only bundle of derived features every
//! analyzer consumes. Preprocessing happens exactly once per prediction
//! call, before the analyzer fan-out begins.

mod dataset;
mod record;

pub use dataset::{Dataset, RecordFeatures, MIN_RECORDS};
pub use record::{DrawScheme, Record, TagAxis};
