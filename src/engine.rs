//! The prediction engine: fan-out over the pool, fan-in through the
//! ensemble pipeline.

use std::panic::{catch_unwind, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::analyzers::{Analyzer, AnalyzerPool, AnalyzerResult};
use crate::data::{Dataset, DrawScheme, Record};
use crate::ensemble::{self, EnsembleWeights, FinalPrediction};
use crate::error::{AnalyzerError, PredictError};
use crate::rng::{derive_seed, Lcg};

/// Per-call options.
///
/// All fields are optional; `Default` gives a plain prediction keyed to
/// the latest record's period.
#[derive(Debug, Clone, Default)]
pub struct PredictOptions {
    /// Diversifies the seed so different sub-domains diverge; otherwise
    /// informational.
    pub domain_tag: Option<String>,

    /// Context period label. Overrides the latest record's period for
    /// seed derivation and is echoed in the output metadata.
    pub period: Option<String>,

    /// When `Some(m)` with `m ≥ picks`, the output also carries a
    /// `system` list of `m` unique numbers extending the recommended
    /// set.
    pub system_size: Option<usize>,
}

impl PredictOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain_tag(mut self, tag: impl Into<String>) -> Self {
        self.domain_tag = Some(tag.into());
        self
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn with_system_size(mut self, size: usize) -> Self {
        self.system_size = Some(size);
        self
    }
}

/// Orchestrates one prediction run end to end.
///
/// Construction is builder-style; the engine itself is immutable and
/// reusable across calls.
///
/// # Examples
///
/// ```no_run
/// use drawcast::engine::{PredictionEngine, PredictOptions};
/// use drawcast::data::Record;
///
/// # fn records() -> Vec<Record> { unimplemented!() }
/// let engine = PredictionEngine::new();
/// let prediction = engine.predict(&records(), &PredictOptions::new())?;
/// assert_eq!(prediction.predictions.recommended.len(), 6);
/// # Ok::<(), drawcast::error::PredictError>(())
/// ```
pub struct PredictionEngine {
    scheme: DrawScheme,
    pool: AnalyzerPool,
    weights: EnsembleWeights,
    /// Whether to fan analyzers out across threads with rayon.
    parallel: bool,
    /// Fixed seed override; `None` derives one from the period id.
    seed: Option<u64>,
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionEngine {
    /// Standard pool, uniform weights, parallel fan-out.
    pub fn new() -> Self {
        Self {
            scheme: DrawScheme::default(),
            pool: AnalyzerPool::standard(),
            weights: EnsembleWeights::new(),
            parallel: true,
            seed: None,
        }
    }

    pub fn with_scheme(mut self, scheme: DrawScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_pool(mut self, pool: AnalyzerPool) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_weights(mut self, weights: EnsembleWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Enables or disables the parallel fan-out. Output is identical
    /// either way; analyzer streams are forked from the base seed, not
    /// from execution order.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Pins the base seed instead of deriving it from the period id.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Runs the full pipeline over a record history.
    ///
    /// Either returns a fully-formed, invariant-satisfying
    /// [`FinalPrediction`] or one typed error; analyzer failures are
    /// recovered by exclusion and only escalate when no analyzer
    /// survives.
    pub fn predict(
        &self,
        records: &[Record],
        options: &PredictOptions,
    ) -> Result<FinalPrediction, PredictError> {
        if self.pool.is_empty() {
            return Err(PredictError::Config("analyzer pool is empty".into()));
        }
        self.weights
            .validate()
            .map_err(PredictError::Config)?;
        if let Some(m) = options.system_size {
            if m < self.scheme.picks {
                return Err(PredictError::Config(format!(
                    "system size {m} is below the pick count {}",
                    self.scheme.picks
                )));
            }
        }

        let data = Dataset::prepare(records.to_vec(), self.scheme)?;

        let period = options
            .period
            .as_deref()
            .unwrap_or(&data.latest().period)
            .to_owned();
        let seed = self
            .seed
            .unwrap_or_else(|| derive_seed(&period, options.domain_tag.as_deref()));
        let base = Lcg::new(seed);
        debug!(seed, period = %period, "prediction run started");

        // Fan-out: every analyzer gets its own sub-stream forked from
        // the base seed, so scheduling order cannot affect output.
        let outcomes: Vec<(String, Result<AnalyzerResult, AnalyzerError>)> =
            if self.parallel {
                self.pool
                    .as_slice()
                    .par_iter()
                    .map(|analyzer| run_one(analyzer.as_ref(), &data, &base))
                    .collect()
            } else {
                self.pool
                    .as_slice()
                    .iter()
                    .map(|analyzer| run_one(analyzer.as_ref(), &data, &base))
                    .collect()
            };

        // Fan-in: settle-all, keep the successes, log the rest.
        let mut survivors = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (name, outcome) in outcomes {
            match outcome {
                Ok(result) => survivors.push(result),
                Err(err) => {
                    warn!(analyzer = %name, %err, "analyzer excluded");
                    failures.push(format!("{name}: {err}"));
                }
            }
        }
        if survivors.is_empty() {
            return Err(PredictError::AllAnalyzersFailed {
                count: failures.len(),
                failures,
            });
        }

        let weights = self.weights.normalized();
        let aggregate = ensemble::aggregate(&survivors, &weights, &self.scheme);
        let lists = ensemble::normalize(&aggregate, &self.scheme);

        Ok(ensemble::assemble(
            &data,
            &aggregate,
            lists,
            &survivors,
            &weights,
            seed,
            Some(period.as_str()),
            options.system_size,
        ))
    }
}

/// Runs one analyzer with panic containment.
fn run_one(
    analyzer: &dyn Analyzer,
    data: &Dataset,
    base: &Lcg,
) -> (String, Result<AnalyzerResult, AnalyzerError>) {
    let name = analyzer.name().to_owned();
    let mut rng = base.fork(&name);
    let outcome = catch_unwind(AssertUnwindSafe(|| analyzer.analyze(data, &mut rng)))
        .unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_owned());
            Err(AnalyzerError::Panicked(message))
        });
    (name, outcome)
}
