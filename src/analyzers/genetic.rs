//! Genetic / iterative-refinement analyzer.
//!
//! A compact evolutionary loop over candidate number sets:
//! initialization → evaluation → elite survival → recombination →
//! mutation, for a fixed number of generations. All loop bounds are
//! constants, so total work is hard-bounded, and every random draw
//! comes from the analyzer's own [`Lcg`] stream.

use rand::Rng;

use super::{Analyzer, AnalyzerResult};
use crate::data::Dataset;
use crate::error::AnalyzerError;
use crate::rng::Lcg;

const CONFIDENCE: f64 = 88.0;

const POPULATION: usize = 16;
const GENERATIONS: usize = 30;
const MUTATION_RATE: f64 = 0.25;

/// Evolves `k`-sized candidate sets toward high historical frequency
/// with a balanced parity/magnitude split.
///
/// Fitness rewards the summed occurrence count of members and penalizes
/// deviation from an even odd/even and low/high split. Recombination is
/// a deterministic split-and-merge (first half of one parent, filled
/// from the other); mutation swaps one slot for a random unused number.
pub struct GeneticRefine {
    generations: usize,
}

impl Default for GeneticRefine {
    fn default() -> Self {
        Self {
            generations: GENERATIONS,
        }
    }
}

impl GeneticRefine {
    pub fn new(generations: usize) -> Self {
        Self {
            generations: generations.max(1),
        }
    }
}

#[derive(Clone)]
struct Individual {
    numbers: Vec<u8>,
    fitness: f64,
}

impl Analyzer for GeneticRefine {
    fn name(&self) -> &str {
        "genetic-refine"
    }

    fn analyze(&self, data: &Dataset, rng: &mut Lcg) -> Result<AnalyzerResult, AnalyzerError> {
        let picks = data.scheme.picks;

        // 1. Initialize population with random k-subsets.
        let mut population: Vec<Individual> = (0..POPULATION)
            .map(|_| {
                let mut candidates: Vec<u8> = data.all_numbers().collect();
                rng.shuffle(&mut candidates);
                let mut numbers = candidates[..picks].to_vec();
                numbers.sort_unstable();
                Individual {
                    numbers,
                    fitness: f64::NEG_INFINITY,
                }
            })
            .collect();

        for ind in &mut population {
            ind.fitness = fitness(&ind.numbers, data);
        }

        // 2. Fixed-generation refinement loop.
        for _ in 0..self.generations {
            population.sort_by(|a, b| {
                b.fitness
                    .partial_cmp(&a.fitness)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.numbers.cmp(&b.numbers))
            });

            // Keep the fitter half, rebuild the rest from pairs.
            let elite = POPULATION / 2;
            let mut next_gen: Vec<Individual> = population[..elite].to_vec();

            let mut pair = 0usize;
            while next_gen.len() < POPULATION {
                let p1 = &population[pair % elite];
                let p2 = &population[(pair + 1) % elite];
                pair += 1;

                let mut child = crossover(&p1.numbers, &p2.numbers, picks, data);
                if rng.next_f64() < MUTATION_RATE {
                    mutate(&mut child, data, rng);
                }
                child.sort_unstable();
                let f = fitness(&child, data);
                next_gen.push(Individual {
                    numbers: child,
                    fitness: f,
                });
            }
            population = next_gen;
        }

        population.sort_by(|a, b| {
            b.fitness
                .partial_cmp(&a.fitness)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.numbers.cmp(&b.numbers))
        });

        let recommended = population[0].numbers.clone();
        let alternative: Vec<u8> = population[1..]
            .iter()
            .flat_map(|ind| ind.numbers.iter().copied())
            .filter(|n| !recommended.contains(n))
            .scan(Vec::new(), |seen: &mut Vec<u8>, n| {
                if seen.contains(&n) {
                    Some(None)
                } else {
                    seen.push(n);
                    Some(Some(n))
                }
            })
            .flatten()
            .take(picks)
            .collect();

        Ok(AnalyzerResult {
            algorithm: self.name().to_owned(),
            recommended,
            alternative,
            confidence: CONFIDENCE,
            details: vec![format!(
                "fittest of {POPULATION} individuals after {} generations (fitness {:.1})",
                self.generations, population[0].fitness
            )],
        })
    }
}

/// Summed member frequency minus balance penalties.
fn fitness(numbers: &[u8], data: &Dataset) -> f64 {
    let frequency_sum: f64 = numbers.iter().map(|&n| data.count(n) as f64).sum();

    let half = numbers.len() as f64 / 2.0;
    let odd = numbers.iter().filter(|&&n| n % 2 == 1).count() as f64;
    let parity_penalty = (odd - half).abs();

    let midpoint = data.scheme.max_number / 2;
    let high = numbers.iter().filter(|&&n| n > midpoint).count() as f64;
    let magnitude_penalty = (high - half).abs();

    frequency_sum - 2.0 * (parity_penalty + magnitude_penalty)
}

/// Deterministic split-and-merge: first half of `a`, filled from `b`,
/// topped up from the full range when the parents overlap too much.
fn crossover(a: &[u8], b: &[u8], picks: usize, data: &Dataset) -> Vec<u8> {
    let mut child: Vec<u8> = a[..picks / 2].to_vec();
    for &n in b {
        if child.len() == picks {
            break;
        }
        if !child.contains(&n) {
            child.push(n);
        }
    }
    for n in data.all_numbers() {
        if child.len() == picks {
            break;
        }
        if !child.contains(&n) {
            child.push(n);
        }
    }
    child
}

/// Replaces one random slot with a random unused number.
fn mutate(numbers: &mut [u8], data: &Dataset, rng: &mut Lcg) {
    let slot = rng.random_range(0..numbers.len());
    for _ in 0..16 {
        let candidate = rng.next_in(1, data.scheme.max_number);
        if !numbers.contains(&candidate) {
            numbers[slot] = candidate;
            return;
        }
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
        let result = GeneticRefine::default()
            .analyze(&data, &mut Lcg::new(7))
            .unwrap();
        assert_result_well_formed(&result, &data);
        assert_eq!(result.recommended.len(), 6);
    }

    #[test]
    fn test_deterministic_for_equal_seeds() {
        let data = synthetic_dataset(30);
        let a = GeneticRefine::default()
            .analyze(&data, &mut Lcg::new(7))
            .unwrap();
        let b = GeneticRefine::default()
            .analyze(&data, &mut Lcg::new(7))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_converges_toward_frequent_numbers() {
        let scheme = DrawScheme::default();
        // Six numbers with a balanced odd/even and low/high split
        // dominate the history; the optimizer should find most of them.
        let strong = vec![3u8, 8, 11, 30, 41, 46];
        let records: Vec<Record> = (0..30)
            .map(|i| {
                let numbers = if i % 5 == 0 {
                    vec![2, 9, 17, 25, 33, 49]
                } else {
                    strong.clone()
                };
                Record::new(format!("p{i}"), numbers, &scheme).unwrap()
            })
            .collect();
        let data = Dataset::prepare(records, scheme).unwrap();

        let result = GeneticRefine::default()
            .analyze(&data, &mut Lcg::new(42))
            .unwrap();
        let overlap = result
            .recommended
            .iter()
            .filter(|n| strong.contains(n))
            .count();
        assert!(overlap >= 3, "expected convergence, overlap {overlap}");
    }

    #[test]
    fn test_crossover_preserves_uniqueness_and_size() {
        let data = synthetic_dataset(10);
        let child = crossover(
            &[1, 2, 3, 4, 5, 6],
            &[4, 5, 6, 7, 8, 9],
            6,
            &data,
        );
        assert_eq!(child.len(), 6);
        let mut unique = child.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_fitness_penalizes_imbalance() {
        let data = synthetic_dataset(20);
        let freq_sum = |set: &[u8]| set.iter().map(|&n| data.count(n) as f64).sum::<f64>();

        // 3 odd / 3 even, 3 low / 3 high → zero penalty.
        let balanced = [2u8, 9, 17, 26, 33, 48];
        // all odd, all low → maximal penalty.
        let skewed = [1u8, 3, 5, 7, 9, 11];

        assert!((fitness(&balanced, &data) - freq_sum(&balanced)).abs() < 1e-10);
        assert!(
            (fitness(&skewed, &data) - freq_sum(&skewed) + 12.0).abs() < 1e-10,
            "expected −2·(3+3) penalty"
        );
    }
}
