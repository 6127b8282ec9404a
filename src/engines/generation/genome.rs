//! Genome representation for the evolutionary engine
//!
//! A genome is a fixed-length sequence of integers ("alleles"), each drawn from
//! `[0, range)`. The engine never interprets alleles itself; an
//! `EvolutionEnvironment` decodes them into a mapping and then a phenome.
//!
//! Genomes are immutable values. The genetic operators below always return new
//! genomes and leave their inputs untouched.
//!
//! # Example
//!
//! ```
//! use evopool::engines::generation::Genome;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let genome = Genome::generate(8, 4, &mut rng).unwrap();
//! assert_eq!(genome.len(), 8);
//! assert!(genome.alleles().iter().all(|&a| a < 4));
//! // indexing wraps around the genome length
//! assert_eq!(genome[9], genome[1]);
//! ```

use crate::error::{EvolutionError, Result};
use rand::Rng;
use std::ops::Index;

/// Allele range used when an environment does not declare its own.
pub const DEFAULT_ALLELE_RANGE: u32 = 384;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Genome {
    alleles: Vec<u32>,
    range: u32,
}

impl Genome {
    /// Builds a genome from explicit alleles. Values are reduced modulo `range`
    /// so the range invariant always holds. A `range` of 0 keeps the alleles
    /// as given; such a genome has nothing to redraw from and never mutates.
    pub fn from_alleles(alleles: Vec<u32>, range: u32) -> Self {
        let alleles = if range == 0 {
            alleles
        } else {
            alleles.into_iter().map(|a| a % range).collect()
        };
        Self { alleles, range }
    }

    /// Generate a random genome of `size` alleles drawn uniformly from `[0, limit)`.
    pub fn generate<R: Rng>(size: usize, limit: u32, rng: &mut R) -> Result<Self> {
        if limit == 0 {
            return Err(EvolutionError::Configuration(
                "Allele range must be at least 1".to_string(),
            ));
        }
        let alleles = (0..size).map(|_| rng.gen_range(0..limit)).collect();
        Ok(Self {
            alleles,
            range: limit,
        })
    }

    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    pub fn alleles(&self) -> &[u32] {
        &self.alleles
    }

    /// Wrapping lookup, `None` only for an empty genome.
    pub fn allele(&self, index: usize) -> Option<u32> {
        if self.alleles.is_empty() {
            return None;
        }
        Some(self.alleles[index % self.alleles.len()])
    }

    fn same_shape(&self, other: &Genome) -> bool {
        self.len() == other.len() && self.range == other.range
    }

    /// Two-point crossover: swap a random interval between two parents.
    ///
    /// Two cut points are drawn independently from `[0, len)`; the alleles in
    /// `[min, max)` are exchanged. Equal cut points produce copies of the
    /// parents. Parents of different length or allele range are rejected.
    pub fn crossover<R: Rng>(left: &Genome, right: &Genome, rng: &mut R) -> Result<(Genome, Genome)> {
        if !left.same_shape(right) {
            return Err(mismatch(left, right));
        }
        if left.is_empty() {
            return Ok((left.clone(), right.clone()));
        }

        let c = rng.gen_range(0..left.len());
        let d = rng.gen_range(0..left.len());
        Self::crossover_at(left, right, c.min(d), c.max(d))
    }

    /// Swap the alleles in `[lo, hi)` between two parents.
    ///
    /// Applying the same interval to the resulting children restores the parents.
    pub fn crossover_at(left: &Genome, right: &Genome, lo: usize, hi: usize) -> Result<(Genome, Genome)> {
        if !left.same_shape(right) {
            return Err(mismatch(left, right));
        }

        let hi = hi.min(left.len());
        let lo = lo.min(hi);

        let mut child1 = left.alleles.clone();
        let mut child2 = right.alleles.clone();
        child1[lo..hi].copy_from_slice(&right.alleles[lo..hi]);
        child2[lo..hi].copy_from_slice(&left.alleles[lo..hi]);

        Ok((
            Genome {
                alleles: child1,
                range: left.range,
            },
            Genome {
                alleles: child2,
                range: left.range,
            },
        ))
    }

    /// Point mutation: every allele is independently redrawn with probability
    /// `abs(rate) % 1.0`.
    pub fn mutated<R: Rng>(&self, rate: f64, rng: &mut R) -> Genome {
        if self.range == 0 {
            return self.clone();
        }
        let rate = effective_mutation_rate(rate);
        let alleles = self
            .alleles
            .iter()
            .map(|&allele| {
                if rng.gen::<f64>() < rate {
                    rng.gen_range(0..self.range)
                } else {
                    allele
                }
            })
            .collect();

        Genome {
            alleles,
            range: self.range,
        }
    }
}

/// Reduce any mutation rate to a probability in `[0, 1)`.
pub fn effective_mutation_rate(rate: f64) -> f64 {
    let rate = rate.abs() % 1.0;
    if rate.is_nan() {
        0.0
    } else {
        rate
    }
}

fn mismatch(left: &Genome, right: &Genome) -> EvolutionError {
    EvolutionError::GenomeMismatch {
        left_len: left.len(),
        left_range: left.range,
        right_len: right.len(),
        right_range: right.range,
    }
}

impl Index<usize> for Genome {
    type Output = u32;

    /// Wrapping index. Panics on an empty genome.
    fn index(&self, index: usize) -> &u32 {
        &self.alleles[index % self.alleles.len()]
    }
}
