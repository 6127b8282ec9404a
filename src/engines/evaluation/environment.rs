use crate::config::EvoParams;
use crate::engines::generation::genome::{Genome, DEFAULT_ALLELE_RANGE};

/// Problem-specific collaborator of the engine
///
/// The engine only moves genomes around; everything a genome means is decided
/// here. A genome is decoded into a `Mapping`, the mapping is realized as a
/// `Phenome` (or not, for an invalid genotype), and the phenome is scored.
///
/// Pools may be evaluated across worker threads, so implementations must be
/// `Sync` and must not keep mutable state between calls: the same genome has
/// to produce the same scores no matter which thread evaluates it.
pub trait EvolutionEnvironment: Sync {
    type Mapping: Send + Sync;
    type Phenome: Send + Sync;

    /// Fixed genome length for the run.
    fn genome_size(&self) -> usize;

    /// Alleles are drawn from `[0, allele_range)`.
    fn allele_range(&self) -> u32 {
        DEFAULT_ALLELE_RANGE
    }

    fn evo_params(&self) -> &EvoParams;

    fn do_mapping(&self, genome: &Genome) -> Self::Mapping;

    /// `None` marks a genotype that cannot be realized. Such residents are
    /// kept with fallback fitness.
    fn gen_phenome(&self, mapping: &Self::Mapping) -> Option<Self::Phenome>;

    /// Returns `(simple, cutoff)` scores. Both must be non-negative for
    /// fitness-proportional selection to hold.
    fn calc_fitness(&self, phenome: &Self::Phenome, weights: &[f64]) -> (f64, f64);

    /// Reporting hook, never consulted by the algorithm.
    fn describe(&self, phenome: Option<&Self::Phenome>);
}
