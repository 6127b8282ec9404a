use super::environment::EvolutionEnvironment;
use super::fitness::Fitness;
use crate::engines::generation::genome::Genome;
use log::trace;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::fmt;
use std::sync::Arc;

/// One member of a pool: a genome together with everything the environment
/// derived from it.
///
/// The whole evaluation pipeline runs once, in [`Resident::new`]; a resident is
/// never re-scored. Pools share residents through `Arc`, so an unchanged
/// survivor moves into the next generation without being evaluated again.
pub struct Resident<E: EvolutionEnvironment> {
    genome: Genome,
    mapping: E::Mapping,
    phenome: Option<E::Phenome>,
    fitness: Fitness,
}

impl<E: EvolutionEnvironment> Resident<E> {
    /// Map, realize and score `genome`.
    pub fn new(genome: Genome, env: &E) -> Self {
        let mapping = env.do_mapping(&genome);
        let phenome = env.gen_phenome(&mapping);

        let fitness = match &phenome {
            Some(phenome) => {
                let (simple, cutoff) = env.calc_fitness(phenome, &env.evo_params().weights);
                Fitness::scored(simple, cutoff)
            }
            None => {
                trace!("Genome produced no phenome, keeping fallback fitness");
                Fitness::unscored()
            }
        };

        Self {
            genome,
            mapping,
            phenome,
            fitness,
        }
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn mapping(&self) -> &E::Mapping {
        &self.mapping
    }

    pub fn phenome(&self) -> Option<&E::Phenome> {
        self.phenome.as_ref()
    }

    pub fn fitness(&self) -> &Fitness {
        &self.fitness
    }

    pub fn simple_fitness(&self) -> f64 {
        self.fitness.simple()
    }

    pub fn cutoff_fitness(&self) -> f64 {
        self.fitness.cutoff()
    }

    pub fn normal_fitness(&self) -> f64 {
        self.fitness.normalized()
    }

    pub fn describe(&self, env: &E) {
        env.describe(self.phenome.as_ref());
    }
}

impl<E: EvolutionEnvironment> fmt::Debug for Resident<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resident")
            .field("genome", &self.genome)
            .field("has_phenome", &self.phenome.is_some())
            .field("fitness", &self.fitness)
            .finish()
    }
}

/// Build residents for a batch of genomes, preserving order.
///
/// With `parallel` set the evaluations are spread over rayon's thread pool.
/// Either way every resident is fully scored when this returns.
pub fn evaluate_pool<E: EvolutionEnvironment>(
    genomes: Vec<Genome>,
    env: &E,
    parallel: bool,
) -> Vec<Arc<Resident<E>>> {
    if parallel {
        genomes
            .into_par_iter()
            .map(|genome| Arc::new(Resident::new(genome, env)))
            .collect()
    } else {
        genomes
            .into_iter()
            .map(|genome| Arc::new(Resident::new(genome, env)))
            .collect()
    }
}
