use crate::config::{ConfigSection, RunConfig};
use crate::engines::evaluation::environment::EvolutionEnvironment;
use crate::engines::evaluation::resident::{evaluate_pool, Resident};
use crate::engines::generation::genome::Genome;
use crate::engines::generation::operators::{recombine, stochastic_universal_sampling};
use crate::engines::generation::progress::{ConsoleProgressCallback, ProgressCallback};
use crate::engines::generation::random::RandomSources;
use crate::error::{EvolutionError, Result};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One generation: residents in breeding order, or ranked after a trim.
pub type Pool<E> = Vec<Arc<Resident<E>>>;

/// Cooperative stop request, checked once per generation boundary
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl StopSignal {
    pub fn never() -> Self {
        Self::default()
    }

    pub fn with_deadline(limit: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + limit),
        }
    }

    pub fn from_run_config(run: &RunConfig) -> Self {
        match run.time_limit() {
            Some(limit) => Self::with_deadline(limit),
            None => Self::never(),
        }
    }

    /// Request a stop from any thread.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn is_triggered(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Owns the generation history of one run and drives the
/// select -> recombine cycle over it.
///
/// Generation 0 is a pool of random genomes created at construction. Every
/// call to [`Population::evolve`] appends one pool per cycle; the history only
/// shrinks through the optional trim at the end of `evolve`.
pub struct Population<E: EvolutionEnvironment> {
    env: E,
    pools: Vec<Pool<E>>,
    rngs: RandomSources,
    parallel: bool,
}

impl<E: EvolutionEnvironment> Population<E> {
    pub fn new(env: E, run: &RunConfig) -> Result<Self> {
        run.validate()?;
        Self::with_random_sources(
            env,
            RandomSources::from_optional_seed(run.seed),
            run.parallel_evaluation,
        )
    }

    pub fn with_random_sources(env: E, rngs: RandomSources, parallel: bool) -> Result<Self> {
        env.evo_params().validate()?;
        if env.genome_size() == 0 {
            return Err(EvolutionError::Configuration(
                "Genome size must be at least 1".to_string(),
            ));
        }
        if env.allele_range() == 0 {
            return Err(EvolutionError::Configuration(
                "Allele range must be at least 1".to_string(),
            ));
        }

        let mut population = Self {
            env,
            pools: Vec::new(),
            rngs,
            parallel,
        };
        let initial = population.generate_pool()?;
        population.pools.push(initial);
        Ok(population)
    }

    fn generate_pool(&mut self) -> Result<Pool<E>> {
        let size = self.env.evo_params().population;
        info!(
            "Generating new population of size {} (genome size {})",
            size,
            self.env.genome_size()
        );

        let genomes = (0..size)
            .map(|_| {
                Genome::generate(
                    self.env.genome_size(),
                    self.env.allele_range(),
                    &mut self.rngs.variation,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(evaluate_pool(genomes, &self.env, self.parallel))
    }

    /// Run `num_cycles` generations, logging progress, then keep the `keep`
    /// most recent pools ranked by fitness if requested.
    pub fn evolve(&mut self, num_cycles: usize, keep: Option<usize>) -> Result<()> {
        self.evolve_with(
            num_cycles,
            keep,
            &mut ConsoleProgressCallback,
            &StopSignal::never(),
        )?;
        Ok(())
    }

    /// Like [`Population::evolve`], reporting to `callback` and honouring
    /// `stop` between generations. Returns the number of cycles completed.
    ///
    /// A triggered stop is not an error: the history holds every pool
    /// completed so far and the trim still applies.
    pub fn evolve_with<C: ProgressCallback>(
        &mut self,
        num_cycles: usize,
        keep: Option<usize>,
        callback: &mut C,
        stop: &StopSignal,
    ) -> Result<usize> {
        let mut completed = 0;

        for _ in 0..num_cycles {
            if stop.is_triggered() {
                warn!("Stop requested after {} of {} cycles", completed, num_cycles);
                break;
            }

            let generation = self.pools.len();
            callback.on_generation_start(generation);

            let most_recent = self.pools.last().cloned().ok_or(EvolutionError::EmptyHistory)?;
            let next = self.single_round(&most_recent)?;

            let best = best_fitness(&next);
            let size = next.len();
            self.pools.push(next);
            completed += 1;

            callback.on_generation_complete(generation, size, best);
        }

        if let Some(keep) = keep {
            match self.trim_to_most_evolved(keep) {
                Some(kept) => {
                    self.pools = kept;
                    callback.on_history_trimmed(keep);
                }
                None => debug!(
                    "Keeping all {} pools, fewer than the {} requested",
                    self.pools.len(),
                    keep
                ),
            }
        }

        Ok(completed)
    }

    /// Selection followed by recombination: one generational step.
    pub fn single_round(&mut self, pool: &[Arc<Resident<E>>]) -> Result<Pool<E>> {
        let params = self.env.evo_params();
        let parents = stochastic_universal_sampling(
            pool,
            params.selection,
            &mut self.rngs.shuffle,
            &mut self.rngs.sampling,
        )?;
        recombine(&parents, &self.env, &mut self.rngs, self.parallel)
    }

    /// Append a pool in which every member of the latest pool is re-created
    /// from a mutated copy of its genome. Useful to shake up a weak initial
    /// population before evolving.
    pub fn mutate_pool(&mut self) -> Result<()> {
        info!("Mutating entire pool to try for a better initial population.");
        let rate = self.env.evo_params().mutation;
        let latest = self.pools.last().ok_or(EvolutionError::EmptyHistory)?;

        let genomes = latest
            .iter()
            .map(|member| member.genome().mutated(rate, &mut self.rngs.variation))
            .collect();
        let mutated = evaluate_pool(genomes, &self.env, self.parallel);
        self.pools.push(mutated);
        Ok(())
    }

    /// The `keep` most recent pools, each ranked by descending normalized
    /// fitness, or `None` when fewer pools exist.
    pub fn trim_to_most_evolved(&self, keep: usize) -> Option<Vec<Pool<E>>> {
        let total = self.pools.len();
        if keep > total {
            return None;
        }
        Some(
            self.pools[total - keep..]
                .iter()
                .map(|pool| sort_pool_by_fitness(pool))
                .collect(),
        )
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn pools(&self) -> &[Pool<E>] {
        &self.pools
    }

    pub fn latest_pool(&self) -> Option<&Pool<E>> {
        self.pools.last()
    }

    pub fn generation_count(&self) -> usize {
        self.pools.len()
    }

    /// Fittest resident across the whole history.
    pub fn best_resident(&self) -> Option<&Arc<Resident<E>>> {
        self.pools.iter().flatten().max_by(|a, b| {
            a.normal_fitness()
                .partial_cmp(&b.normal_fitness())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    pub fn describe_pool(&self, pool: &[Arc<Resident<E>>]) {
        for (i, member) in pool.iter().enumerate() {
            info!("Member #{}", i + 1);
            member.describe(&self.env);
        }
    }

    pub fn describe_first_member(&self) {
        match self.pools.last().and_then(|pool| pool.first()) {
            Some(first) => first.describe(&self.env),
            None => warn!("No first member -- pool must be empty"),
        }
    }
}

/// Copy of `pool` sorted by descending normalized fitness.
pub fn sort_pool_by_fitness<E: EvolutionEnvironment>(pool: &[Arc<Resident<E>>]) -> Pool<E> {
    let mut sorted = pool.to_vec();
    sorted.sort_by(|a, b| {
        b.normal_fitness()
            .partial_cmp(&a.normal_fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted
}

fn best_fitness<E: EvolutionEnvironment>(pool: &[Arc<Resident<E>>]) -> f64 {
    pool.iter()
        .map(|r| r.normal_fitness())
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or(0.0)
}
