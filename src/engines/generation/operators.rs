use crate::config::selection_size;
use crate::engines::evaluation::environment::EvolutionEnvironment;
use crate::engines::evaluation::resident::{evaluate_pool, Resident};
use crate::engines::generation::genome::Genome;
use crate::engines::generation::random::RandomSources;
use crate::error::{EvolutionError, Result};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Running sum of fitness values. Non-decreasing for non-negative input.
pub fn cumulative_fitness(fitness: &[f64]) -> Vec<f64> {
    fitness
        .iter()
        .scan(0.0, |sum, f| {
            *sum += f;
            Some(*sum)
        })
        .collect()
}

/// One sweep of stochastic universal sampling over a cumulative fitness array.
///
/// `count` pointers spaced `total / count` apart start at
/// `start_fraction * spacing`; each pointer selects the first position whose
/// cumulative fitness reaches it. The position index only moves forward.
/// A wheel with no fitness at all is sampled as if every member weighed the same.
pub fn sus_indices(cdf: &[f64], count: usize, start_fraction: f64) -> Vec<usize> {
    if cdf.is_empty() || count == 0 {
        return Vec::new();
    }

    let total = cdf[cdf.len() - 1];
    let uniform;
    let cdf = if total > 0.0 {
        cdf
    } else {
        uniform = (1..=cdf.len()).map(|i| i as f64).collect::<Vec<_>>();
        &uniform[..]
    };
    let total = cdf[cdf.len() - 1];

    let skip = total / count as f64;
    let mut value = start_fraction * skip;
    let mut idx = 0;
    let mut selected = Vec::with_capacity(count);

    for _ in 0..count {
        // clamp: rounding can leave the last pointer a hair above the total
        while idx + 1 < cdf.len() && cdf[idx] < value {
            idx += 1;
        }
        selected.push(idx);
        value += skip;
    }

    selected
}

/// Copy of `pool` in random order.
pub fn shuffle_pool<E: EvolutionEnvironment, R: Rng>(pool: &[Arc<Resident<E>>], rng: &mut R) -> Vec<Arc<Resident<E>>> {
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Stochastic universal sampling: draw `floor(len * selection)` parents with
/// probability proportional to normalized fitness, using a single random offset.
///
/// The pool is shuffled first so that ties and pool order carry no bias.
pub fn stochastic_universal_sampling<E, S, T>(
    pool: &[Arc<Resident<E>>],
    selection: f64,
    shuffle_rng: &mut S,
    sample_rng: &mut T,
) -> Result<Vec<Arc<Resident<E>>>>
where
    E: EvolutionEnvironment,
    S: Rng,
    T: Rng,
{
    let count = selection_size(pool.len(), selection);
    if count == 0 {
        return Err(EvolutionError::DegenerateSelection {
            pool_size: pool.len(),
            selection,
        });
    }

    let local_pool = shuffle_pool(pool, shuffle_rng);

    let fitness: Vec<f64> = local_pool.iter().map(|r| r.normal_fitness()).collect();
    if let Some((index, &value)) = fitness
        .iter()
        .enumerate()
        .find(|(_, f)| !f.is_finite() || **f < 0.0)
    {
        return Err(EvolutionError::InvalidFitness { index, value });
    }

    let cdf = cumulative_fitness(&fitness);
    let start = sample_rng.gen::<f64>();
    let parents: Vec<_> = sus_indices(&cdf, count, start)
        .into_iter()
        .map(|i| Arc::clone(&local_pool[i]))
        .collect();

    debug!(
        "SUS selected {} parents from a pool of {} (total fitness {:.4})",
        parents.len(),
        pool.len(),
        cdf.last().copied().unwrap_or(0.0)
    );

    Ok(parents)
}

fn pick<'a, E: EvolutionEnvironment, R: Rng>(
    parents: &'a [Arc<Resident<E>>],
    rng: &mut R,
) -> &'a Arc<Resident<E>> {
    &parents[rng.gen_range(0..parents.len())]
}

/// Breed a full pool from a breeding pool.
///
/// Runs `population / 2` rounds. A round is either a crossover (two random
/// parents, the second child mutated) or a reproduction step (a mutated copy
/// of one random parent plus another random parent carried over as is).
/// Fresh genomes are evaluated as one batch; carried-over residents keep their
/// cached evaluation.
pub fn recombine<E: EvolutionEnvironment>(
    parents: &[Arc<Resident<E>>],
    env: &E,
    rngs: &mut RandomSources,
    parallel: bool,
) -> Result<Vec<Arc<Resident<E>>>> {
    let params = env.evo_params();
    if parents.is_empty() {
        return Err(EvolutionError::DegenerateSelection {
            pool_size: 0,
            selection: params.selection,
        });
    }

    let mut fresh: Vec<Genome> = Vec::with_capacity(params.offspring_size());
    // None marks a slot filled by the next freshly evaluated genome
    let mut slots: Vec<Option<Arc<Resident<E>>>> = Vec::with_capacity(params.offspring_size());
    let mut crossovers = 0usize;

    for _ in 0..params.population / 2 {
        if rngs.breeding.gen::<f64>() < params.recombination {
            let father = pick(parents, &mut rngs.breeding);
            let mother = pick(parents, &mut rngs.breeding);
            let (child1, child2) =
                Genome::crossover(father.genome(), mother.genome(), &mut rngs.variation)?;

            fresh.push(child1);
            fresh.push(child2.mutated(params.mutation, &mut rngs.variation));
            slots.push(None);
            slots.push(None);
            crossovers += 1;
        } else {
            let donor = pick(parents, &mut rngs.breeding);
            fresh.push(donor.genome().mutated(params.mutation, &mut rngs.variation));
            slots.push(None);

            let survivor = pick(parents, &mut rngs.breeding);
            slots.push(Some(Arc::clone(survivor)));
        }
    }

    debug!(
        "Recombination: {} crossovers, {} reproductions, {} fresh genomes",
        crossovers,
        params.population / 2 - crossovers,
        fresh.len()
    );

    let mut evaluated = evaluate_pool(fresh, env, parallel).into_iter();
    Ok(slots
        .into_iter()
        .filter_map(|slot| slot.or_else(|| evaluated.next()))
        .collect())
}
