use evopool::config::{EvoParams, RunConfig};
use evopool::engines::evaluation::{EvolutionEnvironment, Resident};
use evopool::engines::generation::{
    shuffle_pool, stochastic_universal_sampling, Genome, Population, ProgressCallback, RandomSources, StopSignal,
};
use evopool::error::EvolutionError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Every genome is valid and scores (1, 1).
struct ConstantEnvironment {
    params: EvoParams,
}

impl EvolutionEnvironment for ConstantEnvironment {
    type Mapping = ();
    type Phenome = ();

    fn genome_size(&self) -> usize {
        8
    }

    fn allele_range(&self) -> u32 {
        4
    }

    fn evo_params(&self) -> &EvoParams {
        &self.params
    }

    fn do_mapping(&self, _genome: &Genome) {}

    fn gen_phenome(&self, _mapping: &()) -> Option<()> {
        Some(())
    }

    fn calc_fitness(&self, _phenome: &(), _weights: &[f64]) -> (f64, f64) {
        (1.0, 1.0)
    }

    fn describe(&self, _phenome: Option<&()>) {}
}

/// No genome can be realized.
struct BarrenEnvironment {
    params: EvoParams,
}

impl EvolutionEnvironment for BarrenEnvironment {
    type Mapping = usize;
    type Phenome = usize;

    fn genome_size(&self) -> usize {
        5
    }

    fn evo_params(&self) -> &EvoParams {
        &self.params
    }

    fn do_mapping(&self, genome: &Genome) -> usize {
        genome.len()
    }

    fn gen_phenome(&self, _mapping: &usize) -> Option<usize> {
        None
    }

    fn calc_fitness(&self, _phenome: &usize, _weights: &[f64]) -> (f64, f64) {
        unreachable!("barren genomes are never scored")
    }

    fn describe(&self, _phenome: Option<&usize>) {}
}

/// Binary genome scored by its number of ones.
struct OneMaxEnvironment {
    params: EvoParams,
}

impl EvolutionEnvironment for OneMaxEnvironment {
    type Mapping = usize;
    type Phenome = usize;

    fn genome_size(&self) -> usize {
        24
    }

    fn allele_range(&self) -> u32 {
        2
    }

    fn evo_params(&self) -> &EvoParams {
        &self.params
    }

    fn do_mapping(&self, genome: &Genome) -> usize {
        genome.alleles().iter().filter(|&&a| a == 1).count()
    }

    fn gen_phenome(&self, mapping: &usize) -> Option<usize> {
        Some(*mapping)
    }

    fn calc_fitness(&self, phenome: &usize, weights: &[f64]) -> (f64, f64) {
        (*phenome as f64 + 1.0, weights.first().copied().unwrap_or(1.0))
    }

    fn describe(&self, phenome: Option<&usize>) {
        println!("ones: {:?}", phenome);
    }
}

fn mean_fitness<E: EvolutionEnvironment>(pool: &[Arc<Resident<E>>]) -> f64 {
    pool.iter().map(|r| r.normal_fitness()).sum::<f64>() / pool.len() as f64
}

struct CountingCallback {
    started: usize,
    completed: Vec<(usize, usize)>,
}

impl ProgressCallback for CountingCallback {
    fn on_generation_start(&mut self, _generation: usize) {
        self.started += 1;
    }

    fn on_generation_complete(&mut self, generation: usize, pool_size: usize, _best_fitness: f64) {
        self.completed.push((generation, pool_size));
    }

    fn on_history_trimmed(&mut self, _kept: usize) {}
}

#[test]
fn test_constant_fitness_generation() {
    println!("\n=== Testing one generation with constant fitness ===");

    let env = ConstantEnvironment {
        params: EvoParams {
            population: 10,
            selection: 0.5,
            recombination: 1.0,
            mutation: 0.0,
            weights: vec![],
        },
    };
    let run = RunConfig {
        seed: Some(42),
        parallel_evaluation: false,
        ..RunConfig::default()
    };

    let mut population = Population::new(env, &run).unwrap();
    let initial: Vec<Genome> = population.pools()[0].iter().map(|r| r.genome().clone()).collect();
    population.evolve(1, None).unwrap();

    let next = population.latest_pool().unwrap();
    assert_eq!(population.generation_count(), 2);
    assert_eq!(next.len(), 10);
    for member in next {
        assert_eq!(member.normal_fitness(), 1.0);
        assert_eq!(member.genome().len(), 8);
        assert!(member.genome().alleles().iter().all(|&a| a < 4));
    }

    // without mutation every allele at a position comes from some parent at that position
    for member in next {
        for i in 0..8 {
            assert!(initial.iter().any(|g| g[i] == member.genome()[i]));
        }
    }
}

#[test]
fn test_uniform_fitness_sampling_is_evenly_spaced() {
    let env = ConstantEnvironment {
        params: EvoParams {
            population: 10,
            ..EvoParams::default()
        },
    };
    let mut rng = StdRng::seed_from_u64(3);
    let pool: Vec<_> = (0..10)
        .map(|_| Arc::new(Resident::new(Genome::generate(8, 4, &mut rng).unwrap(), &env)))
        .collect();

    let mut shuffle_rng = StdRng::seed_from_u64(5);
    let mut sample_rng = StdRng::seed_from_u64(6);
    for _ in 0..50 {
        let parents = stochastic_universal_sampling(&pool, 0.5, &mut shuffle_rng, &mut sample_rng).unwrap();
        assert_eq!(parents.len(), 5);

        // equal weights and spacing of two members: nobody is picked twice
        for (i, a) in parents.iter().enumerate() {
            for b in &parents[i + 1..] {
                assert!(!Arc::ptr_eq(a, b));
            }
        }
    }
}

#[test]
fn test_shuffle_pool_is_a_permutation() {
    let env = ConstantEnvironment {
        params: EvoParams::default(),
    };
    let pool: Vec<_> = (0..16u32)
        .map(|i| Arc::new(Resident::new(Genome::from_alleles(vec![i % 4; 8], 4), &env)))
        .collect();

    let mut rng = StdRng::seed_from_u64(12);
    let shuffled = shuffle_pool(&pool, &mut rng);

    assert_eq!(shuffled.len(), pool.len());
    for member in &pool {
        assert_eq!(shuffled.iter().filter(|r| Arc::ptr_eq(r, member)).count(), 1);
    }
    // same seed, same order
    let again = shuffle_pool(&pool, &mut StdRng::seed_from_u64(12));
    assert!(shuffled.iter().zip(&again).all(|(a, b)| Arc::ptr_eq(a, b)));
}

#[test]
fn test_binary_crossover_conserves_ones() {
    println!("\n=== Testing allele conservation under crossover ===");

    let zeros = Genome::from_alleles(vec![0, 0, 0, 0], 2);
    let ones = Genome::from_alleles(vec![1, 1, 1, 1], 2);
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..500 {
        let (child1, child2) = Genome::crossover(&zeros, &ones, &mut rng).unwrap();

        let total: u32 = child1.alleles().iter().chain(child2.alleles()).sum();
        assert_eq!(total, 4);

        // the ones in the first child form one contiguous block
        let positions: Vec<usize> = (0..4).filter(|&i| child1[i] == 1).collect();
        if let (Some(first), Some(last)) = (positions.first(), positions.last()) {
            assert_eq!(last - first + 1, positions.len());
        }
        for i in 0..4 {
            assert_eq!(child1[i] + child2[i], 1);
        }
    }
}

#[test]
fn test_barren_environment_still_evolves() {
    let env = BarrenEnvironment {
        params: EvoParams {
            population: 12,
            ..EvoParams::default()
        },
    };
    let run = RunConfig {
        seed: Some(1),
        ..RunConfig::default()
    };

    let mut population = Population::new(env, &run).unwrap();
    population.evolve(3, Some(2)).unwrap();

    assert_eq!(population.generation_count(), 2);
    for member in population.pools().iter().flatten() {
        assert!(member.phenome().is_none());
        assert_eq!(member.simple_fitness(), 1.0);
        assert_eq!(member.cutoff_fitness(), 1.0);
        assert_eq!(member.normal_fitness(), 0.0001);
    }
}

#[test]
fn test_selection_pressure_improves_onemax() {
    println!("\n=== Testing OneMax improvement ===");

    let env = OneMaxEnvironment {
        params: EvoParams {
            population: 60,
            selection: 0.5,
            recombination: 0.618,
            mutation: 0.01,
            weights: vec![1.0],
        },
    };
    let run = RunConfig {
        seed: Some(2024),
        ..RunConfig::default()
    };

    let mut population = Population::new(env, &run).unwrap();
    let initial_mean = mean_fitness(&population.pools()[0]);

    population.evolve(40, None).unwrap();
    let final_mean = mean_fitness(population.latest_pool().unwrap());

    println!("mean fitness {:.2} -> {:.2}", initial_mean, final_mean);
    assert!(final_mean > initial_mean + 2.0);
    population.describe_first_member();
}

#[test]
fn test_progress_and_stop_signal() {
    let env = OneMaxEnvironment {
        params: EvoParams {
            population: 9,
            weights: vec![1.0],
            ..EvoParams::default()
        },
    };
    let run = RunConfig {
        seed: Some(8),
        ..RunConfig::default()
    };
    let mut population = Population::new(env, &run).unwrap();
    let mut callback = CountingCallback {
        started: 0,
        completed: Vec::new(),
    };

    let completed = population
        .evolve_with(3, None, &mut callback, &StopSignal::never())
        .unwrap();
    assert_eq!(completed, 3);
    assert_eq!(callback.started, 3);
    // odd population: pairs of offspring give 8 members
    assert_eq!(callback.completed, vec![(1, 8), (2, 8), (3, 8)]);

    let stop = StopSignal::never();
    let flag = stop.cancel_flag();
    flag.store(true, std::sync::atomic::Ordering::Relaxed);
    let completed = population.evolve_with(3, None, &mut callback, &stop).unwrap();
    assert_eq!(completed, 0);
    assert_eq!(population.generation_count(), 4);
}

#[test]
fn test_degenerate_selection_is_an_error() {
    let env = ConstantEnvironment {
        params: EvoParams::default(),
    };
    let pool = vec![Arc::new(Resident::new(Genome::from_alleles(vec![0; 8], 4), &env))];

    let mut rng = StdRng::seed_from_u64(0);
    let mut other = StdRng::seed_from_u64(1);
    let result = stochastic_universal_sampling(&pool, 0.5, &mut rng, &mut other);

    assert!(matches!(
        result,
        Err(EvolutionError::DegenerateSelection { pool_size: 1, .. })
    ));
}

#[test]
fn test_explicit_random_sources_are_reproducible() {
    let build = || {
        let env = OneMaxEnvironment {
            params: EvoParams {
                population: 20,
                weights: vec![1.0],
                ..EvoParams::default()
            },
        };
        let mut population =
            Population::with_random_sources(env, RandomSources::from_seed(31), true).unwrap();
        population.evolve(5, Some(1)).unwrap();
        population.pools()[0]
            .iter()
            .map(|r| r.genome().clone())
            .collect::<Vec<_>>()
    };

    assert_eq!(build(), build());
}
