use anyhow::Context;
use evopool::config::{ConfigManager, EvoParams};
use evopool::engines::evaluation::EvolutionEnvironment;
use evopool::engines::generation::{ConsoleProgressCallback, Genome, Population, StopSignal};
use log::info;
use std::env;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz ";

/// Demo problem: evolve a genome that spells a target phrase.
struct PhraseEnvironment {
    target: Vec<u8>,
    params: EvoParams,
}

impl EvolutionEnvironment for PhraseEnvironment {
    type Mapping = Vec<u8>;
    type Phenome = String;

    fn genome_size(&self) -> usize {
        self.target.len()
    }

    fn allele_range(&self) -> u32 {
        ALPHABET.len() as u32
    }

    fn evo_params(&self) -> &EvoParams {
        &self.params
    }

    fn do_mapping(&self, genome: &Genome) -> Vec<u8> {
        genome
            .alleles()
            .iter()
            .map(|&a| ALPHABET[a as usize % ALPHABET.len()])
            .collect()
    }

    // a phrase may not start with a blank
    fn gen_phenome(&self, mapping: &Vec<u8>) -> Option<String> {
        match mapping.first() {
            Some(b' ') | None => None,
            _ => String::from_utf8(mapping.clone()).ok(),
        }
    }

    fn calc_fitness(&self, phenome: &String, weights: &[f64]) -> (f64, f64) {
        let weight = |i: usize| {
            if weights.is_empty() {
                1.0
            } else {
                weights[i % weights.len()]
            }
        };

        let simple: f64 = phenome
            .bytes()
            .zip(&self.target)
            .enumerate()
            .filter(|(_, (got, want))| got == *want)
            .map(|(i, _)| weight(i))
            .sum();

        let blanks = phenome.bytes().filter(|&b| b == b' ').count();
        let expected_blanks = self.target.iter().filter(|&&b| b == b' ').count();
        let cutoff = 1.0 / (1.0 + blanks.abs_diff(expected_blanks) as f64);

        (simple, cutoff)
    }

    fn describe(&self, phenome: Option<&String>) {
        match phenome {
            Some(phrase) => info!("Phenome: {:?}", phrase),
            None => info!("Phenome: <invalid>"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let config_path = args.get(1).cloned();
    let target = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| "survival of the fittest".to_string());

    // optional file plus EVOPOOL__SECTION__FIELD overrides
    let manager = ConfigManager::new();
    manager
        .load_layered(config_path.as_deref(), "EVOPOOL")
        .context("Failed to load configuration")?;
    let config = manager.get()?;

    info!("Configuration: {:?}", config);
    info!("Target phrase: {:?}", target);

    let environment = PhraseEnvironment {
        target: target.to_lowercase().into_bytes(),
        params: config.evolution.clone(),
    };

    let mut population =
        Population::new(environment, &config.run).context("Failed to create population")?;
    let stop = StopSignal::from_run_config(&config.run);
    let completed = population.evolve_with(
        config.run.generations,
        config.run.keep_pools,
        &mut ConsoleProgressCallback,
        &stop,
    )?;

    info!(
        "Completed {} generations, {} pools in history",
        completed,
        population.generation_count()
    );

    if let Some(best) = population.best_resident() {
        info!(
            "Best resident: simple {:.3}, cutoff {:.3}, normalized {:.3}",
            best.simple_fitness(),
            best.cutoff_fitness(),
            best.normal_fitness()
        );
        best.describe(population.env());
    }

    Ok(())
}
