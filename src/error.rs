use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvolutionError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Genome mismatch: left has {left_len} alleles in [0, {left_range}), right has {right_len} alleles in [0, {right_range})")]
    GenomeMismatch {
        left_len: usize,
        left_range: u32,
        right_len: usize,
        right_range: u32,
    },

    #[error("Degenerate selection: pool of {pool_size} with selection rate {selection} yields no parents")]
    DegenerateSelection { pool_size: usize, selection: f64 },

    #[error("Normalized fitness {value} at pool position {index} is not a finite non-negative number")]
    InvalidFitness { index: usize, value: f64 },

    #[error("Generation history is empty")]
    EmptyHistory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EvolutionError>;
