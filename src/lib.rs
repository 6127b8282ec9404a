pub mod config;
pub mod engines;
pub mod error;

pub use config::{AppConfig, ConfigManager, EvoParams, RunConfig};
pub use engines::evaluation::{EvolutionEnvironment, Fitness, Resident};
pub use engines::generation::{Genome, Population, StopSignal};
pub use error::{EvolutionError, Result};
