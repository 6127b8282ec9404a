pub mod genome;
pub mod operators;
pub mod population;
pub mod progress;
pub mod random;

pub use genome::{Genome, DEFAULT_ALLELE_RANGE};
pub use operators::{cumulative_fitness, recombine, shuffle_pool, stochastic_universal_sampling, sus_indices};
pub use population::{sort_pool_by_fitness, Pool, Population, StopSignal};
pub use progress::{ConsoleProgressCallback, IpcProgressCallback, ProgressCallback, ProgressMessage, SilentProgressCallback};
pub use random::RandomSources;
