pub mod environment;
pub mod fitness;
pub mod resident;

pub use environment::EvolutionEnvironment;
pub use fitness::Fitness;
pub use resident::{evaluate_pool, Resident};
