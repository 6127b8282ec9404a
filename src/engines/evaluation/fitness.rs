use serde::{Deserialize, Serialize};

pub const DEFAULT_SIMPLE_FITNESS: f64 = 1.0;
pub const DEFAULT_CUTOFF_FITNESS: f64 = 1.0;
/// Near-zero floor so an unscored member still holds a sliver of the selection wheel.
pub const DEFAULT_NORMALIZED_FITNESS: f64 = 0.0001;

/// Fitness record of one resident
///
/// Every score is optional. Residents whose genome produced no phenome are
/// never scored, and the accessors fall back to the defaults above.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    simple: Option<f64>,
    cutoff: Option<f64>,
    normalized: Option<f64>,
}

impl Fitness {
    /// An unscored record.
    pub fn unscored() -> Self {
        Self::default()
    }

    /// A record built from the environment's raw and cutoff scores.
    /// The normalized score is their product.
    pub fn scored(simple: f64, cutoff: f64) -> Self {
        Self {
            simple: Some(simple),
            cutoff: Some(cutoff),
            normalized: Some(simple * cutoff),
        }
    }

    pub fn simple(&self) -> f64 {
        self.simple.unwrap_or(DEFAULT_SIMPLE_FITNESS)
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff.unwrap_or(DEFAULT_CUTOFF_FITNESS)
    }

    /// Score used for selection and ranking.
    pub fn normalized(&self) -> f64 {
        self.normalized.unwrap_or(DEFAULT_NORMALIZED_FITNESS)
    }

    pub fn is_scored(&self) -> bool {
        self.normalized.is_some()
    }
}
