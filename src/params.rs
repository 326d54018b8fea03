//! FSRS model parameters and scheduler configuration
//!
//! The weight vector and the forgetting-curve constants are shared by every
//! formula in [`crate::algorithm`]. Configuration is an explicit value
//! passed into [`crate::Scheduler::new`], never process-wide state.

use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Power-law decay exponent of the forgetting curve
pub const DECAY: f64 = -0.5;

/// Forgetting-curve factor, chosen so that retrievability is exactly 0.9
/// when elapsed time equals stability
pub const FACTOR: f64 = 19.0 / 81.0;

/// Default retention target used to size review intervals
pub const DEFAULT_RETENTION: f64 = 0.9;

/// The 19-element FSRS-v5 weight vector.
///
/// Layout:
/// - w0..w3: initial stability per grade (Again, Hard, Good, Easy)
/// - w4, w5: initial difficulty
/// - w6, w7: difficulty update (damping and mean reversion)
/// - w8..w10: stability growth after successful recall
/// - w11..w14: stability after a lapse (forgetting curve)
/// - w17, w18: same-day review update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weights(pub [f64; 19]);

impl Index<usize> for Weights {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl Default for Weights {
    /// Reference FSRS-v5 parameter vector
    fn default() -> Self {
        Weights([
            0.40255, 1.18385, 3.173, 15.69105, 7.1949, 0.5345, 1.4604, 0.0046, 1.54575, 0.1192,
            1.01925, 1.9395, 0.11, 0.29605, 2.2698, 0.2315, 2.9898, 0.51655, 0.6621,
        ])
    }
}

/// Configuration for a [`crate::Scheduler`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    /// Retrievability threshold used to size the next review interval
    pub desired_retention: f64,
    /// Fixed model parameters applied by all formulas
    pub weights: Weights,
}

impl SchedulerConfig {
    /// Default weights with a custom retention target
    pub fn with_retention(desired_retention: f64) -> Self {
        Self {
            desired_retention,
            ..Default::default()
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            desired_retention: DEFAULT_RETENTION,
            weights: Weights::default(),
        }
    }
}
