//! FSRS spaced repetition scheduling engine
//!
//! This crate provides:
//! - The FSRS-v5 memory model (difficulty, stability, retrievability)
//! - First and subsequent grading as pure functions
//! - A `Scheduler` service mapping graded reviews to absolute due dates
//! - Review state types ready for JSON persistence
//!
//! The engine is stateless: every call is an independent pure computation
//! over the caller's persisted [`MemoryState`]. The card store owns the
//! states, decides which card to grade, and persists the results; this
//! crate only transforms them.

pub mod algorithm;
pub mod error;
pub mod models;
pub mod params;
pub mod scheduler;

pub use error::SchedulerError;
pub use models::{Grade, MemoryState};
pub use params::{SchedulerConfig, Weights, DECAY, FACTOR};
pub use scheduler::{ReviewOutcome, Scheduler};
