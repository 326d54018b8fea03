//! Error types for the scheduling engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Invalid grade rating: {0}")]
    InvalidGrade(i32),

    #[error("Invalid grade name: {0:?}")]
    InvalidGradeName(String),

    #[error("Stability must be positive, got {0}")]
    InvalidStability(f64),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
