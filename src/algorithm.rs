//! FSRS-v5 Spaced Repetition Algorithm
//!
//! Pure formulas of the Free Spaced Repetition Scheduler memory model.
//! Each card carries two latent quantities:
//! - **difficulty** (1-10): intrinsic recall difficulty, higher = harder
//! - **stability** (days): time for recall probability to decay to the
//!   reference retention (0.9)
//!
//! A review updates both from the grade and the time elapsed since the
//! previous review, then the next interval is sized so that retrievability
//! at review time equals the desired retention.
//!
//! Grades (1-4): Again, Hard, Good, Easy

use crate::error::{Result, SchedulerError};
use crate::models::Grade;
use crate::params::{Weights, DECAY, FACTOR};

/// Minimum stability after a subsequent review
const MIN_STABILITY: f64 = 1.0;

/// Difficulty bounds
const MIN_DIFFICULTY: f64 = 1.0;
const MAX_DIFFICULTY: f64 = 10.0;

/// Result of grading a card for the first time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialReview {
    pub stability: f64,
    pub difficulty: f64,
}

/// Result of grading a previously seen card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubsequentReview {
    /// Days until the next required review; 0 means immediate re-queue
    pub interval_days: f64,
    pub difficulty: f64,
    pub stability: f64,
}

/// Initial memory state for a card graded for the first time.
///
/// Stability is a per-grade lookup (w0..w3); difficulty follows
/// `D0(G) = w4 - e^(w5 * (G - 1)) + 1`, so lower grades start harder.
pub fn initial_grade(weights: &Weights, grade: Grade) -> InitialReview {
    InitialReview {
        stability: initial_stability(weights, grade),
        difficulty: initial_difficulty(weights, grade),
    }
}

/// Update memory state for a previously seen card and size its next interval.
///
/// # Arguments
/// * `difficulty` - current difficulty, within [1, 10]
/// * `stability` - current stability, must be positive
/// * `elapsed_days` - fractional days since the last review; negative values
///   are treated as 0
///
/// Reviews less than one day after the previous one take the same-day
/// branch: the retrievability model is not meaningful there, so difficulty
/// is left unchanged and only stability moves.
pub fn subsequent_grade(
    weights: &Weights,
    grade: Grade,
    difficulty: f64,
    stability: f64,
    elapsed_days: f64,
    desired_retention: f64,
) -> Result<SubsequentReview> {
    if stability <= 0.0 {
        return Err(SchedulerError::InvalidStability(stability));
    }
    let elapsed_days = elapsed_days.max(0.0);

    let (new_difficulty, new_stability) = if elapsed_days < 1.0 {
        (difficulty, same_day_stability(weights, grade, stability))
    } else {
        let r = retrievability(elapsed_days, stability);
        let s = match grade {
            Grade::Again => forget_stability(weights, difficulty, stability, r),
            _ => recall_stability(weights, grade, stability, r),
        };
        (next_difficulty(weights, difficulty, grade), s)
    };

    // A failed card is re-queued immediately regardless of its new stability
    let interval_days = match grade {
        Grade::Again => 0.0,
        _ => next_interval(new_stability, desired_retention),
    };

    Ok(SubsequentReview {
        interval_days,
        difficulty: new_difficulty,
        stability: new_stability,
    })
}

/// Estimated probability of correct recall after `elapsed_days`
/// given the current stability: `R = (1 + FACTOR * t / S) ^ DECAY`.
///
/// Returns 0 for a non-positive stability (unreachable through the grading
/// entry points, which validate stability first).
pub fn retrievability(elapsed_days: f64, stability: f64) -> f64 {
    if stability <= 0.0 {
        return 0.0;
    }
    (1.0 + FACTOR * elapsed_days / stability).powf(DECAY)
}

/// Days until retrievability decays from 1.0 to the desired retention,
/// rounded to whole days with a one-day minimum.
pub fn next_interval(stability: f64, desired_retention: f64) -> f64 {
    let interval = stability / FACTOR * (desired_retention.powf(1.0 / DECAY) - 1.0);
    interval.max(1.0).round()
}

fn initial_stability(w: &Weights, grade: Grade) -> f64 {
    w[grade.rating() as usize - 1]
}

fn initial_difficulty(w: &Weights, grade: Grade) -> f64 {
    (w[4] - (w[5] * (grade.value() - 1.0)).exp() + 1.0).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

/// Difficulty update: linear damping toward the ceiling, then mean
/// reversion toward the Easy-grade initial difficulty.
fn next_difficulty(w: &Weights, difficulty: f64, grade: Grade) -> f64 {
    let delta = -w[6] * (grade.value() - 3.0);
    let damped = difficulty + delta * (10.0 - difficulty) / 9.0;
    let reverted = w[7] * initial_difficulty(w, Grade::Easy) + (1.0 - w[7]) * damped;
    reverted.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

/// Stability growth after successful recall (Hard/Good/Easy).
/// Hard is attenuated and Easy boosted through `e^(w10 * (G - 3))`.
fn recall_stability(w: &Weights, grade: Grade, stability: f64, retrievability: f64) -> f64 {
    let grade_factor = (w[10] * (grade.value() - 3.0)).exp();
    let growth = w[8].exp() * ((w[9] * (1.0 - retrievability)).exp() - 1.0) * grade_factor;
    (stability * (1.0 + growth)).max(MIN_STABILITY)
}

/// Post-lapse stability (grade Again), from the forgetting-curve formula
fn forget_stability(w: &Weights, difficulty: f64, stability: f64, retrievability: f64) -> f64 {
    let s = w[11]
        * difficulty.powf(-w[12])
        * ((stability + 1.0).powf(w[13]) - 1.0)
        * (w[14] * (1.0 - retrievability)).exp();
    s.max(MIN_STABILITY)
}

/// Stability update for repeated reviews within one calendar day
fn same_day_stability(w: &Weights, grade: Grade, stability: f64) -> f64 {
    (stability * (w[17] * (grade.value() - 3.0 + w[18])).exp()).max(MIN_STABILITY)
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: f64) -> String {
    let days = days.round() as i64;
    if days <= 0 {
        "now".to_string()
    } else if days == 1 {
        "1d".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        let weeks = days / 7;
        if weeks == 1 {
            "1w".to_string()
        } else {
            format!("{}w", weeks)
        }
    } else if days < 365 {
        let months = days / 30;
        if months == 1 {
            "1mo".to_string()
        } else {
            format!("{}mo", months)
        }
    } else {
        let years = days / 365;
        if years == 1 {
            "1y".to_string()
        } else {
            format!("{}y", years)
        }
    }
}
