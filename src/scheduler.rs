//! Review scheduling service
//!
//! Thin wrapper over the pure formulas in [`crate::algorithm`]: owns the
//! scheduler configuration, dispatches first vs. subsequent grading, and
//! converts intervals into absolute due timestamps. The external card store
//! persists the returned state and reschedules the card.

use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::{initial_grade, next_interval, subsequent_grade};
use crate::error::Result;
use crate::models::{Grade, MemoryState};
use crate::params::SchedulerConfig;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Result of grading one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    /// Updated memory state, to be persisted by the card store
    pub state: MemoryState,
    /// Days until the next required review; 0 means immediate re-queue
    pub interval_days: f64,
    /// Absolute due timestamp derived from the interval
    pub due_at: DateTime<Utc>,
}

/// Scheduling engine over a fixed configuration.
///
/// Holds only immutable configuration, so one instance can be shared freely
/// across threads. The caller must serialize grading per individual card to
/// avoid lost updates against its own store; across different cards every
/// call is independent.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Grade a card and compute its next schedule.
    ///
    /// A card in the unseen sentinel state takes the first-grading path;
    /// every other state takes the subsequent path, with elapsed time
    /// computed from `last_reviewed_at` when present. No state is mutated
    /// on error, and identical inputs always produce identical outcomes.
    pub fn grade_card(
        &self,
        state: &MemoryState,
        grade: Grade,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome> {
        if state.is_new() {
            let initial = initial_grade(&self.config.weights, grade);
            let interval_days = next_interval(initial.stability, self.config.desired_retention);
            debug!(
                "initial grading: grade={:?} stability={:.3} difficulty={:.3} interval={}",
                grade, initial.stability, initial.difficulty, interval_days
            );

            return Ok(self.outcome(
                MemoryState {
                    difficulty: initial.difficulty,
                    stability: initial.stability,
                    last_reviewed_at: Some(now),
                },
                interval_days,
                now,
            ));
        }

        let elapsed_days = self.elapsed_days(state, now);
        let update = subsequent_grade(
            &self.config.weights,
            grade,
            state.difficulty,
            state.stability,
            elapsed_days,
            self.config.desired_retention,
        )?;
        debug!(
            "subsequent grading: grade={:?} elapsed={:.2} stability={:.3} difficulty={:.3} interval={}",
            grade, elapsed_days, update.stability, update.difficulty, update.interval_days
        );

        Ok(self.outcome(
            MemoryState {
                difficulty: update.difficulty,
                stability: update.stability,
                last_reviewed_at: Some(now),
            },
            update.interval_days,
            now,
        ))
    }

    /// Intervals each grade would produce for this card, in rating order
    /// (Again, Hard, Good, Easy). Used to show users what each answer
    /// button schedules.
    pub fn preview_intervals(
        &self,
        state: &MemoryState,
        now: DateTime<Utc>,
    ) -> Result<[f64; 4]> {
        let mut intervals = [0.0; 4];
        for (slot, grade) in Grade::ALL.into_iter().enumerate() {
            intervals[slot] = self.grade_card(state, grade, now)?.interval_days;
        }
        Ok(intervals)
    }

    /// Fractional days since the last review. Stored states that predate
    /// timestamp tracking are approximated as one retention period old.
    fn elapsed_days(&self, state: &MemoryState, now: DateTime<Utc>) -> f64 {
        match state.last_reviewed_at {
            Some(last) => {
                let seconds = now.signed_duration_since(last).num_seconds() as f64;
                (seconds / SECONDS_PER_DAY).max(0.0)
            }
            None => state.stability * 0.9,
        }
    }

    fn outcome(&self, state: MemoryState, interval_days: f64, now: DateTime<Utc>) -> ReviewOutcome {
        let due_at = if interval_days <= 0.0 {
            now
        } else {
            now + Duration::days(interval_days as i64)
        };
        ReviewOutcome {
            state,
            interval_days,
            due_at,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_first_grading_initializes_state() {
        let scheduler = Scheduler::default();
        let outcome = scheduler
            .grade_card(&MemoryState::new(), Grade::Good, now())
            .unwrap();

        assert_eq!(outcome.state.stability, 3.173);
        assert!((outcome.state.difficulty - 5.2824).abs() < 1e-3);
        assert_eq!(outcome.state.last_reviewed_at, Some(now()));

        // At the default retention the first interval equals the rounded
        // initial stability
        assert_eq!(outcome.interval_days, 3.0);
        assert_eq!(outcome.due_at, now() + Duration::days(3));
    }

    #[test]
    fn test_subsequent_grading_uses_stored_timestamp() {
        let scheduler = Scheduler::default();
        let reviewed = scheduler
            .grade_card(&MemoryState::new(), Grade::Good, now())
            .unwrap();

        let later = now() + Duration::days(3);
        let outcome = scheduler
            .grade_card(&reviewed.state, Grade::Good, later)
            .unwrap();

        assert!(outcome.state.stability > reviewed.state.stability);
        assert_eq!(outcome.state.last_reviewed_at, Some(later));
        assert!(outcome.interval_days >= 1.0);
        assert!(outcome.due_at > later);
    }

    #[test]
    fn test_again_due_immediately() {
        let scheduler = Scheduler::default();
        let state = MemoryState {
            difficulty: 6.46,
            stability: 3.173,
            last_reviewed_at: Some(now() - Duration::days(3)),
        };

        let outcome = scheduler.grade_card(&state, Grade::Again, now()).unwrap();
        assert_eq!(outcome.interval_days, 0.0);
        assert_eq!(outcome.due_at, now());
        assert!(outcome.state.stability >= 1.0);
    }

    #[test]
    fn test_missing_timestamp_falls_back_to_stability() {
        let scheduler = Scheduler::default();
        let legacy = MemoryState {
            difficulty: 6.46,
            stability: 3.173,
            last_reviewed_at: None,
        };

        let outcome = scheduler.grade_card(&legacy, Grade::Good, now()).unwrap();

        // Matches the pure computation with elapsed = stability * 0.9
        let expected = crate::algorithm::subsequent_grade(
            &scheduler.config().weights,
            Grade::Good,
            6.46,
            3.173,
            3.173 * 0.9,
            scheduler.config().desired_retention,
        )
        .unwrap();
        assert_eq!(outcome.state.stability, expected.stability);
        assert_eq!(outcome.state.difficulty, expected.difficulty);
        assert_eq!(outcome.interval_days, expected.interval_days);
    }

    #[test]
    fn test_future_timestamp_treated_as_same_day() {
        let scheduler = Scheduler::default();
        // Clock skew: last review recorded after "now"
        let state = MemoryState {
            difficulty: 6.46,
            stability: 3.173,
            last_reviewed_at: Some(now() + Duration::days(1)),
        };

        let outcome = scheduler.grade_card(&state, Grade::Good, now()).unwrap();
        // Elapsed clamps to 0, so the same-day branch leaves difficulty alone
        assert_eq!(outcome.state.difficulty, 6.46);
    }

    #[test]
    fn test_preview_intervals_ordered_by_grade() {
        let scheduler = Scheduler::default();
        let state = MemoryState {
            difficulty: 6.46,
            stability: 3.173,
            last_reviewed_at: Some(now() - Duration::days(3)),
        };

        let [again, hard, good, easy] = scheduler.preview_intervals(&state, now()).unwrap();
        assert_eq!(again, 0.0);
        assert!(hard <= good);
        assert!(good <= easy);
    }

    #[test]
    fn test_grading_is_idempotent() {
        let scheduler = Scheduler::default();
        let state = MemoryState {
            difficulty: 6.46,
            stability: 3.173,
            last_reviewed_at: Some(now() - Duration::days(2)),
        };

        let a = scheduler.grade_card(&state, Grade::Hard, now()).unwrap();
        let b = scheduler.grade_card(&state, Grade::Hard, now()).unwrap();
        assert_eq!(a, b);
        // Input state untouched
        assert_eq!(state.stability, 3.173);
    }

    #[test]
    fn test_retention_target_is_configurable() {
        let strict = Scheduler::new(SchedulerConfig::with_retention(0.95));
        let lax = Scheduler::new(SchedulerConfig::with_retention(0.8));
        let state = MemoryState {
            difficulty: 5.0,
            stability: 10.0,
            last_reviewed_at: Some(now() - Duration::days(10)),
        };

        let strict_interval = strict.grade_card(&state, Grade::Good, now()).unwrap();
        let lax_interval = lax.grade_card(&state, Grade::Good, now()).unwrap();
        assert!(strict_interval.interval_days < lax_interval.interval_days);
    }

    #[test]
    fn test_scheduler_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Scheduler>();
    }
}
