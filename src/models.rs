//! Data models for the scheduling engine

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Learner's self-reported recall quality for one review
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Grade {
    /// Failed to recall
    Again = 1,
    /// Recalled with serious difficulty
    Hard = 2,
    /// Recalled with some hesitation
    Good = 3,
    /// Recalled effortlessly
    Easy = 4,
}

impl Grade {
    /// All grades in rating order (Again, Hard, Good, Easy)
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// Ordinal rating value (1-4)
    pub fn rating(self) -> i32 {
        self as i32
    }

    /// Rating as it appears in the scheduling formulas
    pub(crate) fn value(self) -> f64 {
        self as i32 as f64
    }

    /// Parse an ordinal rating (1-4)
    pub fn from_rating(rating: i32) -> Result<Self> {
        match rating {
            1 => Ok(Grade::Again),
            2 => Ok(Grade::Hard),
            3 => Ok(Grade::Good),
            4 => Ok(Grade::Easy),
            _ => Err(SchedulerError::InvalidGrade(rating)),
        }
    }
}

impl FromStr for Grade {
    type Err = SchedulerError;

    /// Map the card store's grade vocabulary to the ordinal grade.
    /// "normal" is the store's historical name for Good.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "again" => Ok(Grade::Again),
            "hard" => Ok(Grade::Hard),
            "normal" | "good" => Ok(Grade::Good),
            "easy" => Ok(Grade::Easy),
            other => Err(SchedulerError::InvalidGradeName(other.to_string())),
        }
    }
}

/// Per-card memory state, owned by the external card store.
///
/// Created in the unseen sentinel state when a card is created, initialized
/// by the first grading, and updated by every grading after that. The store
/// reads and writes it only through the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryState {
    /// Intrinsic item difficulty, within [1, 10] once graded (0 when unseen)
    #[serde(default)]
    pub difficulty: f64,
    /// Days until recall probability decays to the retention target
    /// (0 when unseen, positive afterwards)
    #[serde(default)]
    pub stability: f64,
    /// When the card was last graded; absent before the first review
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// The unseen sentinel state for a card with no prior review
    pub fn new() -> Self {
        Self {
            difficulty: 0.0,
            stability: 0.0,
            last_reviewed_at: None,
        }
    }

    /// Whether the card has never been graded. Zero difficulty and stability
    /// is the sentinel; a state with a positive stability but no timestamp
    /// is a seen card from a store that predates timestamp tracking.
    pub fn is_new(&self) -> bool {
        self.difficulty == 0.0 && self.stability == 0.0
    }
}

impl Default for MemoryState {
    fn default() -> Self {
        Self::new()
    }
}
