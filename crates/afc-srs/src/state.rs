use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_EASE_FACTOR, Rating, ReviewStatus};

/// Scheduling state of one card for one user.
///
/// Invariants upheld by every transition in this crate:
/// * `ease_factor >= MIN_EASE_FACTOR`
/// * `repetitions` is zero right after an `again` rating
/// * `due_date` is the rating time plus `interval` days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    /// Recall-difficulty weighting; higher means easier.
    pub ease_factor: f64,
    /// Days until the card is due again.
    pub interval: u32,
    /// Consecutive reviews not rated `again`.
    pub repetitions: u32,
    /// When the card becomes eligible for review.
    pub due_date: DateTime<Utc>,
    /// Most recent rating, `None` before the first review.
    pub last_rating: Option<Rating>,
    /// Learning status set by the user.
    pub status: ReviewStatus,
}

impl ReviewState {
    /// Fresh state for a card that just became visible, due immediately.
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 0,
            repetitions: 0,
            due_date: now,
            last_rating: None,
            status: ReviewStatus::New,
        }
    }

    /// Whether the card is eligible for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date <= now
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let state = ReviewState::new(now);

        assert_eq!(state.ease_factor, 2.5);
        assert_eq!(state.interval, 0);
        assert_eq!(state.repetitions, 0);
        assert_eq!(state.due_date, now);
        assert_eq!(state.last_rating, None);
        assert_eq!(state.status, ReviewStatus::New);
        assert!(state.is_due(now));
    }

    #[test]
    fn test_is_due() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut state = ReviewState::new(now);
        state.due_date = now + Duration::days(1);

        assert!(!state.is_due(now));
        assert!(state.is_due(now + Duration::days(1)));
        assert!(state.is_due(now + Duration::days(2)));
    }
}
