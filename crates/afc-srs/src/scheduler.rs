//! Rating transitions.
//!
//! The scheduling law is a single decision table over the rating:
//!
//! | rating | interval                 | ease factor                 |
//! |--------|--------------------------|-----------------------------|
//! | easy   | `max(interval * 2, 1)`   | `ease + 0.15`               |
//! | good   | `max(interval + 1, 1)`   | unchanged                   |
//! | hard   | `1`                      | `max(ease - 0.15, 1.3)`     |
//! | again  | `0`                      | unchanged                   |
//!
//! Growing intervals stop at [`MAX_INTERVAL_DAYS`]. After the table,
//! repetitions either reset (`again`) or increment, and the due date becomes
//! the rating time plus the new interval in days.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    EASE_STEP, MAX_INTERVAL_DAYS, MIN_EASE_FACTOR, Rating, ReviewState, ReviewStatus,
};

/// Changes submitted by a user for one card.
///
/// Both fields are optional: a status can be set without rating the card,
/// and a rating without a status leaves the status as it was.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewUpdate {
    /// Rating to schedule with.
    #[serde(default, rename = "last_rating")]
    pub rating: Option<Rating>,
    /// Explicit status transition.
    #[serde(default)]
    pub status: Option<ReviewStatus>,
}

impl ReviewUpdate {
    /// Update carrying only a rating.
    pub const fn rating(rating: Rating) -> Self {
        Self {
            rating: Some(rating),
            status: None,
        }
    }

    /// Whether the update would change nothing.
    pub const fn is_empty(&self) -> bool {
        self.rating.is_none() && self.status.is_none()
    }
}

/// Compute the next state after the user rates a card.
///
/// # Arguments
///
/// * `state` - Current scheduling state
/// * `rating` - The user's rating
/// * `now` - Time of the review event
///
/// # Returns
///
/// The new state. `status` is carried over unchanged.
pub fn apply_rating(state: &ReviewState, rating: Rating, now: DateTime<Utc>) -> ReviewState {
    let (interval, ease_factor) = match rating {
        Rating::Easy => (
            state.interval.saturating_mul(2).clamp(1, MAX_INTERVAL_DAYS),
            state.ease_factor + EASE_STEP,
        ),
        Rating::Good => (
            state.interval.saturating_add(1).clamp(1, MAX_INTERVAL_DAYS),
            state.ease_factor,
        ),
        Rating::Hard => (1, (state.ease_factor - EASE_STEP).max(MIN_EASE_FACTOR)),
        Rating::Again => (0, state.ease_factor),
    };

    let repetitions = match rating {
        Rating::Again => 0,
        _ => state.repetitions.saturating_add(1),
    };

    ReviewState {
        ease_factor,
        interval,
        repetitions,
        due_date: due_after(now, interval),
        last_rating: Some(rating),
        status: state.status,
    }
}

/// Apply a user-submitted update: store the status, then schedule the rating.
pub fn apply_update(state: &ReviewState, update: &ReviewUpdate, now: DateTime<Utc>) -> ReviewState {
    let mut next = match update.rating {
        Some(rating) => apply_rating(state, rating, now),
        None => state.clone(),
    };
    if let Some(status) = update.status {
        next.status = status;
    }
    next
}

/// Restore the defaults of a never-studied card, due at `now`.
///
/// Idempotent for a fixed `now`.
pub fn reset_state(_state: &ReviewState, now: DateTime<Utc>) -> ReviewState {
    ReviewState::new(now)
}

/// `now + interval` days. Only a `now` within a century of the end of
/// representable time needs the clamp.
fn due_after(now: DateTime<Utc>, interval: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(interval)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
