//! SRS (Spaced Repetition System) library for the flashcard review queue
//!
//! This crate provides the scheduling law applied when a user rates a card,
//! the reset operation and the ordering policy used to build a study queue.
//! Everything here is pure: callers supply the current time and own
//! persistence.

mod queue;
mod rating;
mod scheduler;
mod state;

pub use queue::{RatingDistribution, Scheduled, review_queue};
pub use rating::{InvalidRatingError, InvalidStatusError, Rating, ReviewStatus};
pub use scheduler::{ReviewUpdate, apply_rating, apply_update, reset_state};
pub use state::ReviewState;

/// Ease factor given to a card that has never been rated.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Lower bound for the ease factor.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Amount the ease factor moves on an `easy` or `hard` rating.
pub const EASE_STEP: f64 = 0.15;

/// Longest interval the scheduler will hand out, in days (about a century).
///
/// Keeps `due_date` exactly `now + interval` days and the interval within a
/// 32-bit signed column however many `easy` ratings pile up.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;
