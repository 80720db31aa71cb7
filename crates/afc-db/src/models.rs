use afc_srs::{Rating, ReviewState, ReviewStatus, Scheduled};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stored review state of one card for one user.
/// Unique on (user_id, card_id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserCard {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user (indexed with due_date)
    pub user_id: Uuid,
    /// Card being scheduled
    pub card_id: Uuid,
    /// Deck the card belongs to (joined from cards)
    pub deck_id: Uuid,
    /// Recall-difficulty weighting, never below 1.3
    pub ease_factor: f64,
    /// Days until the next review
    pub interval_days: i32,
    /// Consecutive reviews not rated `again`
    pub repetitions: i32,
    /// When the card becomes due
    pub due_date: DateTime<Utc>,
    /// Last rating, NULL before the first review
    pub last_rating: Option<String>,
    /// One of `new`, `known`, `review`
    pub status: String,
    /// Last time the row was written
    pub updated_at: DateTime<Utc>,
}

/// A stored row holds a value the scheduler cannot represent.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("user card {id}: {source}")]
    Rating {
        id: Uuid,
        #[source]
        source: afc_srs::InvalidRatingError,
    },
    #[error("user card {id}: {source}")]
    Status {
        id: Uuid,
        #[source]
        source: afc_srs::InvalidStatusError,
    },
    #[error("user card {id}: negative {field} ({value})")]
    Negative {
        id: Uuid,
        field: &'static str,
        value: i32,
    },
    #[error("user card {id}: {field} {value} does not fit in a database integer")]
    Overflow {
        id: Uuid,
        field: &'static str,
        value: u32,
    },
}

impl UserCard {
    /// Decode the scheduling columns.
    pub fn review_state(&self) -> Result<ReviewState, RowError> {
        let last_rating = self
            .last_rating
            .as_deref()
            .map(str::parse::<Rating>)
            .transpose()
            .map_err(|source| RowError::Rating {
                id: self.id,
                source,
            })?;
        let status = self
            .status
            .parse::<ReviewStatus>()
            .map_err(|source| RowError::Status {
                id: self.id,
                source,
            })?;

        Ok(ReviewState {
            ease_factor: self.ease_factor,
            interval: self.non_negative("interval_days", self.interval_days)?,
            repetitions: self.non_negative("repetitions", self.repetitions)?,
            due_date: self.due_date,
            last_rating,
            status,
        })
    }

    fn non_negative(&self, field: &'static str, value: i32) -> Result<u32, RowError> {
        u32::try_from(value).map_err(|_| RowError::Negative {
            id: self.id,
            field,
            value,
        })
    }
}

/// Scheduling columns in their stored representation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewStateColumns {
    pub ease_factor: f64,
    pub interval_days: i32,
    pub repetitions: i32,
    pub due_date: DateTime<Utc>,
    pub last_rating: Option<&'static str>,
    pub status: &'static str,
}

impl ReviewStateColumns {
    /// Encode a state for storage on the row `id`.
    pub fn encode(id: Uuid, state: &ReviewState) -> Result<Self, RowError> {
        let to_column = |field: &'static str, value: u32| {
            i32::try_from(value).map_err(|_| RowError::Overflow { id, field, value })
        };

        Ok(Self {
            ease_factor: state.ease_factor,
            interval_days: to_column("interval_days", state.interval)?,
            repetitions: to_column("repetitions", state.repetitions)?,
            due_date: state.due_date,
            last_rating: state.last_rating.map(Rating::as_str),
            status: state.status.as_str(),
        })
    }
}

impl Scheduled for UserCard {
    fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    fn last_rating(&self) -> Option<Rating> {
        // Unparseable values count as unrated; review_state() reports them
        self.last_rating.as_deref().and_then(|r| r.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use afc_srs::{MAX_INTERVAL_DAYS, apply_rating};
    use chrono::{Duration, TimeZone};

    use super::*;

    fn row() -> UserCard {
        let now = Utc.with_ymd_and_hms(2025, 6, 20, 23, 48, 0).unwrap();
        UserCard {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            card_id: Uuid::new_v4(),
            deck_id: Uuid::new_v4(),
            ease_factor: 2.35,
            interval_days: 4,
            repetitions: 2,
            due_date: now,
            last_rating: Some("hard".to_string()),
            status: "review".to_string(),
            updated_at: now,
        }
    }

    #[test]
    fn test_review_state_from_row() {
        let row = row();
        let state = row.review_state().unwrap();

        assert_eq!(state.interval, 4);
        assert_eq!(state.repetitions, 2);
        assert_eq!(state.last_rating, Some(Rating::Hard));
        assert_eq!(state.status, ReviewStatus::Review);
        assert_eq!(state.due_date, row.due_date);
    }

    #[test]
    fn test_unrated_row() {
        let mut row = row();
        row.last_rating = None;

        assert_eq!(row.review_state().unwrap().last_rating, None);
        assert_eq!(Scheduled::last_rating(&row), None);
    }

    #[test]
    fn test_corrupt_rows_are_rejected() {
        let mut bad_rating = row();
        bad_rating.last_rating = Some("Again".to_string());
        assert!(matches!(
            bad_rating.review_state(),
            Err(RowError::Rating { .. })
        ));

        let mut bad_status = row();
        bad_status.status = "learning".to_string();
        assert!(matches!(
            bad_status.review_state(),
            Err(RowError::Status { .. })
        ));

        let mut negative = row();
        negative.interval_days = -1;
        assert!(matches!(
            negative.review_state(),
            Err(RowError::Negative {
                field: "interval_days",
                ..
            })
        ));
    }

    #[test]
    fn test_encode_columns() {
        let row = row();
        let state = row.review_state().unwrap();
        let columns = ReviewStateColumns::encode(row.id, &state).unwrap();

        assert_eq!(columns.interval_days, row.interval_days);
        assert_eq!(columns.repetitions, row.repetitions);
        assert_eq!(columns.last_rating, Some("hard"));
        assert_eq!(columns.status, "review");
    }

    #[test]
    fn test_encode_overflow() {
        let mut state = row().review_state().unwrap();
        state.interval = u32::MAX;

        assert!(matches!(
            ReviewStateColumns::encode(Uuid::new_v4(), &state),
            Err(RowError::Overflow { .. })
        ));
    }

    #[test]
    fn test_repeated_easy_always_fits_columns() {
        let now = Utc.with_ymd_and_hms(2025, 6, 21, 8, 0, 0).unwrap();
        let id = Uuid::new_v4();
        let mut state = ReviewState::new(now);

        for _ in 0..40 {
            state = apply_rating(&state, Rating::Easy, now);
            let columns = ReviewStateColumns::encode(id, &state).unwrap();

            assert_eq!(columns.interval_days as u32, state.interval);
            assert_eq!(
                columns.due_date,
                now + Duration::days(i64::from(columns.interval_days))
            );
        }
        assert_eq!(state.interval, MAX_INTERVAL_DAYS);
    }
}
