use afc_db::models::RowError;
use afc_srs::{InvalidRatingError, InvalidStatusError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error(transparent)]
    InvalidRating(#[from] InvalidRatingError),
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatusError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Corrupt review state: {0}")]
    CorruptState(#[from] RowError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ReviewError {
    /// Whether the caller supplied bad input, as opposed to a server-side failure.
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRating(_) | Self::InvalidStatus(_) | Self::NotFound(_)
        )
    }
}
