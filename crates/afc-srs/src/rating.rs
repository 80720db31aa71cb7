use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Self-assessed recall quality submitted after reviewing a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Rating {
    /// Not recalled; the card starts over.
    Again,
    /// Recalled with serious difficulty.
    Hard,
    /// Recalled after some hesitation.
    Good,
    /// Recalled without effort.
    Easy,
}

/// Returned when a rating outside `again|hard|good|easy` is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid rating '{value}': expected one of again, hard, good, easy")]
pub struct InvalidRatingError {
    /// The rejected input.
    pub value: String,
}

impl Rating {
    /// All ratings, in increasing order of recall quality.
    pub const ALL: [Self; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    /// Canonical lowercase name, as stored and sent over the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = InvalidRatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "again" => Ok(Self::Again),
            "hard" => Ok(Self::Hard),
            "good" => Ok(Self::Good),
            "easy" => Ok(Self::Easy),
            other => Err(InvalidRatingError {
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Rating {
    type Error = InvalidRatingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rating> for &'static str {
    fn from(rating: Rating) -> Self {
        rating.as_str()
    }
}

/// Where a card sits in the user's learning cycle.
///
/// The scheduler never changes this on its own; it is set explicitly by the
/// caller alongside (or instead of) a rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ReviewStatus {
    /// Never studied, or reset.
    #[default]
    New,
    /// Marked as known by the user.
    Known,
    /// Marked as needing review.
    Review,
}

/// Returned when a status outside `new|known|review` is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status '{value}': expected one of new, known, review")]
pub struct InvalidStatusError {
    /// The rejected input.
    pub value: String,
}

impl ReviewStatus {
    /// Canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Known => "known",
            Self::Review => "review",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "known" => Ok(Self::Known),
            "review" => Ok(Self::Review),
            other => Err(InvalidStatusError {
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ReviewStatus {
    type Error = InvalidStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReviewStatus> for &'static str {
    fn from(status: ReviewStatus) -> Self {
        status.as_str()
    }
}
