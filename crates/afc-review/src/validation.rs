use afc_srs::{Rating, ReviewStatus, ReviewUpdate};

use crate::error::ReviewError;

/// Parse the raw fields of a review submission.
///
/// Absent fields stay absent; present ones must name a known rating or status.
///
/// # Examples
/// ```
/// use afc_review::validation::parse_review_update;
///
/// assert!(parse_review_update(Some("good"), None).is_ok());
/// assert!(parse_review_update(Some("Good"), None).is_err());
/// ```
pub fn parse_review_update(
    rating: Option<&str>,
    status: Option<&str>,
) -> Result<ReviewUpdate, ReviewError> {
    Ok(ReviewUpdate {
        rating: rating.map(str::parse::<Rating>).transpose()?,
        status: status.map(str::parse::<ReviewStatus>).transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_review_update() {
        let update = parse_review_update(Some("easy"), Some("known")).unwrap();
        assert_eq!(update.rating, Some(Rating::Easy));
        assert_eq!(update.status, Some(ReviewStatus::Known));

        let update = parse_review_update(None, None).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_parse_review_update_rejects_unknown_values() {
        assert!(matches!(
            parse_review_update(Some("perfect"), None),
            Err(ReviewError::InvalidRating(_))
        ));
        assert!(matches!(
            parse_review_update(Some("good"), Some("learning")),
            Err(ReviewError::InvalidStatus(_))
        ));
        // An empty rating is not "no rating"
        assert!(parse_review_update(Some(""), None).is_err());
    }
}
