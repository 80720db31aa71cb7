use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Rating, ReviewState};

/// Anything carrying a due date can be ordered into a study queue.
pub trait Scheduled {
    /// When the item becomes eligible for review.
    fn due_date(&self) -> DateTime<Utc>;

    /// Most recent rating, if any.
    fn last_rating(&self) -> Option<Rating>;
}

impl Scheduled for ReviewState {
    fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    fn last_rating(&self) -> Option<Rating> {
        self.last_rating
    }
}

impl<T: Scheduled + ?Sized> Scheduled for &T {
    fn due_date(&self) -> DateTime<Utc> {
        (**self).due_date()
    }

    fn last_rating(&self) -> Option<Rating> {
        (**self).last_rating()
    }
}

/// Order a collection into the study queue.
///
/// Items due at or before `now` come first, soonest due first. When nothing is
/// due the whole collection is returned in due order instead, so the card
/// coming up next still surfaces. Items with equal due dates keep their input
/// order.
pub fn review_queue<T, I>(items: I, now: DateTime<Utc>) -> Vec<T>
where
    T: Scheduled,
    I: IntoIterator<Item = T>,
{
    let mut all: Vec<T> = items.into_iter().collect();
    all.sort_by_key(|item| item.due_date());

    // Sorted, so the due items are a prefix
    let due = all.partition_point(|item| item.due_date() <= now);
    if due > 0 {
        all.truncate(due);
    }
    all
}

/// How many cards carry each last rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RatingDistribution {
    /// Cards last rated `again`.
    pub again: u64,
    /// Cards last rated `hard`.
    pub hard: u64,
    /// Cards last rated `good`.
    pub good: u64,
    /// Cards last rated `easy`.
    pub easy: u64,
    /// Cards never rated since creation or the last reset.
    pub none: u64,
}

impl RatingDistribution {
    /// Tally the last ratings of a collection.
    pub fn from_states<T, I>(items: I) -> Self
    where
        T: Scheduled,
        I: IntoIterator<Item = T>,
    {
        items.into_iter().fold(Self::default(), |mut acc, item| {
            match item.last_rating() {
                Some(Rating::Again) => acc.again += 1,
                Some(Rating::Hard) => acc.hard += 1,
                Some(Rating::Good) => acc.good += 1,
                Some(Rating::Easy) => acc.easy += 1,
                None => acc.none += 1,
            }
            acc
        })
    }

    /// Total number of cards counted.
    pub const fn total(&self) -> u64 {
        self.again + self.hard + self.good + self.easy + self.none
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::apply_rating;

    fn t() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 20, 9, 0, 0).unwrap()
    }

    fn due_at(due_date: DateTime<Utc>) -> ReviewState {
        ReviewState {
            due_date,
            ..ReviewState::new(t())
        }
    }

    #[test]
    fn test_queue_falls_back_when_nothing_due() {
        let states = vec![
            due_at(t() + Duration::days(3)),
            due_at(t() + Duration::days(1)),
        ];

        let queue = review_queue(&states, t());
        let dates: Vec<_> = queue.iter().map(|s| s.due_date).collect();
        assert_eq!(dates, vec![t() + Duration::days(1), t() + Duration::days(3)]);
    }

    #[test]
    fn test_queue_only_due_items() {
        let states = vec![
            due_at(t() + Duration::days(2)),
            due_at(t()),
            due_at(t() - Duration::days(4)),
            due_at(t() - Duration::hours(1)),
        ];

        let queue = review_queue(states, t());
        let dates: Vec<_> = queue.iter().map(|s| s.due_date).collect();
        assert_eq!(
            dates,
            vec![t() - Duration::days(4), t() - Duration::hours(1), t()]
        );
    }

    #[test]
    fn test_queue_empty_collection() {
        let queue = review_queue(Vec::<ReviewState>::new(), t());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_ties_keep_input_order() {
        let mut first = due_at(t());
        first.repetitions = 1;
        let mut second = due_at(t());
        second.repetitions = 2;

        let queue = review_queue([&first, &second], t());
        assert_eq!(queue[0].repetitions, 1);
        assert_eq!(queue[1].repetitions, 2);
    }

    #[test]
    fn test_distribution() {
        let fresh = ReviewState::new(t());
        let states = vec![
            apply_rating(&fresh, Rating::Again, t()),
            apply_rating(&fresh, Rating::Good, t()),
            apply_rating(&fresh, Rating::Good, t()),
            apply_rating(&fresh, Rating::Easy, t()),
            fresh.clone(),
        ];

        let distribution = RatingDistribution::from_states(&states);
        assert_eq!(
            distribution,
            RatingDistribution {
                again: 1,
                hard: 0,
                good: 2,
                easy: 1,
                none: 1,
            }
        );
        assert_eq!(distribution.total(), 5);
    }
}
