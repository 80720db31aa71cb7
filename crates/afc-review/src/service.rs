//! Review operations over stored state.
//!
//! Each operation loads rows, runs the pure scheduler from `afc_srs` and writes
//! the result back. Ratings lock the row for the duration of the transaction
//! so two submissions for the same card cannot interleave.

use std::time::Instant;

use afc_db::{
    models::{ReviewStateColumns, UserCard},
    repositories::{deck, review},
};
use afc_srs::{
    RatingDistribution, ReviewState, ReviewUpdate, apply_update, reset_state, review_queue,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::ReviewError, metrics};

#[derive(Clone, Debug)]
pub struct ReviewService {
    pool: PgPool,
}

impl ReviewService {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply a rating and/or status change to one card.
    ///
    /// The review state is created with defaults first if the user has never
    /// seen the card.
    #[tracing::instrument(skip(self), err)]
    pub async fn rate_card(
        &self,
        user_id: Uuid,
        card_id: Uuid,
        update: ReviewUpdate,
        now: DateTime<Utc>,
    ) -> Result<UserCard, ReviewError> {
        let start = Instant::now();
        let result = self.rate_card_tx(user_id, card_id, update, now).await;
        metrics::record_db_query("rate_card", start.elapsed().as_secs_f64(), result.is_ok());

        if let (Ok(saved), Some(rating)) = (&result, update.rating) {
            metrics::record_rating(rating);
            tracing::debug!(
                interval_days = saved.interval_days,
                ease_factor = saved.ease_factor,
                due_date = %saved.due_date,
                "Card rated {rating}"
            );
        }
        result
    }

    async fn rate_card_tx(
        &self,
        user_id: Uuid,
        card_id: Uuid,
        update: ReviewUpdate,
        now: DateTime<Utc>,
    ) -> Result<UserCard, ReviewError> {
        let mut tx = self.pool.begin().await?;

        let row = match review::lock_user_card(&mut *tx, user_id, card_id).await? {
            Some(row) => row,
            None => {
                if !deck::card_exists(&mut *tx, card_id).await? {
                    return Err(ReviewError::NotFound(format!("card {card_id}")));
                }
                if review::ensure_user_card(&mut *tx, user_id, card_id, now).await? {
                    metrics::record_states_created(1);
                }
                review::lock_user_card(&mut *tx, user_id, card_id)
                    .await?
                    .ok_or_else(|| {
                        ReviewError::NotFound(format!("review state for card {card_id}"))
                    })?
            }
        };

        if update.is_empty() {
            tx.commit().await?;
            return Ok(row);
        }

        let current = row.review_state()?;
        let next = apply_update(&current, &update, now);
        let columns = ReviewStateColumns::encode(row.id, &next)?;
        let saved = review::save_review_state(&mut *tx, row.id, &columns).await?;

        tx.commit().await?;
        Ok(saved)
    }

    /// Restore every review state of the user, or of one deck, to the defaults.
    #[tracing::instrument(skip(self), err)]
    pub async fn reset(
        &self,
        user_id: Uuid,
        deck_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Vec<UserCard>, ReviewError> {
        let start = Instant::now();
        let result = self.reset_rows(user_id, deck_id, now).await;
        metrics::record_db_query("reset", start.elapsed().as_secs_f64(), result.is_ok());

        if let Ok(rows) = &result {
            metrics::record_reset(rows.len() as u64);
            tracing::info!("Reset {} review states", rows.len());
        }
        result
    }

    async fn reset_rows(
        &self,
        user_id: Uuid,
        deck_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Vec<UserCard>, ReviewError> {
        if let Some(deck_id) = deck_id {
            self.require_deck(deck_id).await?;
        }

        let defaults = reset_state(&ReviewState::new(now), now);
        // Row id only labels encoding errors, and defaults always fit
        let columns = ReviewStateColumns::encode(Uuid::nil(), &defaults)?;

        Ok(review::reset_user_cards(&self.pool, user_id, deck_id, &columns).await?)
    }

    /// Cards to study next: the due ones, or everything by due date if none are due.
    #[tracing::instrument(skip(self), err)]
    pub async fn queue(
        &self,
        user_id: Uuid,
        deck_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Vec<UserCard>, ReviewError> {
        let rows = self.load(user_id, deck_id).await?;
        let queue = review_queue(rows, now);

        tracing::debug!("Queue holds {} cards", queue.len());
        Ok(queue)
    }

    /// Count of cards per last rating.
    #[tracing::instrument(skip(self), err)]
    pub async fn distribution(
        &self,
        user_id: Uuid,
        deck_id: Option<Uuid>,
    ) -> Result<RatingDistribution, ReviewError> {
        let rows = self.load(user_id, deck_id).await?;
        Ok(RatingDistribution::from_states(&rows))
    }

    /// Create review states for every starter-deck card, for a newly registered user.
    #[tracing::instrument(skip(self), err)]
    pub async fn bootstrap_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, ReviewError> {
        let start = Instant::now();
        let result = review::ensure_starter_user_cards(&self.pool, user_id, now).await;
        metrics::record_db_query("bootstrap_user", start.elapsed().as_secs_f64(), result.is_ok());

        let created = result?;
        metrics::record_states_created(created);
        tracing::info!("Created {} starter review states", created);
        Ok(created)
    }

    /// Create the review state for a card just added to one of the user's decks.
    ///
    /// Returns `false` if the state already existed.
    #[tracing::instrument(skip(self), err)]
    pub async fn card_added(
        &self,
        user_id: Uuid,
        card_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, ReviewError> {
        if !deck::card_exists(&self.pool, card_id).await? {
            return Err(ReviewError::NotFound(format!("card {card_id}")));
        }

        let created = review::ensure_user_card(&self.pool, user_id, card_id, now).await?;
        if created {
            metrics::record_states_created(1);
        }
        Ok(created)
    }

    /// Create any missing review states for the cards of one deck.
    #[tracing::instrument(skip(self), err)]
    pub async fn backfill_deck(
        &self,
        user_id: Uuid,
        deck_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, ReviewError> {
        self.require_deck(deck_id).await?;

        let created = review::ensure_deck_user_cards(&self.pool, user_id, deck_id, now).await?;
        metrics::record_states_created(created);
        tracing::info!("Backfilled {} review states", created);
        Ok(created)
    }

    async fn load(
        &self,
        user_id: Uuid,
        deck_id: Option<Uuid>,
    ) -> Result<Vec<UserCard>, ReviewError> {
        if let Some(deck_id) = deck_id {
            self.require_deck(deck_id).await?;
        }

        let start = Instant::now();
        let result = review::list_user_cards(&self.pool, user_id, deck_id).await;
        metrics::record_db_query("list_user_cards", start.elapsed().as_secs_f64(), result.is_ok());
        Ok(result?)
    }

    async fn require_deck(&self, deck_id: Uuid) -> Result<(), ReviewError> {
        if deck::deck_exists(&self.pool, deck_id).await? {
            Ok(())
        } else {
            Err(ReviewError::NotFound(format!("deck {deck_id}")))
        }
    }
}
