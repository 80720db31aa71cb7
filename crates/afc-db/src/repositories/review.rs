use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{ReviewStateColumns, UserCard};

pub async fn get_user_card<'e, E>(
    executor: E,
    user_id: Uuid,
    card_id: Uuid,
) -> Result<Option<UserCard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT uc.id, uc.user_id, uc.card_id, c.deck_id, uc.ease_factor,
                   uc.interval_days, uc.repetitions, uc.due_date, uc.last_rating,
                   uc.status, uc.updated_at
            FROM user_cards uc
            JOIN cards c ON c.id = uc.card_id
            WHERE uc.user_id = $1 AND uc.card_id = $2
        "#,
    )
    .bind(user_id)
    .bind(card_id)
    .fetch_optional(executor)
    .await
}

/// Same as [`get_user_card`] but takes a row lock held until the
/// surrounding transaction ends, so concurrent ratings of one card serialize.
pub async fn lock_user_card<'e, E>(
    executor: E,
    user_id: Uuid,
    card_id: Uuid,
) -> Result<Option<UserCard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT uc.id, uc.user_id, uc.card_id, c.deck_id, uc.ease_factor,
                   uc.interval_days, uc.repetitions, uc.due_date, uc.last_rating,
                   uc.status, uc.updated_at
            FROM user_cards uc
            JOIN cards c ON c.id = uc.card_id
            WHERE uc.user_id = $1 AND uc.card_id = $2
            FOR UPDATE OF uc
        "#,
    )
    .bind(user_id)
    .bind(card_id)
    .fetch_optional(executor)
    .await
}

pub async fn save_review_state<'e, E>(
    executor: E,
    id: Uuid,
    columns: &ReviewStateColumns,
) -> Result<UserCard, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            WITH updated AS (
                UPDATE user_cards
                SET ease_factor = $2,
                    interval_days = $3,
                    repetitions = $4,
                    due_date = $5,
                    last_rating = $6,
                    status = $7,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT u.id, u.user_id, u.card_id, c.deck_id, u.ease_factor,
                   u.interval_days, u.repetitions, u.due_date, u.last_rating,
                   u.status, u.updated_at
            FROM updated u
            JOIN cards c ON c.id = u.card_id
        "#,
    )
    .bind(id)
    .bind(columns.ease_factor)
    .bind(columns.interval_days)
    .bind(columns.repetitions)
    .bind(columns.due_date)
    .bind(columns.last_rating)
    .bind(columns.status)
    .fetch_one(executor)
    .await
}

/// Create the default review state for one card if the user has none.
///
/// Returns `true` when a row was inserted.
pub async fn ensure_user_card<'e, E>(
    executor: E,
    user_id: Uuid,
    card_id: Uuid,
    now: DateTime<Utc>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO user_cards (user_id, card_id, due_date)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, card_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(card_id)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Create default review states for every card of a deck the user lacks.
///
/// Returns the number of rows inserted.
pub async fn ensure_deck_user_cards<'e, E>(
    executor: E,
    user_id: Uuid,
    deck_id: Uuid,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO user_cards (user_id, card_id, due_date)
            SELECT $1, c.id, $3
            FROM cards c
            WHERE c.deck_id = $2
            ON CONFLICT (user_id, card_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(deck_id)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Create default review states for every card in the global starter decks.
pub async fn ensure_starter_user_cards<'e, E>(
    executor: E,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO user_cards (user_id, card_id, due_date)
            SELECT $1, c.id, $2
            FROM cards c
            JOIN decks d ON d.id = c.deck_id
            WHERE d.owner_id IS NULL
            ON CONFLICT (user_id, card_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// All review states of a user, optionally limited to one deck, soonest due first.
pub async fn list_user_cards<'e, E>(
    executor: E,
    user_id: Uuid,
    deck_id: Option<Uuid>,
) -> Result<Vec<UserCard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT uc.id, uc.user_id, uc.card_id, c.deck_id, uc.ease_factor,
                   uc.interval_days, uc.repetitions, uc.due_date, uc.last_rating,
                   uc.status, uc.updated_at
            FROM user_cards uc
            JOIN cards c ON c.id = uc.card_id
            WHERE uc.user_id = $1
                AND ($2::uuid IS NULL OR c.deck_id = $2)
            ORDER BY uc.due_date, uc.id
        "#,
    )
    .bind(user_id)
    .bind(deck_id)
    .fetch_all(executor)
    .await
}

/// Overwrite the scheduling columns of every matching row with `columns`.
///
/// Returns the updated rows, soonest due first.
pub async fn reset_user_cards<'e, E>(
    executor: E,
    user_id: Uuid,
    deck_id: Option<Uuid>,
    columns: &ReviewStateColumns,
) -> Result<Vec<UserCard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            WITH updated AS (
                UPDATE user_cards uc
                SET ease_factor = $3,
                    interval_days = $4,
                    repetitions = $5,
                    due_date = $6,
                    last_rating = $7,
                    status = $8,
                    updated_at = NOW()
                FROM cards c
                WHERE c.id = uc.card_id
                    AND uc.user_id = $1
                    AND ($2::uuid IS NULL OR c.deck_id = $2)
                RETURNING uc.id, uc.user_id, uc.card_id, c.deck_id, uc.ease_factor,
                          uc.interval_days, uc.repetitions, uc.due_date, uc.last_rating,
                          uc.status, uc.updated_at
            )
            SELECT * FROM updated
            ORDER BY due_date, id
        "#,
    )
    .bind(user_id)
    .bind(deck_id)
    .bind(columns.ease_factor)
    .bind(columns.interval_days)
    .bind(columns.repetitions)
    .bind(columns.due_date)
    .bind(columns.last_rating)
    .bind(columns.status)
    .fetch_all(executor)
    .await
}
