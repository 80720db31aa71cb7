use sqlx::{Executor, Postgres};
use uuid::Uuid;

pub async fn deck_exists<'e, E>(executor: E, deck_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(SELECT 1 FROM decks WHERE id = $1)
        "#,
    )
    .bind(deck_id)
    .fetch_one(executor)
    .await
}

pub async fn card_exists<'e, E>(executor: E, card_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(SELECT 1 FROM cards WHERE id = $1)
        "#,
    )
    .bind(card_id)
    .fetch_one(executor)
    .await
}
