use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

// An already-seen url is the steady-state duplicate case; Ok(false) lets
// ingestion count it instead of failing the cycle.
pub async fn insert_post(
    pool: &PgPool,
    feed_id: Uuid,
    title: &str,
    url: &str,
    description: &str,
    published_at: Option<DateTime<Utc>>,
) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO posts (feed_id, title, url, description, published_at)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (url) DO NOTHING",
    )
    .bind(feed_id)
    .bind(title)
    .bind(url)
    .bind(description)
    .bind(published_at)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() == 1)
}
