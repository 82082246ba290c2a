use sqlx::PgPool;
use uuid::Uuid;

use super::types::FollowedFeed;

// Ok(false) means the follow already existed.
pub async fn create_follow(pool: &PgPool, user_id: Uuid, feed_id: Uuid) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO feed_follows (user_id, feed_id)
         VALUES ($1, $2)
         ON CONFLICT (user_id, feed_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(feed_id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() == 1)
}

pub async fn list_follows_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<FollowedFeed>, sqlx::Error> {
    sqlx::query_as::<_, FollowedFeed>(
        "SELECT f.name, f.url
         FROM feed_follows ff
         JOIN feeds f ON f.id = ff.feed_id
         WHERE ff.user_id = $1
         ORDER BY ff.created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn delete_follow(pool: &PgPool, user_id: Uuid, feed_id: Uuid) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(
        "DELETE FROM feed_follows
         WHERE user_id = $1 AND feed_id = $2",
    )
    .bind(user_id)
    .bind(feed_id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() == 1)
}
