use sqlx::PgPool;
use uuid::Uuid;

use super::types::{Feed, FeedWithOwner};

pub async fn create_feed(
    pool: &PgPool,
    name: &str,
    url: &str,
    user_id: Uuid,
) -> Result<Feed, sqlx::Error> {
    sqlx::query_as::<_, Feed>(
        "INSERT INTO feeds (name, url, user_id)
         VALUES ($1, $2, $3)
         RETURNING id, created_at, updated_at, name, url, user_id, last_fetched_at",
    )
    .bind(name)
    .bind(url)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn get_feed_by_url(pool: &PgPool, url: &str) -> Result<Option<Feed>, sqlx::Error> {
    sqlx::query_as::<_, Feed>(
        "SELECT id, created_at, updated_at, name, url, user_id, last_fetched_at
         FROM feeds
         WHERE url = $1",
    )
    .bind(url)
    .fetch_optional(pool)
    .await
}

pub async fn list_feeds(pool: &PgPool) -> Result<Vec<FeedWithOwner>, sqlx::Error> {
    sqlx::query_as::<_, FeedWithOwner>(
        "SELECT f.name, f.url, u.name AS owner, f.last_fetched_at
         FROM feeds f
         JOIN users u ON u.id = f.user_id
         ORDER BY f.created_at",
    )
    .fetch_all(pool)
    .await
}

// Never-fetched feeds first, then oldest; ties broken by registration order.
pub async fn next_feed_to_fetch(pool: &PgPool) -> Result<Option<Feed>, sqlx::Error> {
    sqlx::query_as::<_, Feed>(
        "SELECT id, created_at, updated_at, name, url, user_id, last_fetched_at
         FROM feeds
         ORDER BY last_fetched_at ASC NULLS FIRST, created_at ASC
         LIMIT 1",
    )
    .fetch_optional(pool)
    .await
}

pub async fn mark_feed_fetched(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE feeds
         SET last_fetched_at = now(), updated_at = now()
         WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

// Selection-policy tests against a real store. They reset the database, so
// point DATABASE_URL at a dedicated test instance and run them one at a
// time: cargo test -- --ignored --test-threads=1
#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::db as user_db;
    use chrono::{DateTime, Utc};

    async fn fresh_pool() -> PgPool {
        let dsn = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPool::connect(&dsn).await.expect("could not connect");
        sqlx::migrate!().run(&pool).await.expect("could not migrate");
        user_db::delete_all_users(&pool).await.expect("could not reset");
        pool
    }

    async fn set_last_fetched(pool: &PgPool, id: Uuid, at: DateTime<Utc>) {
        sqlx::query("UPDATE feeds SET last_fetched_at = $1 WHERE id = $2")
            .bind(at)
            .bind(id)
            .execute(pool)
            .await
            .expect("could not backdate feed");
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
    async fn never_fetched_feeds_win_over_fetched_ones() {
        let pool = fresh_pool().await;
        let user = user_db::create_user(&pool, "selector").await.unwrap();

        let a = create_feed(&pool, "a", "https://a.example/feed", user.id).await.unwrap();
        let b = create_feed(&pool, "b", "https://b.example/feed", user.id).await.unwrap();
        let c = create_feed(&pool, "c", "https://c.example/feed", user.id).await.unwrap();

        let t1 = "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let t2 = "2024-06-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        set_last_fetched(&pool, a.id, t1).await;
        set_last_fetched(&pool, c.id, t2).await;

        // [t1, null, t2] -> the never-fetched feed goes first
        let next = next_feed_to_fetch(&pool).await.unwrap().unwrap();
        assert_eq!(next.id, b.id);
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
    async fn oldest_fetch_timestamp_wins_when_none_are_null() {
        let pool = fresh_pool().await;
        let user = user_db::create_user(&pool, "selector").await.unwrap();

        let a = create_feed(&pool, "a", "https://a.example/feed", user.id).await.unwrap();
        let b = create_feed(&pool, "b", "https://b.example/feed", user.id).await.unwrap();

        let t1 = "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let t2 = "2024-06-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        set_last_fetched(&pool, a.id, t2).await;
        set_last_fetched(&pool, b.id, t1).await;

        let next = next_feed_to_fetch(&pool).await.unwrap().unwrap();
        assert_eq!(next.id, b.id);
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
    async fn ties_break_by_registration_order() {
        let pool = fresh_pool().await;
        let user = user_db::create_user(&pool, "selector").await.unwrap();

        let a = create_feed(&pool, "a", "https://a.example/feed", user.id).await.unwrap();
        let _b = create_feed(&pool, "b", "https://b.example/feed", user.id).await.unwrap();

        // both never fetched -> the earlier-registered feed goes first
        let next = next_feed_to_fetch(&pool).await.unwrap().unwrap();
        assert_eq!(next.id, a.id);
    }
}
