use sqlx::PgPool;

use super::types::User;

pub async fn create_user(pool: &PgPool, name: &str) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (name)
         VALUES ($1)
         RETURNING id, created_at, updated_at, name",
    )
    .bind(name)
    .fetch_one(pool)
    .await
}

pub async fn get_user_by_name(pool: &PgPool, name: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, created_at, updated_at, name
         FROM users
         WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, created_at, updated_at, name
         FROM users
         ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

// Feeds, follows and posts go with their owners via ON DELETE CASCADE.
pub async fn delete_all_users(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM users").execute(pool).await?;
    Ok(res.rows_affected())
}
