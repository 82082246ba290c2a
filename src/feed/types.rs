use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct Feed {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub url: String,
    pub user_id: Uuid,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct FeedWithOwner {
    pub name: String,
    pub url: String,
    pub owner: String,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct FeedAddResult {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub owner: String,
}

#[derive(Serialize)]
pub struct FeedList {
    pub feeds: Vec<FeedWithOwner>,
}
