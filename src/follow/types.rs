use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize)]
pub struct FollowedFeed {
    pub name: String,
    pub url: String,
}

#[derive(Serialize)]
pub struct FollowResult {
    pub user: String,
    pub feed: String,
    pub created: bool,
}

#[derive(Serialize)]
pub struct FollowingList {
    pub feeds: Vec<FollowedFeed>,
}

#[derive(Serialize)]
pub struct UnfollowResult {
    pub user: String,
    pub feed: String,
    pub removed: bool,
}
