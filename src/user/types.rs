use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
}

#[derive(Serialize)]
pub struct RegisterResult {
    pub id: Uuid,
    pub name: String,
}

#[derive(Serialize)]
pub struct UserRow {
    pub name: String,
    pub current: bool,
}

#[derive(Serialize)]
pub struct UserList {
    pub users: Vec<UserRow>,
}

#[derive(Serialize)]
pub struct ResetResult {
    pub users_deleted: u64,
}
