use anyhow::{Result, bail};
use sqlx::PgPool;

use crate::config::Config;
use crate::user::types::User;

/// The identity a login-gated command runs as, resolved once in main and
/// passed down explicitly.
pub struct Session {
    pub user: User,
}

pub async fn require_user(pool: &PgPool, config: &Config) -> Result<Session> {
    let Some(name) = config.current_user_name.as_deref() else {
        bail!("not logged in; run `gather login <name>` first");
    };
    match crate::user::db::get_user_by_name(pool, name).await? {
        Some(user) => Ok(Session { user }),
        None => bail!("current user {name:?} does not exist; run `gather register {name}`"),
    }
}
