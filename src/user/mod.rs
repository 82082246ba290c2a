use anyhow::{Context, Result, bail};
use clap::Args;
use sqlx::PgPool;

use crate::config::Config;
use crate::telemetry::ops::user::Phase as UserPhase;
use crate::telemetry::{self};

pub mod db;
pub mod types;

/// gather register <name>
#[derive(Args)]
pub struct RegisterCmd {
    /// username to create and select
    pub name: String,
}

/// gather login <name>
#[derive(Args)]
pub struct LoginCmd {
    /// username to select
    pub name: String,
}

pub async fn register(pool: &PgPool, config: &mut Config, args: RegisterCmd) -> Result<()> {
    let log = telemetry::user();
    let _g = log.root_span().entered();
    let _s = log.span(&UserPhase::Register).entered();

    if db::get_user_by_name(pool, &args.name).await?.is_some() {
        bail!("user {:?} already exists", args.name);
    }
    let user = db::create_user(pool, &args.name)
        .await
        .context("could not create user")?;
    config.set_current_user(&user.name)?;

    log.info_kv(
        &format!("👤 registered {} and logged in", user.name),
        [("name", user.name.clone()), ("id", user.id.to_string())],
    );
    if telemetry::config::json_mode() {
        log.result(&types::RegisterResult { id: user.id, name: user.name })?;
    }
    Ok(())
}

pub async fn login(pool: &PgPool, config: &mut Config, args: LoginCmd) -> Result<()> {
    let log = telemetry::user();
    let _g = log.root_span().entered();
    let _s = log.span(&UserPhase::Login).entered();

    let Some(user) = db::get_user_by_name(pool, &args.name).await? else {
        bail!("user {:?} not found; run `gather register {}`", args.name, args.name);
    };
    config.set_current_user(&user.name)?;

    log.info(format!("👤 logged in as {}", user.name));
    Ok(())
}

pub async fn users(pool: &PgPool, config: &Config) -> Result<()> {
    let log = telemetry::user();
    let _g = log.root_span().entered();
    let _s = log.span(&UserPhase::List).entered();

    let users = db::list_users(pool).await?;
    let current = config.current_user_name.as_deref();

    let mut rows = Vec::with_capacity(users.len());
    for user in &users {
        let is_current = Some(user.name.as_str()) == current;
        log.info(format!(
            "* {}{}",
            user.name,
            if is_current { " (current)" } else { "" }
        ));
        rows.push(types::UserRow { name: user.name.clone(), current: is_current });
    }
    if telemetry::config::json_mode() {
        log.result(&types::UserList { users: rows })?;
    }
    Ok(())
}

pub async fn reset(pool: &PgPool) -> Result<()> {
    let log = telemetry::user();
    let _g = log.root_span().entered();
    let _s = log.span(&UserPhase::Reset).entered();

    let users_deleted = db::delete_all_users(pool).await?;
    log.info(format!("🗑️ database reset ({users_deleted} user(s) removed)"));
    if telemetry::config::json_mode() {
        log.result(&types::ResetResult { users_deleted })?;
    }
    Ok(())
}
