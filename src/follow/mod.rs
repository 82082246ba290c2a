use anyhow::{Result, bail};
use clap::Args;
use sqlx::PgPool;

use crate::feed;
use crate::session::Session;
use crate::telemetry::ops::follow::Phase as FollowPhase;
use crate::telemetry::{self};

pub mod db;
pub mod types;

/// gather follow <url>
#[derive(Args)]
pub struct FollowCmd {
    /// url of an already-registered feed
    pub url: String,
}

/// gather unfollow <url>
#[derive(Args)]
pub struct UnfollowCmd {
    pub url: String,
}

pub async fn follow(pool: &PgPool, session: &Session, args: FollowCmd) -> Result<()> {
    let log = telemetry::follow();
    let _g = log.root_span().entered();
    let _s = log.span_kv(&FollowPhase::Add, [("url", args.url.clone())]).entered();

    let Some(feed) = feed::db::get_feed_by_url(pool, &args.url).await? else {
        bail!("no feed registered with url {:?}; add it with `gather feed add`", args.url);
    };

    let created = db::create_follow(pool, session.user.id, feed.id).await?;
    if created {
        log.info(format!("➕ {} now follows {}", session.user.name, feed.name));
    } else {
        log.info(format!("{} already follows {}", session.user.name, feed.name));
    }
    if telemetry::config::json_mode() {
        log.result(&types::FollowResult {
            user: session.user.name.clone(),
            feed: feed.name,
            created,
        })?;
    }
    Ok(())
}

pub async fn following(pool: &PgPool, session: &Session) -> Result<()> {
    let log = telemetry::follow();
    let _g = log.root_span().entered();
    let _s = log.span(&FollowPhase::List).entered();

    let feeds = db::list_follows_for_user(pool, session.user.id).await?;
    log.info(format!("📡 {} follows:", session.user.name));
    for row in &feeds {
        log.info(format!("* {} {}", row.name, row.url));
    }
    if telemetry::config::json_mode() {
        log.result(&types::FollowingList { feeds })?;
    }
    Ok(())
}

pub async fn unfollow(pool: &PgPool, session: &Session, args: UnfollowCmd) -> Result<()> {
    let log = telemetry::follow();
    let _g = log.root_span().entered();
    let _s = log.span_kv(&FollowPhase::Remove, [("url", args.url.clone())]).entered();

    let Some(feed) = feed::db::get_feed_by_url(pool, &args.url).await? else {
        bail!("no feed registered with url {:?}", args.url);
    };

    let removed = db::delete_follow(pool, session.user.id, feed.id).await?;
    if removed {
        log.info(format!("➖ {} unfollowed {}", session.user.name, feed.name));
    } else {
        log.info(format!("{} was not following {}", session.user.name, feed.name));
    }
    if telemetry::config::json_mode() {
        log.result(&types::UnfollowResult {
            user: session.user.name.clone(),
            feed: feed.name,
            removed,
        })?;
    }
    Ok(())
}
