use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use sqlx::PgPool;
use url::Url;

use crate::config::Config;
use crate::session::{self, Session};
use crate::telemetry::ops::feed::Phase as FeedPhase;
use crate::telemetry::{self};

pub mod db;
pub mod types;

/// gather feed add/ls
#[derive(Args)]
pub struct FeedCmd {
    #[command(subcommand)]
    pub cmd: FeedSub,
}

#[derive(Subcommand)]
pub enum FeedSub {
    /// register a new feed and follow it
    Add {
        name: String,
        url: String,
    },
    /// list all feeds with their owners
    Ls,
}

pub async fn run(pool: &PgPool, config: &Config, args: FeedCmd) -> Result<()> {
    let log = telemetry::feed();
    let _g = log.root_span().entered();
    match args.cmd {
        FeedSub::Add { name, url } => {
            let session = session::require_user(pool, config).await?;
            add_feed(pool, &session, name, url).await?
        }
        FeedSub::Ls => ls_feeds(pool).await?,
    }
    Ok(())
}

async fn add_feed(pool: &PgPool, session: &Session, name: String, url: String) -> Result<()> {
    let log = telemetry::feed();
    let _s = log.span_kv(&FeedPhase::Add, [("url", url.clone())]).entered();

    // URL validation (friendly error before DB I/O)
    if Url::parse(&url).is_err() {
        bail!("invalid URL: {}", url);
    }
    if db::get_feed_by_url(pool, &url).await?.is_some() {
        bail!("a feed with url {:?} already exists; use `gather follow`", url);
    }

    let feed = db::create_feed(pool, &name, &url, session.user.id)
        .await
        .context("could not create feed")?;
    // The creator follows their own feed from the start.
    crate::follow::db::create_follow(pool, session.user.id, feed.id).await?;

    log.info_kv(
        &format!("📡 added feed {} ({})", feed.name, feed.url),
        [("id", feed.id.to_string()), ("owner", session.user.name.clone())],
    );
    if telemetry::config::json_mode() {
        log.result(&types::FeedAddResult {
            id: feed.id,
            name: feed.name,
            url: feed.url,
            owner: session.user.name.clone(),
        })?;
    }
    Ok(())
}

async fn ls_feeds(pool: &PgPool) -> Result<()> {
    let log = telemetry::feed();
    let _s = log.span(&FeedPhase::List).entered();

    let feeds = db::list_feeds(pool).await?;
    log.info("📡 Feeds:");
    for row in &feeds {
        log.info(format!(
            "* {} {} (added by {}) last_fetched_at={:?}",
            row.name, row.url, row.owner, row.last_fetched_at
        ));
    }
    if telemetry::config::json_mode() {
        log.result(&types::FeedList { feeds })?;
    }
    Ok(())
}
