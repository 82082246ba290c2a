use anyhow::{Result, anyhow, bail};
use clap::Args;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::feed::db as feed_db;
use crate::telemetry::ops::agg::Phase as AggPhase;
use crate::telemetry::{self};
use crate::util::time::parse_interval_str;

pub mod fetch;
pub mod ingest;
pub mod parse;
pub mod types;
mod write;

use self::fetch::FetchError;

/// gather agg
#[derive(Args)]
pub struct AggCmd {
    /// time between cycles, e.g. "30s", "5m", "2h"
    #[arg(long, default_value = "1m")]
    pub every: String,
    /// run exactly one cycle and surface its errors
    #[arg(long, default_value_t = false)]
    pub once: bool,
}

#[derive(Debug, thiserror::Error)]
enum CycleError {
    #[error("feed {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl CycleError {
    fn kind(&self) -> &'static str {
        match self {
            CycleError::Fetch { source, .. } => source.kind(),
            CycleError::Store(_) => "store",
        }
    }
}

enum CycleOutcome {
    NoFeeds,
    Completed { feed_url: String, result: types::IngestResult },
}

pub async fn run(pool: &PgPool, args: AggCmd) -> Result<()> {
    let log = telemetry::agg();
    let _g = log.root_span().entered();

    let every = parse_interval_str(&args.every)
        .ok_or_else(|| anyhow!("invalid --every value {:?} (try 30s, 5m, 2h)", args.every))?;
    let client = fetch::build_client()?;

    // The interactive path: one cycle, errors go to the caller.
    if args.once {
        return match cycle(pool, &client).await? {
            CycleOutcome::NoFeeds => bail!("no feeds registered"),
            CycleOutcome::Completed { feed_url, result } => {
                log.cycle_summary(&feed_url, result.seen, result.inserted, result.duplicates);
                if telemetry::config::json_mode() {
                    log.result(&types::CycleResult {
                        feed_url,
                        seen: result.seen,
                        inserted: result.inserted,
                        duplicates: result.duplicates,
                    })?;
                }
                Ok(())
            }
        };
    }

    // ctrl_c flips the token; the loop stops before the next cycle while an
    // in-flight request stays bounded by the client timeout.
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    log.info(format!("🔄 collecting feeds every {}", args.every));
    loop {
        if shutdown.is_cancelled() {
            break;
        }

        match cycle(pool, &client).await {
            Ok(CycleOutcome::NoFeeds) => log.info("no feeds registered yet; waiting"),
            Ok(CycleOutcome::Completed { feed_url, result }) => {
                log.cycle_summary(&feed_url, result.seen, result.inserted, result.duplicates);
            }
            // One broken feed must never take the loop down with it; its
            // last_fetched_at stays put and it is retried on a later cycle.
            Err(err) => log.warn_kv(
                &format!("cycle failed: {err}"),
                [("kind", err.kind().to_string()), ("error", err.to_string())],
            ),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(every) => {}
        }
    }
    log.info("👋 aggregation stopped");
    Ok(())
}

async fn cycle(pool: &PgPool, client: &reqwest::Client) -> Result<CycleOutcome, CycleError> {
    let log = telemetry::agg();

    let feed = {
        let _s = log.span(&AggPhase::SelectFeed).entered();
        feed_db::next_feed_to_fetch(pool).await?
    };
    let Some(feed) = feed else {
        return Ok(CycleOutcome::NoFeeds);
    };

    let normalized = {
        let _s = log.span_kv(&AggPhase::Fetch, [("url", feed.url.clone())]).entered();
        fetch::fetch_feed(client, &feed.url)
            .await
            .map_err(|source| CycleError::Fetch { url: feed.url.clone(), source })?
    };

    let result = {
        let _s = log.span_kv(&AggPhase::Ingest, [("url", feed.url.clone())]).entered();
        ingest::ingest(pool, &feed, &normalized).await?
    };

    Ok(CycleOutcome::Completed { feed_url: feed.url, result })
}
