use sqlx::PgPool;

use crate::feed::db as feed_db;
use crate::feed::types::Feed;
use crate::telemetry::ops::agg::Phase as AggPhase;
use crate::telemetry::{self};

use super::parse;
use super::types::{IngestResult, NormalizedFeed};
use super::write;

/// Insert the feed's new items, then advance its polling position exactly
/// once, whatever the per-item outcomes were. Inserts that already committed
/// stay committed if a later one fails.
pub async fn ingest(
    pool: &PgPool,
    feed: &Feed,
    normalized: &NormalizedFeed,
) -> Result<IngestResult, sqlx::Error> {
    let log = telemetry::agg();
    let mut result = IngestResult::default();

    for item in &normalized.items {
        result.seen += 1;
        let published_at = parse::extract_published_at(&item.pub_date);
        let inserted = write::insert_post(
            pool,
            feed.id,
            &item.title,
            &item.link,
            &item.description,
            published_at,
        )
        .await?;
        if inserted {
            result.inserted += 1;
            log.info_kv(
                &format!("➕ post {}", item.title),
                [("url", item.link.clone()), ("feed", feed.url.clone())],
            );
        } else {
            result.duplicates += 1;
        }
    }

    // Runs even when every item was a duplicate, so a quiet feed still moves
    // to the back of the polling queue.
    {
        let _s = log.span(&AggPhase::MarkFetched).entered();
        feed_db::mark_feed_fetched(pool, feed.id).await?;
    }

    Ok(result)
}
