use anyhow::Result;
use clap::Args;
use sqlx::PgPool;

use crate::telemetry::ops::init::Phase as InitPhase;
use crate::telemetry::{self};

/// gather init
#[derive(Args)]
pub struct InitCmd {}

pub async fn run(pool: &PgPool, _args: InitCmd) -> Result<()> {
    let log = telemetry::init();
    let _g = log.root_span().entered();

    // Apply any pending migrations (idempotent)
    let _s = log.span(&InitPhase::Migrate).entered();
    sqlx::migrate!().run(pool).await?;

    log.info("🗄️ database schema is up to date");
    Ok(())
}
