use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Agg;

#[derive(Copy, Clone, Debug)]
pub enum Phase { SelectFeed, Fetch, Ingest, MarkFetched }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::SelectFeed => "select_feed",
        Phase::Fetch => "fetch",
        Phase::Ingest => "ingest",
        Phase::MarkFetched => "mark_fetched",
    }}
    fn span(&self) -> Span { match self {
        Phase::SelectFeed => info_span!("select_feed"),
        Phase::Fetch => info_span!("fetch"),
        Phase::Ingest => info_span!("ingest"),
        Phase::MarkFetched => info_span!("mark_fetched"),
    }}
}

impl OpMarker for Agg {
    const NAME: &'static str = "agg";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("agg") }
}
