use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Follow;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Add, List, Remove }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Add => "add",
        Phase::List => "list",
        Phase::Remove => "remove",
    }}
    fn span(&self) -> Span { match self {
        Phase::Add => info_span!("add"),
        Phase::List => info_span!("list"),
        Phase::Remove => info_span!("remove"),
    }}
}

impl OpMarker for Follow {
    const NAME: &'static str = "follow";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("follow") }
}
