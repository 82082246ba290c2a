use serde::Serialize;

/// Shape-consistent view of one fetched feed, produced fresh on every poll
/// and discarded after ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub items: Vec<NormalizedItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: String,
}

#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct IngestResult {
    pub seen: usize,
    pub inserted: usize,
    pub duplicates: usize,
}

#[derive(Serialize)]
pub struct CycleResult {
    pub feed_url: String,
    pub seen: usize,
    pub inserted: usize,
    pub duplicates: usize,
}
