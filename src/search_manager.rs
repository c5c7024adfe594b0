//! Cross-catalog search aggregation.
//!
//! Fans one query out to every catalog adapter, caps each provider's
//! contribution, and merges the normalized results into one candidate list
//! in presentation order. A failing provider degrades to an empty
//! contribution; partial results are the norm, not an error.

use log::{debug, warn};

use crate::backends::CatalogAdapter;
use crate::normalizer;
use crate::protocol::CandidateRecord;

/// Cap on each provider's contribution to one aggregated search.
const PROVIDER_RESULT_CAP: usize = 5;

/// Owns the adapter set in presentation order: movie, anime, manga, book.
pub struct SearchManager {
    adapters: Vec<Box<dyn CatalogAdapter>>,
}

impl SearchManager {
    pub fn new(adapters: Vec<Box<dyn CatalogAdapter>>) -> Self {
        Self { adapters }
    }

    /// Runs one aggregated search. Never fails: the worst outcome is an
    /// empty candidate list.
    pub fn search(&self, keyword: &str) -> Vec<CandidateRecord> {
        let mut candidates = Vec::new();
        for adapter in &self.adapters {
            let records = match adapter.query(keyword) {
                Ok(records) => records,
                Err(err) => {
                    warn!("search provider degraded: {err}");
                    Vec::new()
                }
            };
            debug!("{}: {} raw record(s)", adapter.name(), records.len());
            candidates.extend(
                records
                    .iter()
                    .take(PROVIDER_RESULT_CAP)
                    .map(|record| normalizer::normalize(adapter.kind(), record)),
            );
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::ProviderRecord;
    use crate::error::ProviderError;
    use crate::protocol::MediaKind;
    use serde_json::json;

    struct StubAdapter {
        name: &'static str,
        kind: MediaKind,
        outcome: Result<usize, ()>,
    }

    impl StubAdapter {
        fn returning(name: &'static str, kind: MediaKind, count: usize) -> Box<Self> {
            Box::new(Self {
                name,
                kind,
                outcome: Ok(count),
            })
        }

        fn failing(name: &'static str, kind: MediaKind) -> Box<Self> {
            Box::new(Self {
                name,
                kind,
                outcome: Err(()),
            })
        }
    }

    impl CatalogAdapter for StubAdapter {
        fn name(&self) -> &'static str {
            self.name
        }

        fn kind(&self) -> MediaKind {
            self.kind
        }

        fn query(&self, _keyword: &str) -> Result<Vec<ProviderRecord>, ProviderError> {
            match self.outcome {
                Ok(count) => Ok((0..count)
                    .map(|index| {
                        vec![(
                            "title".to_string(),
                            json!(format!("{} result {index}", self.name)),
                        )]
                    })
                    .collect()),
                Err(()) => Err(ProviderError::new(self.name, "unreachable")),
            }
        }
    }

    #[test]
    fn each_provider_contribution_is_capped_at_five() {
        let manager = SearchManager::new(vec![StubAdapter::returning(
            "movies",
            MediaKind::Movie,
            9,
        )]);
        assert_eq!(manager.search("dune").len(), 5);
    }

    #[test]
    fn failing_provider_contributes_zero_and_search_proceeds() {
        let manager = SearchManager::new(vec![
            StubAdapter::returning("movies", MediaKind::Movie, 7),
            StubAdapter::failing("anime", MediaKind::Anime),
            StubAdapter::returning("books", MediaKind::Book, 2),
        ]);
        let candidates = manager.search("dune");
        assert_eq!(candidates.len(), 7);
        let kinds: Vec<MediaKind> = candidates.iter().map(|candidate| candidate.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MediaKind::Movie,
                MediaKind::Movie,
                MediaKind::Movie,
                MediaKind::Movie,
                MediaKind::Movie,
                MediaKind::Book,
                MediaKind::Book,
            ]
        );
    }

    #[test]
    fn provider_order_is_preserved_within_each_contribution() {
        let manager = SearchManager::new(vec![StubAdapter::returning(
            "movies",
            MediaKind::Movie,
            3,
        )]);
        let candidates = manager.search("dune");
        let titles: Vec<&str> = candidates
            .iter()
            .filter_map(|candidate| candidate.field("title"))
            .collect();
        assert_eq!(
            titles,
            vec!["movies result 0", "movies result 1", "movies result 2"]
        );
    }

    #[test]
    fn all_providers_failing_yields_empty_not_error() {
        let manager = SearchManager::new(vec![
            StubAdapter::failing("movies", MediaKind::Movie),
            StubAdapter::failing("anime", MediaKind::Anime),
            StubAdapter::failing("books", MediaKind::Book),
        ]);
        assert!(manager.search("").is_empty());
    }
}
