//! Search orchestration.
//!
//! One instance owns the whole search-facing client state: the in-flight
//! flag, the active record, the error banner, history, likes, and the
//! comparison picks. UI layers call the operations here and re-render from
//! the accessors; history and likes persist on every mutation so a crash
//! never loses more than the in-flight search.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::{
    comparison::{ComparisonError, ComparisonSet, ToggleOutcome},
    fetch::FactsFetcher,
    history::{HistoryEntry, SearchHistory},
    likes::LikedModels,
    storage::{self, ProfileStore, HISTORY_KEY, LIKED_KEY},
};

/// Language hint sent with searches unless the embedder overrides it.
pub const DEFAULT_LANGUAGE: &str = "en";

pub struct SearchOrchestrator {
    fetcher: Arc<dyn FactsFetcher>,
    store: Arc<dyn ProfileStore>,
    language: String,
    history: SearchHistory,
    likes: LikedModels,
    comparison: ComparisonSet,
    active: Option<HistoryEntry>,
    loading: bool,
    error: Option<String>,
}

impl SearchOrchestrator {
    /// Restores history and likes from the profile store. Corrupt or
    /// missing blobs start empty.
    pub fn new(fetcher: Arc<dyn FactsFetcher>, store: Arc<dyn ProfileStore>) -> Self {
        let history = storage::load_json(store.as_ref(), HISTORY_KEY).unwrap_or_default();
        let likes = storage::load_json(store.as_ref(), LIKED_KEY).unwrap_or_default();

        Self {
            fetcher,
            store,
            language: DEFAULT_LANGUAGE.to_string(),
            history,
            likes,
            comparison: ComparisonSet::default(),
            active: None,
            loading: false,
            error: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn likes(&self) -> &LikedModels {
        &self.likes
    }

    pub fn comparison(&self) -> &ComparisonSet {
        &self.comparison
    }

    pub fn active(&self) -> Option<&HistoryEntry> {
        self.active.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Runs one search to completion. A blank query sets the error state
    /// without touching the network or the stored history; a fetch failure
    /// leaves history intact and surfaces the message.
    pub async fn initiate_search(&mut self, raw_model: &str) {
        let model = raw_model.trim();
        if model.is_empty() {
            self.error = Some("Please enter a car model.".to_string());
            return;
        }

        self.loading = true;
        self.error = None;
        self.active = None;

        match self.fetcher.fetch(model, Some(&self.language)).await {
            Ok(facts) => {
                let entry = HistoryEntry {
                    model_name: model.to_string(),
                    facts,
                    captured_at: Utc::now(),
                    language: self.language.clone(),
                };
                self.history.upsert(entry.clone());
                self.active = Some(entry);
                self.persist_history();
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }

        self.loading = false;
    }

    /// Re-activates a stored search without refetching. Returns whether the
    /// model was found.
    pub fn select_from_history(&mut self, model_name: &str) -> bool {
        match self.history.get(model_name) {
            Some(entry) => {
                self.active = Some(entry.clone());
                self.error = None;
                true
            }
            None => false,
        }
    }

    /// Drops all history, the comparison picks drawn from it, and the
    /// active record. Likes survive.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.comparison.clear();
        self.active = None;
        self.persist_history();
    }

    /// Flips the liked state for a model and returns the new one.
    pub fn toggle_like(&mut self, model_name: &str) -> bool {
        let liked = self.likes.toggle(model_name);
        if let Err(e) = storage::save_json(self.store.as_ref(), LIKED_KEY, &self.likes) {
            warn!(error = %e, "Failed to persist liked models");
        }
        liked
    }

    /// Flips a history entry in or out of the comparison picks.
    pub fn toggle_comparison(&mut self, model_name: &str) -> Result<ToggleOutcome, ComparisonError> {
        let Some(entry) = self.history.get(model_name).cloned() else {
            return Err(ComparisonError::UnknownModel(model_name.to_string()));
        };
        self.comparison.toggle(&entry)
    }

    pub fn can_compare(&self) -> bool {
        self.comparison.can_compare()
    }

    fn persist_history(&self) {
        if let Err(e) = storage::save_json(self.store.as_ref(), HISTORY_KEY, &self.history) {
            warn!(error = %e, "Failed to persist search history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fetch::FetchError,
        storage::MemoryStore,
    };
    use async_trait::async_trait;
    use contract::CarFacts;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubFetcher {
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FactsFetcher for StubFetcher {
        async fn fetch(
            &self,
            car_model: &str,
            _language: Option<&str>,
        ) -> Result<CarFacts, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FetchError::Service {
                    status: 500,
                    message: "AI service configuration error on server".to_string(),
                });
            }
            Ok(CarFacts {
                manufacturer_name: Some(
                    car_model.split_whitespace().next().unwrap_or("?").to_string(),
                ),
                ..CarFacts::default()
            })
        }
    }

    #[tokio::test]
    async fn successful_search_lands_in_history_and_the_store() {
        let fetcher = StubFetcher::ok();
        let store = Arc::new(MemoryStore::default());
        let mut search = SearchOrchestrator::new(fetcher.clone(), store.clone());

        search.initiate_search("  Toyota Camry  ").await;

        assert!(!search.is_loading());
        assert_eq!(search.error(), None);
        assert_eq!(search.active().unwrap().model_name, "Toyota Camry");
        assert_eq!(search.history().len(), 1);
        assert_eq!(fetcher.calls(), 1);

        // The store saw the write, a fresh orchestrator restores it.
        let restored = SearchOrchestrator::new(StubFetcher::ok(), store);
        assert_eq!(restored.history().len(), 1);
        assert_eq!(restored.history().entries()[0].model_name, "Toyota Camry");
    }

    #[tokio::test]
    async fn blank_query_never_reaches_the_fetcher() {
        let fetcher = StubFetcher::ok();
        let mut search =
            SearchOrchestrator::new(fetcher.clone(), Arc::new(MemoryStore::default()));

        search.initiate_search("   ").await;

        assert_eq!(search.error(), Some("Please enter a car model."));
        assert_eq!(fetcher.calls(), 0);
        assert!(search.history().is_empty());
        assert!(search.active().is_none());
    }

    #[tokio::test]
    async fn failed_fetch_surfaces_the_message_and_keeps_history() {
        let store = Arc::new(MemoryStore::default());
        let mut search = SearchOrchestrator::new(StubFetcher::ok(), store.clone());
        search.initiate_search("Honda Civic").await;

        let mut search = SearchOrchestrator::new(StubFetcher::failing(), store);
        search.initiate_search("Mazda 3").await;

        assert!(search.error().unwrap().contains("AI service configuration error"));
        assert!(search.active().is_none());
        assert_eq!(search.history().len(), 1);
        assert_eq!(search.history().entries()[0].model_name, "Honda Civic");
    }

    #[tokio::test]
    async fn repeat_search_refreshes_instead_of_duplicating() {
        let mut search =
            SearchOrchestrator::new(StubFetcher::ok(), Arc::new(MemoryStore::default()));

        search.initiate_search("Toyota Camry").await;
        search.initiate_search("Honda Civic").await;
        search.initiate_search("toyota camry").await;

        assert_eq!(search.history().len(), 2);
        assert_eq!(search.history().entries()[0].model_name, "toyota camry");
    }

    #[tokio::test]
    async fn selecting_from_history_skips_the_network() {
        let fetcher = StubFetcher::ok();
        let mut search =
            SearchOrchestrator::new(fetcher.clone(), Arc::new(MemoryStore::default()));

        search.initiate_search("Toyota Camry").await;
        assert_eq!(fetcher.calls(), 1);

        search.initiate_search("Honda Civic").await;
        assert!(search.select_from_history("TOYOTA CAMRY"));
        assert_eq!(search.active().unwrap().model_name, "Toyota Camry");
        assert_eq!(fetcher.calls(), 2);

        assert!(!search.select_from_history("Kia EV6"));
    }

    #[tokio::test]
    async fn clearing_history_also_clears_picks_and_the_active_record() {
        let store = Arc::new(MemoryStore::default());
        let mut search = SearchOrchestrator::new(StubFetcher::ok(), store.clone());

        search.initiate_search("Toyota Camry").await;
        search.initiate_search("Honda Civic").await;
        search.toggle_comparison("Toyota Camry").unwrap();
        search.toggle_comparison("Honda Civic").unwrap();
        assert!(search.can_compare());

        search.clear_history();

        assert!(search.history().is_empty());
        assert!(search.comparison().is_empty());
        assert!(search.active().is_none());

        let restored = SearchOrchestrator::new(StubFetcher::ok(), store);
        assert!(restored.history().is_empty());
    }

    #[tokio::test]
    async fn comparison_toggle_requires_a_history_entry() {
        let mut search =
            SearchOrchestrator::new(StubFetcher::ok(), Arc::new(MemoryStore::default()));

        let missing = search.toggle_comparison("Ghost Car");
        assert_eq!(
            missing,
            Err(ComparisonError::UnknownModel("Ghost Car".to_string()))
        );
    }

    #[tokio::test]
    async fn likes_persist_across_instances() {
        let store = Arc::new(MemoryStore::default());
        let mut search = SearchOrchestrator::new(StubFetcher::ok(), store.clone());

        assert!(search.toggle_like("Toyota Camry"));
        search.clear_history();

        let restored = SearchOrchestrator::new(StubFetcher::ok(), store);
        assert!(restored.likes().is_liked("Toyota Camry"));
    }
}
