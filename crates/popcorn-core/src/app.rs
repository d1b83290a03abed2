use popcorn_config::Config;
use popcorn_index::MovieIndex;
use popcorn_models::{MovieDetail, WatchedRecord};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use crate::detail::{DetailSession, DetailState};
use crate::persistent::{KeyValueStore, PersistentList, StoreError};
use crate::search::{SearchSession, SearchState};
use crate::shortcuts::{Intent, Key, Shortcuts, Subscription};
use crate::stats::WatchedStats;
use crate::title::TitleHost;
use crate::watched::WatchedListStore;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No movie detail is loaded")]
    NoDetail,

    #[error("Rating must be between 1 and 10, got {0}")]
    InvalidRating(u8),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(WatchedRecord),
    /// The title was already on the list with this rating
    AlreadyWatched(u8),
}

/// Application controller: owns the sessions and the watched list, and turns
/// user intents into calls on them.
pub struct PopcornApp {
    search: SearchSession,
    detail: DetailSession,
    watched: WatchedListStore,
    shortcuts: Shortcuts,
    search_focused: bool,
    _enter: Subscription,
    // Bound only while a detail view is open
    escape: Option<Subscription>,
}

impl PopcornApp {
    pub fn new(
        index: Arc<dyn MovieIndex>,
        store: Arc<dyn KeyValueStore>,
        title_host: Arc<dyn TitleHost>,
        config: &Config,
    ) -> Self {
        let search = SearchSession::from_config(Arc::clone(&index), &config.search);
        let detail = DetailSession::new(index, title_host, config.display.default_title.clone());
        let watched = WatchedListStore::open(PersistentList::new(store), config.storage.watched_key.clone());

        let shortcuts = Shortcuts::new();
        let enter = shortcuts.subscribe(Key::Enter, Intent::FocusSearch);

        Self {
            search,
            detail,
            watched,
            shortcuts,
            search_focused: true,
            _enter: enter,
            escape: None,
        }
    }

    // Search

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.search.set_query(query);
    }

    pub fn query(&self) -> String {
        self.search.query()
    }

    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    pub fn result_count(&self) -> usize {
        self.search.result_count()
    }

    pub async fn search_settled(&self) -> SearchState {
        self.search.settled().await
    }

    pub fn focus_search(&mut self) {
        self.search_focused = true;
    }

    pub fn blur_search(&mut self) {
        self.search_focused = false;
    }

    pub fn is_search_focused(&self) -> bool {
        self.search_focused
    }

    // Detail

    /// Open the detail for `id`; selecting the open one again closes it.
    pub fn select(&mut self, id: &str) {
        if self.detail.selected().as_deref() == Some(id) {
            debug!("{} selected again, closing detail", id);
            self.close_detail();
            return;
        }

        self.detail.select(Some(id.to_string()));
        if self.escape.is_none() {
            self.escape = Some(self.shortcuts.subscribe(Key::Escape, Intent::CloseDetail));
        }
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
        self.escape = None;
    }

    pub fn selected_id(&self) -> Option<String> {
        self.detail.selected()
    }

    pub fn detail_state(&self) -> DetailState {
        self.detail.state()
    }

    pub async fn detail_settled(&self) -> DetailState {
        self.detail.settled().await
    }

    // Watched list

    /// Rate the open detail and add it to the watched list, then close the detail.
    pub fn add_watched(&mut self, user_rating: u8) -> Result<AddOutcome, AppError> {
        if !(1..=10).contains(&user_rating) {
            return Err(AppError::InvalidRating(user_rating));
        }

        let detail: MovieDetail = self.detail.state().detail().cloned().ok_or(AppError::NoDetail)?;
        let id = self.detail.selected().unwrap_or_else(|| detail.id.clone());

        if let Some(previous) = self.watched.rating_for(&id) {
            return Ok(AddOutcome::AlreadyWatched(previous));
        }

        let mut record = WatchedRecord::from_detail(&detail, user_rating);
        record.id = id;
        self.watched.add(record.clone())?;
        info!("Added {} ({}) to watched list, rated {}", record.title, record.id, user_rating);

        self.close_detail();
        Ok(AddOutcome::Added(record))
    }

    pub fn remove_watched(&mut self, id: &str) -> Result<bool, AppError> {
        let removed = self.watched.remove(id)?;
        if removed {
            info!("Removed {} from watched list", id);
        }
        Ok(removed)
    }

    pub fn watched(&self) -> &[WatchedRecord] {
        self.watched.records()
    }

    pub fn is_watched(&self, id: &str) -> bool {
        self.watched.contains(id)
    }

    pub fn rating_for(&self, id: &str) -> Option<u8> {
        self.watched.rating_for(id)
    }

    pub fn stats(&self) -> WatchedStats {
        self.watched.stats()
    }

    // Keys

    pub fn handle_key(&mut self, key: Key) {
        for intent in self.shortcuts.dispatch(key) {
            self.apply_intent(intent);
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::FocusSearch => {
                if self.search_focused {
                    return;
                }
                self.search_focused = true;
                self.set_query("");
            }
            Intent::CloseDetail => self.close_detail(),
        }
    }
}
