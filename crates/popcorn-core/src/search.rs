use popcorn_config::{SearchConfig, MIN_QUERY_LEN};
use popcorn_index::{IndexError, MovieIndex};
use popcorn_models::SearchResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    /// Query empty or too short; nothing in flight
    Idle,
    Loading,
    Ok(Vec<SearchResult>),
    Failed(String),
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }

    pub fn results(&self) -> &[SearchResult] {
        match self {
            SearchState::Ok(results) => results,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SearchState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// State plus the query and generation it belongs to
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    pub generation: u64,
    pub query: String,
    pub state: SearchState,
}

/// True if `query` is long enough to send to the index
pub fn is_searchable(query: &str, min_query_len: usize) -> bool {
    query.trim().chars().count() >= min_query_len
}

/// Search-as-you-type against a `MovieIndex`.
///
/// Each query change supersedes the previous request: the old task is aborted and
/// its generation retired, so a late response can never overwrite newer state.
pub struct SearchSession {
    index: Arc<dyn MovieIndex>,
    tx: Arc<watch::Sender<SearchSnapshot>>,
    inflight: Option<JoinHandle<()>>,
    min_query_len: usize,
    debounce: Duration,
}

impl SearchSession {
    pub fn new(index: Arc<dyn MovieIndex>) -> Self {
        Self::with_options(index, MIN_QUERY_LEN, Duration::ZERO)
    }

    pub fn from_config(index: Arc<dyn MovieIndex>, config: &SearchConfig) -> Self {
        Self::with_options(index, config.min_query_len, config.debounce())
    }

    pub fn with_options(index: Arc<dyn MovieIndex>, min_query_len: usize, debounce: Duration) -> Self {
        let (tx, _rx) = watch::channel(SearchSnapshot {
            generation: 0,
            query: String::new(),
            state: SearchState::Idle,
        });

        Self {
            index,
            tx: Arc::new(tx),
            inflight: None,
            min_query_len,
            debounce,
        }
    }

    pub fn query(&self) -> String {
        self.tx.borrow().query.clone()
    }

    pub fn state(&self) -> SearchState {
        self.tx.borrow().state.clone()
    }

    pub fn results(&self) -> Vec<SearchResult> {
        self.tx.borrow().state.results().to_vec()
    }

    pub fn result_count(&self) -> usize {
        self.tx.borrow().state.results().len()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.tx.subscribe()
    }

    /// Replace the query and start (or skip) the matching request.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.abort_inflight();

        let searchable = is_searchable(&query, self.min_query_len);
        let mut generation = 0;
        self.tx.send_modify(|snap| {
            snap.generation += 1;
            generation = snap.generation;
            snap.query = query.clone();
            snap.state = if searchable { SearchState::Loading } else { SearchState::Idle };
        });

        if !searchable {
            debug!("Query {:?} below {} characters, not searching", query, self.min_query_len);
            return;
        }

        let index = Arc::clone(&self.index);
        let tx = Arc::clone(&self.tx);
        let debounce = self.debounce;
        let term = query.trim().to_string();

        self.inflight = Some(tokio::spawn(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
            }
            debug!("Searching {} for {:?} (generation {})", index.index_name(), term, generation);
            let outcome = index.search(&term).await;
            apply_outcome(&tx, generation, outcome);
        }));
    }

    /// Wait until the current query is no longer loading
    pub async fn settled(&self) -> SearchState {
        let mut rx = self.tx.subscribe();
        let settled = match rx.wait_for(|snap| !snap.state.is_loading()).await {
            Ok(snap) => Some(snap.state.clone()),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.state())
    }

    /// Abort any in-flight request and retire its generation
    pub fn close(&mut self) {
        self.abort_inflight();
        self.tx.send_if_modified(|snap| {
            snap.generation += 1;
            if snap.state.is_loading() {
                snap.state = SearchState::Idle;
                true
            } else {
                false
            }
        });
    }

    fn abort_inflight(&mut self) {
        if let Some(handle) = self.inflight.take() {
            if !handle.is_finished() {
                debug!("Aborting superseded search request");
            }
            handle.abort();
        }
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.abort_inflight();
    }
}

/// Write a finished request into the session if it is still the current one.
///
/// The generation check runs under the channel lock, so it cannot interleave
/// with a newer `set_query`.
fn apply_outcome(
    tx: &watch::Sender<SearchSnapshot>,
    generation: u64,
    outcome: Result<Vec<SearchResult>, IndexError>,
) -> bool {
    tx.send_if_modified(|snap| {
        if snap.generation != generation {
            debug!(
                "Discarding stale search response (generation {}, current {})",
                generation, snap.generation
            );
            return false;
        }

        snap.state = match outcome {
            Ok(results) => SearchState::Ok(results),
            Err(IndexError::Cancelled) => {
                debug!("Search for {:?} was cancelled", snap.query);
                SearchState::Idle
            }
            Err(e) => {
                warn!("Search for {:?} failed: {}", snap.query, e);
                SearchState::Failed(e.to_string())
            }
        };
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{godfather_results, result, settle_tasks, GatedIndex, StaticIndex};

    #[tokio::test]
    async fn test_short_queries_stay_idle_without_requests() {
        let index = Arc::new(StaticIndex::new().with_search("go", Ok(godfather_results())));
        let mut session = SearchSession::new(index.clone());

        for query in ["", "g", "go", "  go  ", "é"] {
            session.set_query(query);
            assert_eq!(session.state(), SearchState::Idle);
            assert_eq!(session.settled().await, SearchState::Idle);
        }

        settle_tasks().await;
        assert_eq!(index.search_calls(), 0);
        assert_eq!(session.result_count(), 0);
    }

    #[tokio::test]
    async fn test_search_success() {
        let index = Arc::new(StaticIndex::new().with_search("godfather", Ok(godfather_results())));
        let mut session = SearchSession::new(index.clone());

        session.set_query("godfather");
        assert!(session.state().is_loading());

        let state = session.settled().await;
        assert_eq!(state, SearchState::Ok(godfather_results()));
        assert_eq!(session.result_count(), 2);
        assert_eq!(session.query(), "godfather");
        assert_eq!(index.search_calls(), 1);
    }

    #[tokio::test]
    async fn test_not_found_surfaces_message_and_clears_results() {
        let index = Arc::new(
            StaticIndex::new()
                .with_search("godfather", Ok(godfather_results()))
                .with_search("qwxzzy", Err(IndexError::NotFound("Movie not found!".to_string()))),
        );
        let mut session = SearchSession::new(index);

        session.set_query("godfather");
        session.settled().await;
        session.set_query("qwxzzy");

        let state = session.settled().await;
        assert_eq!(state.error(), Some("Movie not found!"));
        assert!(session.results().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_is_shown() {
        let index = Arc::new(
            StaticIndex::new().with_search("heat", Err(IndexError::Network("connection reset".to_string()))),
        );
        let mut session = SearchSession::new(index);

        session.set_query("heat");
        assert_eq!(session.settled().await, SearchState::Failed("connection reset".to_string()));
    }

    #[tokio::test]
    async fn test_cancellation_is_swallowed() {
        let index = Arc::new(GatedIndex::default());
        let gate = index.gate_search("alien");
        let mut session = SearchSession::new(index.clone());

        session.set_query("alien");
        settle_tasks().await;
        gate.send(Err(IndexError::Cancelled)).unwrap();

        let state = session.settled().await;
        assert_eq!(state, SearchState::Idle);
        assert_eq!(state.error(), None);
    }

    #[tokio::test]
    async fn test_out_of_order_responses_keep_latest_query() {
        let index = Arc::new(GatedIndex::default());
        let alpha = index.gate_search("alpha");
        let bravo = index.gate_search("bravo");
        let mut session = SearchSession::new(index.clone());

        session.set_query("alpha");
        settle_tasks().await;
        session.set_query("bravo");
        settle_tasks().await;

        // B resolves first, then A's response shows up late
        bravo.send(Ok(vec![result("tt2", "Bravo", "2002")])).unwrap();
        let state = session.settled().await;
        let _ = alpha.send(Ok(vec![result("tt1", "Alpha", "2001")]));
        settle_tasks().await;

        assert_eq!(state, SearchState::Ok(vec![result("tt2", "Bravo", "2002")]));
        assert_eq!(session.state(), state);
        assert_eq!(session.query(), "bravo");
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let index = Arc::new(StaticIndex::new());
        let mut session = SearchSession::new(index);
        session.set_query("first");
        session.set_query("second");
        let current = session.subscribe().borrow().generation;

        // A response tagged with the retired generation changes nothing
        let applied = apply_outcome(&session.tx, current - 1, Ok(vec![result("tt1", "First", "2001")]));
        assert!(!applied);
        assert!(session.state().is_loading());

        let applied = apply_outcome(&session.tx, current, Ok(vec![result("tt2", "Second", "2002")]));
        assert!(applied);
        assert_eq!(session.results(), vec![result("tt2", "Second", "2002")]);
    }

    #[tokio::test]
    async fn test_shortening_query_returns_to_idle() {
        let index = Arc::new(GatedIndex::default());
        let _gate = index.gate_search("matrix");
        let mut session = SearchSession::new(index);

        session.set_query("matrix");
        settle_tasks().await;
        session.set_query("ma");
        assert_eq!(session.state(), SearchState::Idle);
        assert_eq!(session.settled().await, SearchState::Idle);
    }

    #[tokio::test]
    async fn test_close_cancels_inflight_request() {
        let index = Arc::new(GatedIndex::default());
        let gate = index.gate_search("matrix");
        let mut session = SearchSession::new(index);

        session.set_query("matrix");
        settle_tasks().await;
        session.close();
        settle_tasks().await;

        // The task is gone, so nobody is listening on the gate any more
        assert!(gate.send(Ok(vec![])).is_err());
        assert_eq!(session.state(), SearchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_coalesces_keystrokes() {
        let index = Arc::new(StaticIndex::new().with_search("heat", Ok(vec![result("tt0113277", "Heat", "1995")])));
        let mut session = SearchSession::with_options(index.clone(), MIN_QUERY_LEN, Duration::from_millis(300));

        session.set_query("hea");
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.set_query("heat");

        let state = session.settled().await;
        assert_eq!(state.results().len(), 1);
        assert_eq!(index.search_calls(), 1);
    }
}
