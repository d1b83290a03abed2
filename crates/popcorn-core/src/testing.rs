//! Fake indexes and fixtures shared by the session and app tests.

use async_trait::async_trait;
use popcorn_index::{IndexError, MovieIndex};
use popcorn_models::{MovieDetail, SearchResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

pub(crate) fn result(id: &str, title: &str, year: &str) -> SearchResult {
    SearchResult {
        id: id.to_string(),
        title: title.to_string(),
        year: year.to_string(),
        poster_url: format!("https://example.com/{}.jpg", id),
        kind: "movie".to_string(),
    }
}

pub(crate) fn detail(id: &str, title: &str, runtime: &str, rating: Option<f64>) -> MovieDetail {
    MovieDetail {
        id: id.to_string(),
        title: title.to_string(),
        year: "1972".to_string(),
        released: "24 Mar 1972".to_string(),
        runtime: runtime.to_string(),
        runtime_minutes: popcorn_models::parse_runtime_minutes(runtime),
        genre: "Crime, Drama".to_string(),
        director: "Francis Ford Coppola".to_string(),
        writer: "Mario Puzo".to_string(),
        actors: "Marlon Brando, Al Pacino".to_string(),
        plot: "An organized crime dynasty changes hands.".to_string(),
        poster_url: format!("https://example.com/{}.jpg", id),
        country: "United States".to_string(),
        language: "English".to_string(),
        box_office: "N/A".to_string(),
        awards: "N/A".to_string(),
        rating_count: "1,000".to_string(),
        external_rating: rating,
        certification: "R".to_string(),
    }
}

pub(crate) fn godfather_results() -> Vec<SearchResult> {
    vec![
        result("tt0068646", "The Godfather", "1972"),
        result("tt0071562", "The Godfather Part II", "1974"),
    ]
}

pub(crate) fn godfather_detail() -> MovieDetail {
    detail("tt0068646", "The Godfather", "175 min", Some(9.2))
}

/// Answers immediately from fixed tables and counts calls.
#[derive(Default)]
pub(crate) struct StaticIndex {
    searches: HashMap<String, Result<Vec<SearchResult>, IndexError>>,
    details: HashMap<String, Result<MovieDetail, IndexError>>,
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl StaticIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_search(mut self, query: &str, outcome: Result<Vec<SearchResult>, IndexError>) -> Self {
        self.searches.insert(query.to_string(), outcome);
        self
    }

    pub(crate) fn with_detail(mut self, id: &str, outcome: Result<MovieDetail, IndexError>) -> Self {
        self.details.insert(id.to_string(), outcome);
        self
    }

    pub(crate) fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieIndex for StaticIndex {
    fn index_name(&self) -> &str {
        "static"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, IndexError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.searches
            .get(query)
            .cloned()
            .unwrap_or_else(|| Err(IndexError::NotFound("Movie not found!".to_string())))
    }

    async fn detail(&self, id: &str) -> Result<MovieDetail, IndexError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .get(id)
            .cloned()
            .unwrap_or_else(|| Err(IndexError::NotFound("Incorrect IMDb ID.".to_string())))
    }
}

type SearchGate = oneshot::Receiver<Result<Vec<SearchResult>, IndexError>>;
type DetailGate = oneshot::Receiver<Result<MovieDetail, IndexError>>;

/// Each request blocks until the test releases it, so completion order is
/// entirely up to the test.
#[derive(Default)]
pub(crate) struct GatedIndex {
    search_gates: Mutex<HashMap<String, SearchGate>>,
    detail_gates: Mutex<HashMap<String, DetailGate>>,
}

impl GatedIndex {
    pub(crate) fn gate_search(&self, query: &str) -> oneshot::Sender<Result<Vec<SearchResult>, IndexError>> {
        let (tx, rx) = oneshot::channel();
        self.search_gates.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    pub(crate) fn gate_detail(&self, id: &str) -> oneshot::Sender<Result<MovieDetail, IndexError>> {
        let (tx, rx) = oneshot::channel();
        self.detail_gates.lock().unwrap().insert(id.to_string(), rx);
        tx
    }
}

#[async_trait]
impl MovieIndex for GatedIndex {
    fn index_name(&self) -> &str {
        "gated"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, IndexError> {
        let gate = {
            let mut gates = self.search_gates.lock().unwrap();
            gates.remove(query)
        };
        match gate {
            Some(rx) => rx.await.unwrap_or(Err(IndexError::Cancelled)),
            None => Err(IndexError::Network(format!("no gate for {:?}", query))),
        }
    }

    async fn detail(&self, id: &str) -> Result<MovieDetail, IndexError> {
        let gate = {
            let mut gates = self.detail_gates.lock().unwrap();
            gates.remove(id)
        };
        match gate {
            Some(rx) => rx.await.unwrap_or(Err(IndexError::Cancelled)),
            None => Err(IndexError::Network(format!("no gate for {:?}", id))),
        }
    }
}

/// Let spawned tasks run up to their next suspension point
pub(crate) async fn settle_tasks() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
