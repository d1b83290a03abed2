use popcorn_index::{IndexError, MovieIndex};
use popcorn_models::MovieDetail;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use crate::title::{TitleGuard, TitleHost};

/// Message shown for any detail lookup the index could not satisfy
pub const DETAIL_FAILED: &str = "Something went wrong while fetching movies";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    /// Nothing selected
    Empty,
    Loading,
    Ok(MovieDetail),
    Failed(String),
}

impl DetailState {
    pub fn is_loading(&self) -> bool {
        matches!(self, DetailState::Loading)
    }

    pub fn detail(&self) -> Option<&MovieDetail> {
        match self {
            DetailState::Ok(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DetailState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

struct DetailSnapshot {
    generation: u64,
    selected: Option<String>,
    state: DetailState,
    // Present exactly while `state` is `Ok`
    title: Option<TitleGuard>,
}

/// Loads full detail for the selected id; the last selection wins.
pub struct DetailSession {
    index: Arc<dyn MovieIndex>,
    title_host: Arc<dyn TitleHost>,
    default_title: String,
    tx: Arc<watch::Sender<DetailSnapshot>>,
    inflight: Option<JoinHandle<()>>,
}

impl DetailSession {
    pub fn new(index: Arc<dyn MovieIndex>, title_host: Arc<dyn TitleHost>, default_title: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(DetailSnapshot {
            generation: 0,
            selected: None,
            state: DetailState::Empty,
            title: None,
        });

        Self {
            index,
            title_host,
            default_title: default_title.into(),
            tx: Arc::new(tx),
            inflight: None,
        }
    }

    pub fn selected(&self) -> Option<String> {
        self.tx.borrow().selected.clone()
    }

    pub fn state(&self) -> DetailState {
        self.tx.borrow().state.clone()
    }

    /// Switch to `id` (or to nothing), superseding any in-flight load.
    ///
    /// Must be called from within a Tokio runtime when `id` is `Some`.
    pub fn select(&mut self, id: Option<String>) {
        self.abort_inflight();

        let mut generation = 0;
        let loading = id.is_some();
        self.tx.send_modify(|snap| {
            snap.generation += 1;
            generation = snap.generation;
            snap.selected = id.clone();
            // Dropping the guard puts the default title back
            snap.title = None;
            snap.state = if loading { DetailState::Loading } else { DetailState::Empty };
        });

        let Some(id) = id else {
            return;
        };

        let index = Arc::clone(&self.index);
        let tx = Arc::clone(&self.tx);
        let host = Arc::clone(&self.title_host);
        let default_title = self.default_title.clone();

        self.inflight = Some(tokio::spawn(async move {
            debug!("Loading detail for {} (generation {})", id, generation);
            let outcome = index.detail(&id).await;
            apply_outcome(&tx, generation, outcome, &host, &default_title);
        }));
    }

    pub fn close(&mut self) {
        self.select(None);
    }

    /// Wait until the current selection is no longer loading
    pub async fn settled(&self) -> DetailState {
        let mut rx = self.tx.subscribe();
        let settled = match rx.wait_for(|snap| !snap.state.is_loading()).await {
            Ok(snap) => Some(snap.state.clone()),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.state())
    }

    fn abort_inflight(&mut self) {
        if let Some(handle) = self.inflight.take() {
            if !handle.is_finished() {
                debug!("Aborting superseded detail request");
            }
            handle.abort();
        }
    }
}

impl Drop for DetailSession {
    fn drop(&mut self) {
        self.abort_inflight();
        // The aborted task may still hold the channel for a moment; restore the
        // title here rather than whenever the last handle goes away
        self.tx.send_modify(|snap| {
            snap.generation += 1;
            snap.title = None;
            snap.state = DetailState::Empty;
        });
    }
}

fn apply_outcome(
    tx: &watch::Sender<DetailSnapshot>,
    generation: u64,
    outcome: Result<MovieDetail, IndexError>,
    host: &Arc<dyn TitleHost>,
    default_title: &str,
) -> bool {
    tx.send_if_modified(|snap| {
        if snap.generation != generation {
            debug!(
                "Discarding stale detail response (generation {}, current {})",
                generation, snap.generation
            );
            return false;
        }

        match outcome {
            Ok(detail) => {
                // Restore before overriding so the old guard cannot clobber the new title
                drop(snap.title.take());
                snap.title = Some(TitleGuard::new(Arc::clone(host), &detail.display_title(), default_title));
                snap.state = DetailState::Ok(detail);
            }
            Err(IndexError::Cancelled) => {
                debug!("Detail load for {:?} was cancelled", snap.selected);
                snap.state = DetailState::Empty;
            }
            Err(IndexError::NotFound(reason)) => {
                warn!("Detail for {:?} not found: {}", snap.selected, reason);
                snap.state = DetailState::Failed(DETAIL_FAILED.to_string());
            }
            Err(e) => {
                warn!("Detail for {:?} failed: {}", snap.selected, e);
                snap.state = DetailState::Failed(e.to_string());
            }
        }
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{detail, godfather_detail, settle_tasks, GatedIndex, StaticIndex};
    use crate::title::SharedTitle;

    fn session(index: Arc<dyn MovieIndex>) -> (DetailSession, SharedTitle) {
        let title = SharedTitle::new("usePopcorn");
        let session = DetailSession::new(index, Arc::new(title.clone()), "usePopcorn");
        (session, title)
    }

    #[tokio::test]
    async fn test_loads_detail_and_sets_title() {
        let index = Arc::new(StaticIndex::new().with_detail("tt0068646", Ok(godfather_detail())));
        let (mut session, title) = session(index);

        assert_eq!(session.state(), DetailState::Empty);
        session.select(Some("tt0068646".to_string()));
        assert!(session.state().is_loading());

        let state = session.settled().await;
        assert_eq!(state.detail().map(|d| d.runtime_minutes), Some(175));
        assert_eq!(title.current(), "Movie | The Godfather");
        assert_eq!(session.selected().as_deref(), Some("tt0068646"));
    }

    #[tokio::test]
    async fn test_clearing_selection_restores_title() {
        let index = Arc::new(StaticIndex::new().with_detail("tt0068646", Ok(godfather_detail())));
        let (mut session, title) = session(index);

        session.select(Some("tt0068646".to_string()));
        session.settled().await;
        session.close();

        assert_eq!(session.state(), DetailState::Empty);
        assert_eq!(session.selected(), None);
        assert_eq!(title.current(), "usePopcorn");
    }

    #[tokio::test]
    async fn test_dropping_session_restores_title() {
        let index = Arc::new(StaticIndex::new().with_detail("tt0068646", Ok(godfather_detail())));
        let (mut session, title) = session(index);

        session.select(Some("tt0068646".to_string()));
        session.settled().await;
        assert_eq!(title.current(), "Movie | The Godfather");

        drop(session);
        assert_eq!(title.current(), "usePopcorn");
    }

    #[tokio::test]
    async fn test_not_found_is_normalized() {
        let index = Arc::new(
            StaticIndex::new().with_detail("tt0000000", Err(IndexError::NotFound("Incorrect IMDb ID.".to_string()))),
        );
        let (mut session, title) = session(index);

        session.select(Some("tt0000000".to_string()));
        let state = session.settled().await;
        assert_eq!(state.error(), Some(DETAIL_FAILED));
        assert_eq!(title.current(), "usePopcorn");
    }

    #[tokio::test]
    async fn test_network_error_keeps_its_message() {
        let index = Arc::new(
            StaticIndex::new().with_detail("tt0068646", Err(IndexError::Network("Request timed out".to_string()))),
        );
        let (mut session, _title) = session(index);

        session.select(Some("tt0068646".to_string()));
        assert_eq!(session.settled().await.error(), Some("Request timed out"));
    }

    #[tokio::test]
    async fn test_cancellation_is_swallowed() {
        let index = Arc::new(GatedIndex::default());
        let gate = index.gate_detail("tt0068646");
        let (mut session, title) = session(index.clone());

        session.select(Some("tt0068646".to_string()));
        settle_tasks().await;
        gate.send(Err(IndexError::Cancelled)).unwrap();

        let state = session.settled().await;
        assert_eq!(state, DetailState::Empty);
        assert_eq!(state.error(), None);
        assert_eq!(title.current(), "usePopcorn");
    }

    #[tokio::test]
    async fn test_last_selection_wins() {
        let index = Arc::new(GatedIndex::default());
        let first = index.gate_detail("tt0068646");
        let second = index.gate_detail("tt0071562");
        let (mut session, title) = session(index.clone());

        session.select(Some("tt0068646".to_string()));
        settle_tasks().await;
        session.select(Some("tt0071562".to_string()));
        settle_tasks().await;

        second
            .send(Ok(detail("tt0071562", "The Godfather Part II", "202 min", Some(9.0))))
            .unwrap();
        let state = session.settled().await;
        let _ = first.send(Ok(godfather_detail()));
        settle_tasks().await;

        assert_eq!(state.detail().map(|d| d.id.as_str()), Some("tt0071562"));
        assert_eq!(session.state(), state);
        assert_eq!(title.current(), "Movie | The Godfather Part II");
    }

    #[tokio::test]
    async fn test_switching_selection_resets_title_while_loading() {
        let index = Arc::new(GatedIndex::default());
        let first = index.gate_detail("tt0068646");
        let _second = index.gate_detail("tt0071562");
        let (mut session, title) = session(index.clone());

        session.select(Some("tt0068646".to_string()));
        settle_tasks().await;
        first.send(Ok(godfather_detail())).unwrap();
        session.settled().await;
        assert_eq!(title.current(), "Movie | The Godfather");

        session.select(Some("tt0071562".to_string()));
        assert!(session.state().is_loading());
        assert_eq!(title.current(), "usePopcorn");
    }
}
