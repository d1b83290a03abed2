pub mod app;
pub mod detail;
pub mod persistent;
pub mod search;
pub mod shortcuts;
pub mod stats;
pub mod title;
pub mod watched;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{AddOutcome, AppError, PopcornApp};
pub use detail::{DetailSession, DetailState, DETAIL_FAILED};
pub use persistent::{FileStore, KeyValueStore, MemoryStore, PersistentList, StoreError};
pub use search::{is_searchable, SearchSession, SearchSnapshot, SearchState};
pub use shortcuts::{Intent, Key, Shortcuts, Subscription};
pub use stats::{compute_stats, WatchedStats};
pub use title::{SharedTitle, TitleGuard, TitleHost};
pub use watched::WatchedListStore;
