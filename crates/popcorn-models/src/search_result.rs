use serde::{Deserialize, Serialize};

/// One lightweight match from a title search.
///
/// Results keep the order the remote index returned them in; duplicates are
/// the index's problem, not ours.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    /// "movie", "series", "episode", ... as reported by the index
    #[serde(default)]
    pub kind: String,
}
