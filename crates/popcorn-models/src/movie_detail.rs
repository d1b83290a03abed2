use serde::{Deserialize, Serialize};

/// Full record for a single title.
///
/// Transient: fetched fresh every time a detail view opens and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub released: String,
    /// Raw runtime text as reported (e.g. "175 min")
    pub runtime: String,
    pub runtime_minutes: u32,
    pub genre: String,
    pub director: String,
    pub writer: String,
    pub actors: String,
    pub plot: String,
    pub poster_url: String,
    pub country: String,
    pub language: String,
    pub box_office: String,
    pub awards: String,
    pub rating_count: String,
    /// External rating on a 0-10 scale, absent when the index reports "N/A"
    pub external_rating: Option<f64>,
    pub certification: String,
}

impl MovieDetail {
    /// Text shown in the host title bar while this detail is on screen
    pub fn display_title(&self) -> String {
        format!("Movie | {}", self.title)
    }
}

/// Parse the leading whitespace-separated token of a free-text runtime
/// ("142 min" -> 142). Anything unparseable ("N/A", "") is 0.
pub fn parse_runtime_minutes(runtime: &str) -> u32 {
    runtime
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .unwrap_or(0)
}
