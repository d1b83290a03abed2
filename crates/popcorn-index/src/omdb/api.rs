use popcorn_models::{parse_runtime_minutes, MovieDetail, SearchResult};
use serde::Deserialize;
use tracing::debug;
use crate::error::IndexError;

pub const SEARCH_FAILED: &str = "Something went wrong with fetching movies";
pub const SEARCH_NOT_FOUND: &str = "Movie not found";
pub const DETAIL_FAILED: &str = "Something went wrong while fetching movies";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbSearchResponse {
    #[serde(default)]
    search: Vec<OmdbSearchItem>,
    response: String,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbSearchItem {
    title: String,
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Type", default)]
    item_type: String,
    #[serde(default)]
    poster: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbDetailResponse {
    response: String,
    error: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    rated: String,
    #[serde(default)]
    released: String,
    #[serde(default)]
    runtime: String,
    #[serde(default)]
    genre: String,
    #[serde(default)]
    director: String,
    #[serde(default)]
    writer: String,
    #[serde(default)]
    actors: String,
    #[serde(default)]
    plot: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    awards: String,
    #[serde(default)]
    poster: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "imdbVotes", default)]
    imdb_votes: String,
    #[serde(default)]
    box_office: String,
}

/// OMDb signals logical failure in the body, not the status line
fn is_false(response: &str) -> bool {
    response.eq_ignore_ascii_case("false")
}

impl From<OmdbSearchItem> for SearchResult {
    fn from(item: OmdbSearchItem) -> Self {
        SearchResult {
            id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster_url: item.poster,
            kind: item.item_type,
        }
    }
}

impl From<OmdbDetailResponse> for MovieDetail {
    fn from(raw: OmdbDetailResponse) -> Self {
        MovieDetail {
            runtime_minutes: parse_runtime_minutes(&raw.runtime),
            external_rating: raw.imdb_rating.trim().parse::<f64>().ok(),
            id: raw.imdb_id,
            title: raw.title,
            year: raw.year,
            released: raw.released,
            runtime: raw.runtime,
            genre: raw.genre,
            director: raw.director,
            writer: raw.writer,
            actors: raw.actors,
            plot: raw.plot,
            poster_url: raw.poster,
            country: raw.country,
            language: raw.language,
            box_office: raw.box_office,
            awards: raw.awards,
            rating_count: raw.imdb_votes,
            certification: raw.rated,
        }
    }
}

/// Parse a `?s=` response body
pub fn parse_search_response(body: &str) -> Result<Vec<SearchResult>, IndexError> {
    let parsed: OmdbSearchResponse = serde_json::from_str(body)?;

    if is_false(&parsed.response) {
        let message = parsed.error.unwrap_or_else(|| SEARCH_NOT_FOUND.to_string());
        debug!("OMDb search returned logical failure: {}", message);
        return Err(IndexError::NotFound(message));
    }
    if parsed.search.is_empty() {
        return Err(IndexError::NotFound(SEARCH_NOT_FOUND.to_string()));
    }

    Ok(parsed.search.into_iter().map(SearchResult::from).collect())
}

/// Parse a `?i=` response body
pub fn parse_detail_response(body: &str) -> Result<MovieDetail, IndexError> {
    let parsed: OmdbDetailResponse = serde_json::from_str(body)?;

    if is_false(&parsed.response) {
        let message = parsed.error.clone().unwrap_or_else(|| "Incorrect IMDb ID.".to_string());
        debug!("OMDb detail returned logical failure: {}", message);
        return Err(IndexError::NotFound(message));
    }

    Ok(parsed.into())
}
