use serde::{Deserialize, Deserializer, Serialize};
use crate::movie_detail::MovieDetail;

/// A title the user has watched and rated.
///
/// Field names on disk keep the shape the watched list has always been stored
/// in, so lists written by earlier clients still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedRecord {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Poster")]
    pub poster_url: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "imdbRating", default, deserialize_with = "null_as_zero")]
    pub external_rating: f64,
    #[serde(rename = "Runtime", default, deserialize_with = "null_as_zero")]
    pub runtime_minutes: u32,
    #[serde(rename = "userRating")]
    pub user_rating: u8, // 1-10
}

impl WatchedRecord {
    /// Build a record from a loaded detail and the user's rating.
    ///
    /// A missing external rating is stored as 0.
    pub fn from_detail(detail: &MovieDetail, user_rating: u8) -> Self {
        Self {
            id: detail.id.clone(),
            title: detail.title.clone(),
            poster_url: detail.poster_url.clone(),
            year: detail.year.clone(),
            external_rating: detail.external_rating.unwrap_or(0.0),
            runtime_minutes: detail.runtime_minutes,
            user_rating,
        }
    }
}

// Unknown ratings and runtimes were written as NaN, which JSON stores as null
fn null_as_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
