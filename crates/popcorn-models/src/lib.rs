pub mod movie_detail;
pub mod search_result;
pub mod watched;

pub use movie_detail::{parse_runtime_minutes, MovieDetail};
pub use search_result::SearchResult;
pub use watched::WatchedRecord;
