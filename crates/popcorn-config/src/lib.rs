pub mod config;
pub mod paths;

pub use config::{
    Config, DisplayConfig, OmdbConfig, SearchConfig, StorageConfig, API_KEY_ENV, DEFAULT_OMDB_BASE_URL, MIN_QUERY_LEN,
};
pub use paths::{base_path_override, PathManager};
