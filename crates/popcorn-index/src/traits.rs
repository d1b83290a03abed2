use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResult};
use crate::error::IndexError;

/// A remote movie database searchable by title and addressable by id.
#[async_trait]
pub trait MovieIndex: Send + Sync {
    fn index_name(&self) -> &str;

    /// Title search. An empty match list is reported as `IndexError::NotFound`.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, IndexError>;

    /// Full detail for one id
    async fn detail(&self, id: &str) -> Result<MovieDetail, IndexError>;
}
