use async_trait::async_trait;
use popcorn_config::OmdbConfig;
use popcorn_models::{MovieDetail, SearchResult};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::{debug, warn};
use crate::error::IndexError;
use crate::omdb::api;
use crate::traits::MovieIndex;

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(config: &OmdbConfig) -> Self {
        let client = Client::builder()
            .user_agent(concat!("popcorn/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client: Arc::new(client),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// GET the base URL with the given parameters and return the body text.
    ///
    /// A non-2xx status is reported as `failure` plus the status.
    async fn get(&self, params: &[(&str, &str)], failure: &str) -> Result<String, IndexError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("OMDb request failed with status {}", status);
            return Err(status_error(failure, status));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl MovieIndex for OmdbClient {
    fn index_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, IndexError> {
        debug!("OMDb search: {:?}", query);
        let body = self.get(&[("s", query)], api::SEARCH_FAILED).await?;
        let results = api::parse_search_response(&body)?;
        debug!("OMDb search {:?} returned {} results", query, results.len());
        Ok(results)
    }

    async fn detail(&self, id: &str) -> Result<MovieDetail, IndexError> {
        debug!("OMDb detail: {}", id);
        let body = self.get(&[("i", id), ("plot", "short")], api::DETAIL_FAILED).await?;
        api::parse_detail_response(&body)
    }
}

fn status_error(failure: &str, status: StatusCode) -> IndexError {
    IndexError::Network(format!("{} ({})", failure, status))
}
