use thiserror::Error;

/// Failures reported by a movie index.
///
/// Only `Network` and `NotFound` are meant for the user; `Cancelled` marks a
/// superseded request and is always swallowed by the sessions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    NotFound(String),

    #[error("request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for IndexError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            IndexError::Network("Request timed out".to_string())
        } else if err.is_decode() {
            IndexError::Network(format!("Malformed response: {}", err))
        } else {
            IndexError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for IndexError {
    fn from(err: serde_json::Error) -> Self {
        IndexError::Network(format!("Malformed response: {}", err))
    }
}
