use serde::Serialize;
use thiserror::Error;

/// Failures a lookup can end with.
///
/// Every variant is offered to the caller's retry predicate before it can
/// reach the fatal-error callback.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum SearchError {
    #[error("Failed to fetch \"{url}\": {message}")]
    Transport { url: String, message: String },

    #[error("Error fetching \"{url}\". Status code was \"{status}\".")]
    HttpStatus { url: String, status: u16 },

    #[error("Search callback failed: {message}")]
    Consumer { message: String },
}

impl SearchError {
    pub fn transport(url: &str, err: impl std::fmt::Display) -> Self {
        SearchError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub fn consumer(err: anyhow::Error) -> Self {
        // `{:#}` keeps the whole context chain on one line
        SearchError::Consumer {
            message: format!("{:#}", err),
        }
    }

    /// The resource the failing lookup targeted, when one was resolved
    pub fn url(&self) -> Option<&str> {
        match self {
            SearchError::Transport { url, .. } | SearchError::HttpStatus { url, .. } => Some(url),
            SearchError::Consumer { .. } => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SearchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
