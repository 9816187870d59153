use async_trait::async_trait;

use crate::modules::search::domain::SearchResponse;
use crate::shared::errors::SearchError;

/// Port (interface) for the HTTP-capable fetch primitive
/// Infrastructure layer implements this (reqwest client, test doubles, ...)
///
/// Implementations report transport failures only; the status code is
/// checked by the request supervisor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<SearchResponse, SearchError>;
}
