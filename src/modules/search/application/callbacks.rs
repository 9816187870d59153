use std::fmt;
use std::sync::Arc;

use crate::modules::search::domain::{NormalizedTerm, SearchResponse};
use crate::shared::errors::SearchError;

pub type ResolveUrlFn = dyn Fn(&NormalizedTerm) -> anyhow::Result<String> + Send + Sync;
pub type ResponseFn = dyn Fn(SearchResponse) -> anyhow::Result<()> + Send + Sync;
pub type FatalErrorFn = dyn Fn(SearchError) + Send + Sync;
pub type RetryFn = dyn Fn(&SearchError) -> bool + Send + Sync;

/// Caller-supplied hooks of a pipeline.
///
/// `resolve_url`, `on_response` and `on_fatal_error` are required;
/// `should_retry` defaults to never retrying.
#[derive(Clone)]
pub struct SearchCallbacks {
    pub(crate) resolve_url: Arc<ResolveUrlFn>,
    pub(crate) on_response: Arc<ResponseFn>,
    pub(crate) on_fatal_error: Arc<FatalErrorFn>,
    pub(crate) should_retry: Arc<RetryFn>,
}

impl SearchCallbacks {
    pub fn new<U, R, E>(resolve_url: U, on_response: R, on_fatal_error: E) -> Self
    where
        U: Fn(&NormalizedTerm) -> anyhow::Result<String> + Send + Sync + 'static,
        R: Fn(SearchResponse) -> anyhow::Result<()> + Send + Sync + 'static,
        E: Fn(SearchError) + Send + Sync + 'static,
    {
        Self {
            resolve_url: Arc::new(resolve_url),
            on_response: Arc::new(on_response),
            on_fatal_error: Arc::new(on_fatal_error),
            should_retry: Arc::new(|_: &SearchError| false),
        }
    }

    pub fn with_should_retry<F>(mut self, should_retry: F) -> Self
    where
        F: Fn(&SearchError) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Arc::new(should_retry);
        self
    }

    pub fn resolve_url(&self, term: &NormalizedTerm) -> Result<String, SearchError> {
        (self.resolve_url)(term).map_err(SearchError::consumer)
    }

    pub fn deliver_response(&self, response: SearchResponse) -> Result<(), SearchError> {
        (self.on_response)(response).map_err(SearchError::consumer)
    }

    pub fn deliver_fatal(&self, error: SearchError) {
        (self.on_fatal_error)(error)
    }

    pub fn should_retry(&self, error: &SearchError) -> bool {
        (self.should_retry)(error)
    }
}

impl fmt::Debug for SearchCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCallbacks").finish_non_exhaustive()
    }
}
