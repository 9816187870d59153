/// Scripted test doubles for the fetch port
///
/// Replies are keyed by URL; unscripted URLs answer `200 {}` immediately.
/// Delayed replies sleep on tokio time, so paused-clock tests stay exact.
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use typeahead_lib::{Fetcher, SearchError, SearchResponse};

#[derive(Clone)]
struct Reply {
    delay: Option<Duration>,
    outcome: Result<(u16, String), String>,
}

#[derive(Default)]
pub struct ScriptedFetcher {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.script(url, None, Ok((status, body.to_string())));
    }

    pub fn respond_after(&self, url: &str, delay: Duration, status: u16, body: &str) {
        self.script(url, Some(delay), Ok((status, body.to_string())));
    }

    /// Transport-level failure, like a refused connection
    pub fn fail(&self, url: &str, message: &str) {
        self.script(url, None, Err(message.to_string()));
    }

    /// URLs fetched so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn script(&self, url: &str, delay: Option<Duration>, outcome: Result<(u16, String), String>) {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), Reply { delay, outcome });
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<SearchResponse, SearchError> {
        self.calls.lock().unwrap().push(url.to_string());
        let reply = self.replies.lock().unwrap().get(url).cloned();

        let Some(reply) = reply else {
            return Ok(SearchResponse::new(url, 200, "{}"));
        };

        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }

        match reply.outcome {
            Ok((status, body)) => Ok(SearchResponse::new(url, status, body)),
            Err(message) => Err(SearchError::transport(url, message)),
        }
    }
}
