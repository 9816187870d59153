/// Test helper functions and pipeline builders
use super::fakes::ScriptedFetcher;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use typeahead_lib::{
    FatalErrorPolicy, PipelineConfig, RateLimitPolicy, SearchCallbacks, SearchError,
    SearchPipeline, SearchResponse,
};

pub const BASE_URL: &str = "/foo/bar";

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// URL the default resolver builds for a normalized term
pub fn url_for(term: &str) -> String {
    format!("{}/{}", BASE_URL, term)
}

/// Records everything the pipeline hands back to the caller
#[derive(Default)]
pub struct Recorder {
    responses: Mutex<Vec<SearchResponse>>,
    fatal: Mutex<Vec<SearchError>>,
    offered: Mutex<Vec<SearchError>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Callbacks resolving `term` to `/foo/bar/<term>` and retrying when `retry`
    pub fn callbacks(self: &Arc<Self>, retry: bool) -> SearchCallbacks {
        let on_response = self.clone();
        let on_fatal = self.clone();
        let offered = self.clone();

        SearchCallbacks::new(
            |term| Ok(url_for(term.as_str())),
            move |response| {
                on_response.responses.lock().unwrap().push(response);
                Ok(())
            },
            move |error| on_fatal.fatal.lock().unwrap().push(error),
        )
        .with_should_retry(move |error| {
            offered.offered.lock().unwrap().push(error.clone());
            retry
        })
    }

    pub fn responses(&self) -> Vec<SearchResponse> {
        self.responses.lock().unwrap().clone()
    }

    pub fn response_urls(&self) -> Vec<String> {
        self.responses()
            .iter()
            .map(|response| response.url().to_string())
            .collect()
    }

    pub fn fatal(&self) -> Vec<SearchError> {
        self.fatal.lock().unwrap().clone()
    }

    /// Every error that went through the retry predicate
    pub fn offered(&self) -> Vec<SearchError> {
        self.offered.lock().unwrap().clone()
    }
}

pub struct TestPipeline {
    pub pipeline: SearchPipeline,
    pub fetcher: Arc<ScriptedFetcher>,
    pub recorder: Arc<Recorder>,
}

/// Active pipeline with the default 150ms debounce
pub fn active_pipeline(retry: bool) -> TestPipeline {
    build_pipeline(PipelineConfig::new(), retry)
}

pub fn build_pipeline(config: PipelineConfig, retry: bool) -> TestPipeline {
    let fetcher = ScriptedFetcher::new();
    let recorder = Recorder::new();
    let mut pipeline =
        SearchPipeline::new(config, recorder.callbacks(retry), fetcher.clone()).unwrap();
    pipeline.activate().unwrap();

    TestPipeline {
        pipeline,
        fetcher,
        recorder,
    }
}

pub fn throttled_config(delay: Duration, interval: Duration) -> PipelineConfig {
    PipelineConfig::new().with_rate_limit(RateLimitPolicy::delay_then_throttle(delay, interval))
}

pub fn continue_on_fatal_config() -> PipelineConfig {
    PipelineConfig::new().with_fatal_error_policy(FatalErrorPolicy::Continue)
}
