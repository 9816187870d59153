pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use application::{
    FatalErrorPolicy, Fetcher, HttpClientConfig, PipelineConfig, SearchCallbacks, SearchPipeline,
};
pub use domain::{normalize, NormalizedTerm, PipelineState, RateLimitPolicy, SearchResponse};
pub use infrastructure::HttpFetcher;
