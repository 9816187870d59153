//! Search-as-you-type input pipeline.
//!
//! Raw keystroke values are normalized, rate limited, and turned into at
//! most one live HTTP lookup; a newer settled term always supersedes the
//! outcome of an older one.

pub mod modules;
pub mod shared;

pub use modules::search::{
    normalize, FatalErrorPolicy, Fetcher, HttpClientConfig, HttpFetcher, NormalizedTerm,
    PipelineConfig, PipelineState, RateLimitPolicy, SearchCallbacks, SearchPipeline,
    SearchResponse,
};
pub use shared::errors::{AppError, AppResult, SearchError};
pub use shared::utils::init_logger;
