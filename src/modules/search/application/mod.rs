pub mod callbacks;
pub mod config;
pub mod input_source;
pub mod pipeline;
pub mod ports;
pub mod rate_limiter;
pub mod supervisor;

pub use callbacks::SearchCallbacks;
pub use config::{FatalErrorPolicy, HttpClientConfig, PipelineConfig};
pub use input_source::InputSource;
pub use pipeline::SearchPipeline;
pub use ports::Fetcher;
pub use rate_limiter::RateLimiter;
pub use supervisor::{check_status, RequestSupervisor};
