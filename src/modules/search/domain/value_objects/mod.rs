pub mod normalized_term;
pub mod pipeline_state;
pub mod rate_limit_policy;
pub mod search_response;

pub use normalized_term::*;
pub use pipeline_state::*;
pub use rate_limit_policy::*;
pub use search_response::*;
