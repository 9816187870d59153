pub mod pending_request;

pub use pending_request::{Generation, PendingRequest};
