// Shared kernel: error types and cross-cutting utilities

pub mod errors; // Shared error types
pub mod utils; // Logging

pub use errors::{AppError, AppResult, SearchError};
