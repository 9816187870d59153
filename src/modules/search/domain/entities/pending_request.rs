use crate::modules::search::domain::value_objects::NormalizedTerm;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Marker telling the live lookup apart from superseded ones.
///
/// Strictly increasing per pipeline session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The one lookup whose outcome may still reach the caller
#[derive(Debug)]
pub struct PendingRequest {
    pub term: NormalizedTerm,
    pub url: String,
    pub generation: Generation,
    cancel: CancellationToken,
}

impl PendingRequest {
    pub fn new(
        term: NormalizedTerm,
        url: String,
        generation: Generation,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            term,
            url,
            generation,
            cancel,
        }
    }

    /// Token the transport task watches for early abort
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Advisory abort of the transport; delivery is gated by the generation
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}
