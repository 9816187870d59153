use serde::Serialize;
use std::fmt;

/// Observable state of one pipeline session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Not activated, or deactivated
    Inactive,
    /// Listening, nothing pending
    Idle,
    /// A term is waiting on the rate limiter
    AwaitingSettle,
    /// A lookup is outstanding
    InFlight,
    /// An unrecoverable failure halted the session
    Terminated,
}

impl PipelineState {
    /// Whether new input can still lead to a lookup
    pub fn is_listening(&self) -> bool {
        matches!(
            self,
            PipelineState::Idle | PipelineState::AwaitingSettle | PipelineState::InFlight
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineState::Inactive => "inactive",
            PipelineState::Idle => "idle",
            PipelineState::AwaitingSettle => "awaiting_settle",
            PipelineState::InFlight => "in_flight",
            PipelineState::Terminated => "terminated",
        };
        f.write_str(s)
    }
}
