//! Request supervisor: one logically live lookup at a time
//!
//! Every dispatched term gets a fresh [`Generation`]. Lookups run on their
//! own tasks and report back tagged with the generation they were started
//! under; anything that no longer matches the current generation is dropped
//! before it can reach a callback.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::callbacks::SearchCallbacks;
use super::config::FatalErrorPolicy;
use super::ports::Fetcher;
use crate::modules::search::domain::{Generation, NormalizedTerm, PendingRequest, SearchResponse};
use crate::shared::errors::SearchError;
use crate::shared::utils::TimedOperation;
use crate::{log_debug, log_error, log_warn};

/// Result of one lookup, tagged with the generation it was started under
#[derive(Debug)]
pub struct LookupOutcome {
    pub generation: Generation,
    pub result: Result<SearchResponse, SearchError>,
}

/// What the driver should do after the supervisor handled an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorStep {
    Continue,
    Halt,
}

/// Turns a transport-level success with a non-2xx status into a failure
pub fn check_status(response: SearchResponse) -> Result<SearchResponse, SearchError> {
    if response.ok() {
        Ok(response)
    } else {
        Err(SearchError::HttpStatus {
            url: response.url().to_string(),
            status: response.status(),
        })
    }
}

pub struct RequestSupervisor {
    fetcher: Arc<dyn Fetcher>,
    callbacks: SearchCallbacks,
    fatal_error_policy: FatalErrorPolicy,
    generation: Generation,
    current: Option<PendingRequest>,
    outcomes: mpsc::UnboundedSender<LookupOutcome>,
    root: CancellationToken,
}

impl RequestSupervisor {
    /// Lookup tokens are children of `root`, so cancelling it aborts them all
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        callbacks: SearchCallbacks,
        fatal_error_policy: FatalErrorPolicy,
        root: CancellationToken,
    ) -> (Self, mpsc::UnboundedReceiver<LookupOutcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        let supervisor = Self {
            fetcher,
            callbacks,
            fatal_error_policy,
            generation: Generation::default(),
            current: None,
            outcomes,
            root,
        };
        (supervisor, receiver)
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.current.is_some()
    }

    /// Start a lookup for a settled term, superseding the live one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, term: NormalizedTerm) -> SupervisorStep {
        if let Some(previous) = self.current.take() {
            log_debug!(
                "Lookup {} for '{}' ({}) superseded by '{}'",
                previous.generation,
                previous.term,
                previous.url,
                term
            );
            previous.cancel();
        }

        self.generation = self.generation.next();
        let generation = self.generation;

        let url = match self.callbacks.resolve_url(&term) {
            Ok(url) => url,
            Err(error) => return self.handle_failure(error),
        };

        log_debug!("Lookup {} for '{}' -> {}", generation, term, url);

        let request = PendingRequest::new(term, url.clone(), generation, self.root.child_token());
        let cancel = request.cancellation();
        let fetcher = self.fetcher.clone();
        let outcomes = self.outcomes.clone();

        tokio::spawn(async move {
            let timer = TimedOperation::new(&format!("Lookup {}", generation));
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    timer.finish_with_info("cancelled");
                    return;
                }
                result = fetcher.fetch(&url) => result.and_then(check_status),
            };

            let info = match &result {
                Ok(response) => format!("status {}", response.status()),
                Err(error) => error.to_string(),
            };
            timer.finish_with_info(&info);

            // The driver may already be gone; nothing to deliver to then
            let _ = outcomes.send(LookupOutcome { generation, result });
        });

        self.current = Some(request);
        SupervisorStep::Continue
    }

    /// Deliver an outcome if it still belongs to the live lookup
    pub fn handle_outcome(&mut self, outcome: LookupOutcome) -> SupervisorStep {
        let is_current = self
            .current
            .as_ref()
            .is_some_and(|request| request.generation == outcome.generation);

        if !is_current {
            log_debug!(
                "Discarding stale outcome of lookup {} (current {})",
                outcome.generation,
                self.generation
            );
            return SupervisorStep::Continue;
        }

        self.current = None;

        match outcome.result {
            Ok(response) => match self.callbacks.deliver_response(response) {
                Ok(()) => SupervisorStep::Continue,
                Err(error) => self.handle_failure(error),
            },
            Err(error) => self.handle_failure(error),
        }
    }

    fn handle_failure(&mut self, error: SearchError) -> SupervisorStep {
        if self.callbacks.should_retry(&error) {
            log_warn!("Recoverable search failure, still listening: {}", error);
            return SupervisorStep::Continue;
        }

        log_error!("Unrecoverable search failure: {}", error);
        self.callbacks.deliver_fatal(error);

        match self.fatal_error_policy {
            FatalErrorPolicy::Halt => {
                self.shutdown();
                SupervisorStep::Halt
            }
            FatalErrorPolicy::Continue => SupervisorStep::Continue,
        }
    }

    /// Cancel the live lookup; its outcome will never be delivered
    pub fn shutdown(&mut self) {
        if let Some(request) = self.current.take() {
            log_debug!("Cancelling lookup {} for '{}'", request.generation, request.term);
            request.cancel();
        }
    }
}
