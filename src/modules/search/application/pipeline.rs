//! Search pipeline lifecycle
//!
//! `activate` spawns one driver task per pipeline. The driver owns the rate
//! limiter and the request supervisor and is the only place callbacks run,
//! so results reach the caller in the causal order of settled terms.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::callbacks::SearchCallbacks;
use super::config::PipelineConfig;
use super::input_source::InputSource;
use super::ports::Fetcher;
use super::rate_limiter::RateLimiter;
use super::supervisor::{LookupOutcome, RequestSupervisor, SupervisorStep};
use crate::modules::search::domain::{NormalizedTerm, PipelineState};
use crate::modules::search::infrastructure::HttpFetcher;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_info, log_warn};

/// Listeners owned by an active pipeline, released exactly once
struct Subscription {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Subscription {
    async fn release(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            if e.is_panic() {
                log_warn!("Pipeline driver panicked: {}", e);
            }
        }
    }
}

/// A search-as-you-type pipeline instance
pub struct SearchPipeline {
    id: Uuid,
    config: PipelineConfig,
    callbacks: SearchCallbacks,
    fetcher: Arc<dyn Fetcher>,
    input: InputSource,
    state: watch::Sender<PipelineState>,
    subscription: Option<Subscription>,
}

impl SearchPipeline {
    pub fn new(
        config: PipelineConfig,
        callbacks: SearchCallbacks,
        fetcher: Arc<dyn Fetcher>,
    ) -> AppResult<Self> {
        config.validate()?;
        let (state, _) = watch::channel(PipelineState::Inactive);

        Ok(Self {
            id: Uuid::new_v4(),
            config,
            callbacks,
            fetcher,
            input: InputSource::new(),
            state,
            subscription: None,
        })
    }

    /// Pipeline backed by the reqwest fetcher built from `config.http`
    pub fn with_http(config: PipelineConfig, callbacks: SearchCallbacks) -> AppResult<Self> {
        let fetcher = HttpFetcher::new(&config.http)?;
        Self::new(config, callbacks, Arc::new(fetcher))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// True while the driver is running; false once a halting failure stopped it
    pub fn is_active(&self) -> bool {
        self.subscription.is_some() && self.state().is_listening()
    }

    /// Wire the stages together and start listening.
    ///
    /// Requires a tokio runtime. Fails if the pipeline is already active; a
    /// halted session is re-armed.
    pub fn activate(&mut self) -> AppResult<()> {
        if self.is_active() {
            return Err(AppError::InvalidState(format!(
                "Pipeline {} is already active",
                self.id
            )));
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            AppError::InvalidState(format!("Pipeline activation needs a tokio runtime: {}", e))
        })?;

        if let Some(halted) = self.subscription.take() {
            // The driver has already stopped delivering; let it finish detached
            log_debug!("Pipeline {} re-armed after halting", self.id);
            halted.cancel.cancel();
        }

        let cancel = CancellationToken::new();
        let (terms_tx, terms_rx) = mpsc::unbounded_channel();
        let (supervisor, outcomes) = RequestSupervisor::new(
            self.fetcher.clone(),
            self.callbacks.clone(),
            self.config.fatal_error_policy,
            cancel.clone(),
        );

        let driver = PipelineDriver {
            id: self.id,
            limiter: RateLimiter::new(self.config.rate_limit),
            supervisor,
            outcomes,
            terms: terms_rx,
            state: self.state.clone(),
            cancel: cancel.clone(),
        };

        self.state.send_replace(PipelineState::Idle);
        self.input.attach(terms_tx);
        let task = runtime.spawn(driver.run());
        self.subscription = Some(Subscription { cancel, task });

        log_info!(
            "Pipeline {} activated ({:?})",
            self.id,
            self.config.rate_limit
        );
        Ok(())
    }

    /// Tear the pipeline down.
    ///
    /// Pending timers and in-flight lookups are discarded and no callback
    /// runs once this returns. No-op when not active.
    pub async fn deactivate(&mut self) {
        let Some(subscription) = self.subscription.take() else {
            log_debug!("Pipeline {} is not active, nothing to release", self.id);
            return;
        };

        self.input.detach();
        subscription.release().await;
        self.state.send_replace(PipelineState::Inactive);
        log_info!("Pipeline {} deactivated", self.id);
    }

    /// Deactivate and activate again, e.g. after a halting failure
    pub async fn restart(&mut self) -> AppResult<()> {
        self.deactivate().await;
        self.activate()
    }

    /// Feed one raw keystroke value
    pub fn push(&self, value: impl Into<String>) {
        self.input.push(value.into());
    }

    /// Most recent raw value, for binding back into a text field
    pub fn current_value(&self) -> String {
        self.input.current_value()
    }

    pub fn watch_value(&self) -> watch::Receiver<String> {
        self.input.subscribe()
    }

    pub fn state(&self) -> PipelineState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }
}

impl Drop for SearchPipeline {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel.cancel();
        }
    }
}

struct PipelineDriver {
    id: Uuid,
    limiter: RateLimiter,
    supervisor: RequestSupervisor,
    outcomes: mpsc::UnboundedReceiver<LookupOutcome>,
    terms: mpsc::UnboundedReceiver<NormalizedTerm>,
    state: watch::Sender<PipelineState>,
    cancel: CancellationToken,
}

impl PipelineDriver {
    async fn run(mut self) {
        log_debug!("Pipeline {} driver started", self.id);

        loop {
            let deadline = self.limiter.next_deadline();

            let step = tokio::select! {
                biased;

                _ = self.cancel.cancelled() => break,

                Some(outcome) = self.outcomes.recv() => self.supervisor.handle_outcome(outcome),

                term = self.terms.recv() => match term {
                    Some(term) => {
                        self.limiter.offer(term, Instant::now());
                        SupervisorStep::Continue
                    }
                    None => break,
                },

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    match self.limiter.poll_due(Instant::now()) {
                        Some(term) => self.supervisor.dispatch(term),
                        None => SupervisorStep::Continue,
                    }
                }
            };

            if step == SupervisorStep::Halt {
                self.limiter.clear();
                self.publish(PipelineState::Terminated);
                log_info!("Pipeline {} halted after an unrecoverable failure", self.id);
                break;
            }

            self.publish(self.current_state());
        }

        self.limiter.clear();
        self.supervisor.shutdown();
        log_debug!("Pipeline {} driver stopped", self.id);
    }

    /// A deliverable lookup outranks a term still settling
    fn current_state(&self) -> PipelineState {
        if self.supervisor.is_in_flight() {
            PipelineState::InFlight
        } else if self.limiter.has_pending() {
            PipelineState::AwaitingSettle
        } else {
            PipelineState::Idle
        }
    }

    fn publish(&self, next: PipelineState) {
        self.state.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
    }
}
