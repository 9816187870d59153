use tokio::sync::{mpsc, watch};

use crate::log_debug;
use crate::modules::search::domain::{NormalizedTerm, TermNormalizer};

/// Entry point for raw keystroke values.
///
/// Keeps the most recent raw value for display and forwards normalized,
/// non-empty terms to the attached pipeline. Detached sources drop input.
pub struct InputSource {
    normalizer: TermNormalizer,
    display: watch::Sender<String>,
    terms: Option<mpsc::UnboundedSender<NormalizedTerm>>,
}

impl InputSource {
    pub fn new() -> Self {
        let (display, _) = watch::channel(String::new());
        Self {
            normalizer: TermNormalizer::new(),
            display,
            terms: None,
        }
    }

    pub fn attach(&mut self, terms: mpsc::UnboundedSender<NormalizedTerm>) {
        self.terms = Some(terms);
    }

    pub fn detach(&mut self) {
        self.terms = None;
    }

    /// Returns true when a term was forwarded downstream
    pub fn push(&self, value: String) -> bool {
        let Some(terms) = &self.terms else {
            log_debug!("Ignoring input while inactive");
            return false;
        };

        let term = self.normalizer.normalize(&value);
        self.display.send_replace(value);

        let Some(term) = term else {
            return false;
        };

        if terms.send(term).is_err() {
            log_debug!("Pipeline stopped listening, input dropped");
            return false;
        }
        true
    }

    /// Most recent raw value
    pub fn current_value(&self) -> String {
        self.display.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display.subscribe()
    }
}

impl Default for InputSource {
    fn default() -> Self {
        Self::new()
    }
}
