//! Option negotiation policy and observability hook.

use std::fmt;
use std::sync::Arc;

use super::option::{TelnetOption, Verb};

type NegotiateFn = dyn Fn(&[TelnetOption]) -> Vec<TelnetOption> + Send + Sync;
type ObserveFn = dyn Fn(&NegotiationEvent) + Send + Sync;

/// Maps a batch of received options to the options sent back.
///
/// Called synchronously from the read loop. The returned options are written
/// to the transport, in order, before decoding resumes. Implementations must
/// be pure: no I/O, no shared state the read loop depends on.
#[derive(Clone)]
pub struct Negotiator {
    inner: Arc<NegotiateFn>,
}

impl Negotiator {
    /// Wrap a negotiation function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[TelnetOption]) -> Vec<TelnetOption> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Leave every offer unanswered. This is the default.
    pub fn ignore() -> Self {
        Self::new(|_| Vec::new())
    }

    /// Answer every DO with WONT and every WILL with DONT.
    ///
    /// Turns off anything the remote wants, including terminal size
    /// negotiation and remote echo.
    pub fn refuse_all() -> Self {
        Self::new(|batch| {
            batch
                .iter()
                .filter_map(|option| match option.verb() {
                    Verb::Do => Some(TelnetOption::new(Verb::Wont, option.code())),
                    Verb::Will => Some(TelnetOption::new(Verb::Dont, option.code())),
                    _ => None,
                })
                .collect()
        })
    }

    /// Compute the response to a batch.
    pub fn respond(&self, batch: &[TelnetOption]) -> Vec<TelnetOption> {
        (self.inner)(batch)
    }
}

impl Default for Negotiator {
    fn default() -> Self {
        Self::ignore()
    }
}

impl fmt::Debug for Negotiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Negotiator(<fn>)")
    }
}

/// One negotiation exchange: what was received and what was sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationEvent {
    pub batch: Vec<TelnetOption>,
    pub response: Vec<TelnetOption>,
}

/// Optional hook receiving every [`NegotiationEvent`].
#[derive(Clone)]
pub struct NegotiationObserver {
    inner: Arc<ObserveFn>,
}

impl NegotiationObserver {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&NegotiationEvent) + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    pub fn notify(&self, event: &NegotiationEvent) {
        (self.inner)(event)
    }
}

impl fmt::Debug for NegotiationObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NegotiationObserver(<fn>)")
    }
}
