// SPDX-License-Identifier: MPL-2.0
//! Cancellable delayed execution.
//!
//! A [`Debouncer`] runs a job once a quiet period has elapsed since the most
//! recent [`Debouncer::schedule`] call. Scheduling again first cancels the
//! pending job, so a burst of calls collapses into the last one.
//!
//! Jobs run on the Tokio runtime the debouncer is used from; scheduling
//! outside a runtime panics, like `tokio::spawn`.

use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `job` after the quiet period, replacing any job still waiting.
    ///
    /// The job itself is synchronous: once it starts it is no longer
    /// cancellable. Work it spawns is detached from the debouncer.
    pub fn schedule<F>(&mut self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job();
        }));
    }

    /// Cancels the waiting job. Returns true if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
