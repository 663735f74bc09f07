// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared handle to the state, with async long-polling

use crate::state::{AppState, Resource, StateError};
use huddle_core::SessionIdentity;
use huddle_storage::{Transcript, TranscriptLog};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Cloneable handle given to every session
///
/// All mutations run under one lock, so the state has a single writer at a
/// time. The lock is never held across an await.
pub struct SharedState<L = Transcript> {
    inner: Arc<Mutex<AppState<L>>>,
    long_poll_timeout: Option<Duration>,
}

impl<L: TranscriptLog> SharedState<L> {
    pub fn new(state: AppState<L>, long_poll_timeout: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
            long_poll_timeout,
        }
    }

    fn lock(&self) -> MutexGuard<'_, AppState<L>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` with exclusive access to the state
    pub fn with<R>(&self, f: impl FnOnce(&mut AppState<L>) -> R) -> R {
        f(&mut *self.lock())
    }

    pub fn snapshot(&self, resource: Resource) -> String {
        self.lock().snapshot(resource).into_owned()
    }

    /// Wait for the next change to `resource`, then return its new contents
    ///
    /// Returns `None` if the configured long-poll timeout elapses first.
    pub async fn await_next(&self, resource: Resource) -> Option<String> {
        let waiter = self.lock().watch(resource);

        match self.long_poll_timeout {
            Some(limit) => {
                if tokio::time::timeout(limit, waiter).await.is_err() {
                    tracing::debug!(%resource, "long-poll timed out");
                    return None;
                }
            }
            None => waiter.await,
        }

        Some(self.snapshot(resource))
    }

    pub fn append(&self, line: &str) -> Result<(), StateError> {
        self.lock().append(line)
    }

    pub fn post(&self, handle: &str, text: &str) -> Result<(), StateError> {
        self.lock().post(handle, text)
    }

    pub fn set_topic(&self, by: &str, value: &str) -> Result<(), StateError> {
        self.lock().set_topic(by, value)
    }

    pub fn join(
        &self,
        preferred: &str,
        identity: Option<&SessionIdentity>,
    ) -> Result<String, StateError> {
        self.lock().join(preferred, identity)
    }

    pub fn leave(&self, handle: &str) -> Result<(), StateError> {
        self.lock().leave(handle)
    }
}

impl<L> Clone for SharedState<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            long_poll_timeout: self.long_poll_timeout,
        }
    }
}

#[cfg(test)]
#[path = "shared_tests.rs"]
mod tests;
