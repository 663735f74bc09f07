// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-shot broadcast wait queue
//!
//! A `WaitQueue` belongs to one watchable resource. Readers call [`WaitQueue::wait`]
//! and await the returned [`Waiter`]; the resource owner calls
//! [`WaitQueue::signal`] after every committed mutation. A signal wakes exactly
//! the waiters registered before it and leaves the queue empty.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Pending continuations for one resource
#[derive(Debug, Default)]
pub struct WaitQueue {
    pending: Vec<oneshot::Sender<()>>,
}

impl WaitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a waiter that resolves on the next [`signal`](Self::signal)
    pub fn wait(&mut self) -> Waiter {
        // Waiters dropped before a signal (timeouts, disconnects) leave a closed sender behind
        self.pending.retain(|tx| !tx.is_closed());

        let (tx, rx) = oneshot::channel();
        self.pending.push(tx);
        Waiter { rx }
    }

    /// Wake every waiter registered so far
    ///
    /// Returns how many waiters were still listening.
    pub fn signal(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        pending
            .into_iter()
            .filter_map(|tx| tx.send(()).ok())
            .count()
    }

    /// Number of registered waiters that have not been dropped
    pub fn pending(&self) -> usize {
        self.pending.iter().filter(|tx| !tx.is_closed()).count()
    }
}

/// Future returned by [`WaitQueue::wait`]
///
/// Resolves when the queue is signalled, or when the queue itself is dropped.
/// Dropping a `Waiter` cancels it without affecting other waiters.
#[derive(Debug)]
#[must_use = "a waiter does nothing unless awaited"]
pub struct Waiter {
    rx: oneshot::Receiver<()>,
}

impl Future for Waiter {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        // A closed channel means the owning resource went away; the caller re-reads either way
        Pin::new(&mut self.rx).poll(cx).map(|_| ())
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
