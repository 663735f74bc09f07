// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single durable string value (the channel topic)

use crate::atomic::AtomicFileStore;
use crate::error::StorageError;
use huddle_core::{WaitQueue, Waiter};
use std::path::{Path, PathBuf};

/// Topic file name, relative to the store root
pub const TOPIC_FILE: &str = "topic";

/// String value stored through an [`AtomicFileStore`]
#[derive(Debug)]
pub struct DurableScalar {
    store: AtomicFileStore,
    name: PathBuf,
    value: String,
    waiters: WaitQueue,
}

impl DurableScalar {
    /// Load the value stored under `name`
    ///
    /// A missing file yields `default` when given, and is an error otherwise.
    pub fn open(
        store: AtomicFileStore,
        name: impl AsRef<Path>,
        default: Option<&str>,
    ) -> Result<Self, StorageError> {
        let name = name.as_ref().to_path_buf();
        let value = match (store.read_string(&name), default) {
            (Ok(value), _) => value,
            (Err(e), Some(default)) if e.is_not_found() => {
                tracing::warn!(name = %name.display(), "no stored value, using default");
                default.to_string()
            }
            (Err(e), _) => return Err(e),
        };

        Ok(Self {
            store,
            name,
            value,
            waiters: WaitQueue::new(),
        })
    }

    pub fn get(&self) -> &str {
        &self.value
    }

    /// Durably replace the value, then wake watchers
    pub fn set(&mut self, value: &str) -> Result<(), StorageError> {
        self.store.write(&self.name, value.as_bytes())?;
        self.value = value.to_string();
        self.waiters.signal();
        Ok(())
    }

    /// Resolves after the next successful [`set`](Self::set)
    pub fn on_change(&mut self) -> Waiter {
        self.waiters.wait()
    }
}

#[cfg(test)]
#[path = "scalar_tests.rs"]
mod tests;
