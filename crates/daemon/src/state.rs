// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Aggregate state each chat session reads and mutates

use crate::asset::StaticAsset;
use huddle_core::{PresenceError, PresenceRegistry, SessionIdentity, Waiter};
use huddle_storage::{DurableScalar, StorageError, Transcript, TranscriptLog};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Errors from state mutations; all of them are fatal to the process
#[derive(Debug, Error)]
pub enum StateError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("presence error: {0}")]
    Presence(#[from] PresenceError),
}

/// Watchable resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// The chat transcript
    Log,
    Topic,
    /// Connected handles
    Presence,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Log => "chats",
            Resource::Topic => "topic",
            Resource::Presence => "users",
        };
        f.write_str(name)
    }
}

/// Transcript, topic, presence and static page of one chat
#[derive(Debug)]
pub struct AppState<L = Transcript> {
    log: L,
    topic: DurableScalar,
    presence: PresenceRegistry,
    asset: StaticAsset,
    announcements: bool,
}

impl<L: TranscriptLog> AppState<L> {
    pub fn new(
        log: L,
        topic: DurableScalar,
        presence: PresenceRegistry,
        asset: StaticAsset,
        announcements: bool,
    ) -> Self {
        Self {
            log,
            topic,
            presence,
            asset,
            announcements,
        }
    }

    /// Current contents of `resource`; never blocks
    pub fn snapshot(&self, resource: Resource) -> Cow<'_, str> {
        match resource {
            Resource::Log => Cow::Borrowed(self.log.snapshot()),
            Resource::Topic => Cow::Borrowed(self.topic.get()),
            Resource::Presence => Cow::Owned(self.presence.list()),
        }
    }

    /// Register for the next change to `resource`
    ///
    /// Read the snapshot first; if it is not new enough, await the waiter and
    /// read again.
    pub fn watch(&mut self, resource: Resource) -> Waiter {
        match resource {
            Resource::Log => self.log.on_next(),
            Resource::Topic => self.topic.on_change(),
            Resource::Presence => self.presence.on_change(),
        }
    }

    /// Append one transcript entry; newlines anywhere in `line` are dropped
    pub fn append(&mut self, line: &str) -> Result<(), StateError> {
        self.log.append(line)?;
        Ok(())
    }

    /// Append `handle: text` as a single entry
    pub fn post(&mut self, handle: &str, text: &str) -> Result<(), StateError> {
        self.append(&format!("{}: {}", handle, text))
    }

    /// Replace the topic and record the change in the transcript
    pub fn set_topic(&mut self, by: &str, value: &str) -> Result<(), StateError> {
        self.topic.set(value)?;
        tracing::info!(%by, "topic changed");
        self.append(&format!("{} set the topic to: {}", by, value))
    }

    /// Register a session; returns its assigned handle
    ///
    /// If the join announcement cannot be written the handle is released again.
    pub fn join(
        &mut self,
        preferred: &str,
        identity: Option<&SessionIdentity>,
    ) -> Result<String, StateError> {
        let handle = self.presence.register(preferred)?;
        if self.announcements {
            let line = match identity {
                Some(identity) => format!("{} ({}) has joined", handle, identity),
                None => format!("{} has joined", handle),
            };
            if let Err(e) = self.append(&line) {
                self.presence.deregister(&handle);
                return Err(e);
            }
        }
        Ok(handle)
    }

    /// End a session; unknown handles are ignored
    pub fn leave(&mut self, handle: &str) -> Result<(), StateError> {
        if self.presence.deregister(handle) && self.announcements {
            self.append(&format!("{} has left", handle))?;
        }
        Ok(())
    }

    pub fn announce_restart(&mut self) -> Result<(), StateError> {
        if self.announcements {
            self.append("restarted")?;
        }
        Ok(())
    }

    pub fn asset(&self) -> &StaticAsset {
        &self.asset
    }

    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
