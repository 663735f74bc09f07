// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Presence registry: handles of currently connected sessions

use crate::wait::{WaitQueue, Waiter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Handle used when the preferred name sanitizes to nothing
pub const DEFAULT_HANDLE: &str = "anon";

/// Suffixes tried are `1..DEFAULT_MAX_SUFFIX`
pub const DEFAULT_MAX_SUFFIX: u32 = 8192;

/// Characters that would corrupt a transcript line (`handle: message\n`)
const RESERVED: &[char] = &['\n', '\r', ' ', ':'];

#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("couldn't find a free handle for {base:?} after {attempts} attempts")]
    Exhausted { base: String, attempts: u32 },
}

/// Whether two sessions may share a handle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UniquenessPolicy {
    /// Colliding handles get a numeric suffix
    #[default]
    Unique,
    /// Handles are used as given, duplicates allowed
    AllowDuplicates,
}

/// Strip characters that would break transcript rendering
pub fn sanitize_handle(preferred: &str) -> String {
    let base: String = preferred.chars().filter(|c| !RESERVED.contains(c)).collect();
    if base.is_empty() {
        DEFAULT_HANDLE.to_string()
    } else {
        base
    }
}

/// In-memory set of connected handles
#[derive(Debug)]
pub struct PresenceRegistry {
    policy: UniquenessPolicy,
    max_suffix: u32,
    members: BTreeMap<String, usize>,
    waiters: WaitQueue,
}

impl PresenceRegistry {
    pub fn new(policy: UniquenessPolicy) -> Self {
        Self::with_max_suffix(policy, DEFAULT_MAX_SUFFIX)
    }

    pub fn with_max_suffix(policy: UniquenessPolicy, max_suffix: u32) -> Self {
        Self {
            policy,
            max_suffix,
            members: BTreeMap::new(),
            waiters: WaitQueue::new(),
        }
    }

    pub fn policy(&self) -> UniquenessPolicy {
        self.policy
    }

    /// Register a session under (a variant of) its preferred name
    ///
    /// Returns the handle actually assigned.
    pub fn register(&mut self, preferred: &str) -> Result<String, PresenceError> {
        let base = sanitize_handle(preferred);
        let handle = match self.policy {
            UniquenessPolicy::AllowDuplicates => base,
            UniquenessPolicy::Unique => self.free_variant(base)?,
        };

        *self.members.entry(handle.clone()).or_insert(0) += 1;
        tracing::debug!(%handle, "presence registered");
        self.waiters.signal();
        Ok(handle)
    }

    fn free_variant(&self, base: String) -> Result<String, PresenceError> {
        if !self.members.contains_key(&base) {
            return Ok(base);
        }

        for i in 1..self.max_suffix {
            let candidate = format!("{}{}", base, i);
            if !self.members.contains_key(&candidate) {
                return Ok(candidate);
            }
        }

        tracing::error!(%base, max_suffix = self.max_suffix, "handle space exhausted");
        Err(PresenceError::Exhausted {
            base,
            attempts: self.max_suffix.saturating_sub(1),
        })
    }

    /// Remove one registration of `handle`
    ///
    /// Unknown handles are ignored and return `false`.
    pub fn deregister(&mut self, handle: &str) -> bool {
        let Some(count) = self.members.get_mut(handle) else {
            return false;
        };

        *count -= 1;
        if *count == 0 {
            self.members.remove(handle);
        }
        tracing::debug!(%handle, "presence deregistered");
        self.waiters.signal();
        true
    }

    /// Members in sorted order, one per line
    pub fn list(&self) -> String {
        let mut out = String::new();
        for (handle, count) in &self.members {
            for _ in 0..*count {
                out.push_str(handle);
                out.push('\n');
            }
        }
        out
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.members.contains_key(handle)
    }

    /// Total registrations, counting duplicates
    pub fn len(&self) -> usize {
        self.members.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Resolves after the next register or deregister
    pub fn on_change(&mut self) -> Waiter {
        self.waiters.wait()
    }
}

#[cfg(test)]
#[path = "presence_tests.rs"]
mod tests;
