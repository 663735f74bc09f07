// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! huddle-core: in-memory primitives for the huddle chat state engine
//!
//! This crate provides:
//! - `WaitQueue` - single-shot broadcast wait/notify used for long-polling
//! - `PresenceRegistry` - handles of connected sessions, with a uniqueness policy
//! - `SessionIdentity` - participant details rendered into announcements

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod identity;
pub mod presence;
pub mod wait;

pub use identity::SessionIdentity;
pub use presence::{
    sanitize_handle, PresenceError, PresenceRegistry, UniquenessPolicy, DEFAULT_HANDLE,
    DEFAULT_MAX_SUFFIX,
};
pub use wait::{WaitQueue, Waiter};
