// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! huddle-daemon: the chat state engine as embedded by a session layer
//!
//! The session layer (request routing, transport, CLI) lives elsewhere. It
//! calls [`lifecycle::open_or_init`] once, installs logging with
//! [`logging::setup`], and hands clones of the returned [`SharedState`] to
//! each session.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod asset;
pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod shared;
pub mod state;

pub use asset::StaticAsset;
pub use config::{Config, ConfigError, Persistence, DEFAULT_TOPIC};
pub use lifecycle::{init, open_or_init, startup, LifecycleError};
pub use shared::SharedState;
pub use state::{AppState, Resource, StateError};

pub use huddle_core::{SessionIdentity, UniquenessPolicy};
