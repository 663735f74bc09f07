// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! huddle-storage: durable storage for the huddle chat state engine
//!
//! - `AtomicFileStore` - crash-safe replace of single-value files
//! - `DurableLog` - append-only transcript guarded by a commit offset
//! - `VolatileLog` - in-memory transcript with the same interface
//! - `DurableScalar` - one durable string value (the topic)

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod atomic;
mod error;
mod log;
mod scalar;

pub use atomic::{AtomicFileStore, SCRATCH_DIR};
pub use error::StorageError;
pub use log::{DurableLog, Transcript, TranscriptLog, VolatileLog, COMMIT_FILE, LOG_FILE};
pub use scalar::{DurableScalar, TOPIC_FILE};
