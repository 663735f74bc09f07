// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State lifecycle: first-run initialization and startup recovery.

use std::path::{Path, PathBuf};

use huddle_core::PresenceRegistry;
use huddle_storage::{
    AtomicFileStore, DurableLog, DurableScalar, StorageError, Transcript, VolatileLog,
    COMMIT_FILE, LOG_FILE, TOPIC_FILE,
};
use thiserror::Error;
use tracing::info;

use crate::asset::StaticAsset;
use crate::config::{Config, ConfigError, Persistence};
use crate::shared::SharedState;
use crate::state::{AppState, StateError};

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("State at {0} is already initialized")]
    AlreadyInitialized(PathBuf),

    #[error("State at {0} is not initialized")]
    NotInitialized(PathBuf),

    #[error("Failed to load asset {0}: {1}")]
    Asset(PathBuf, #[source] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

/// True once `init` has completed for `config.data_dir`
///
/// The topic is written last during init, so its presence marks completion.
pub fn is_initialized(config: &Config) -> bool {
    config.data_dir.join(TOPIC_FILE).exists()
}

/// First-ever initialization of an empty data directory
pub fn init(config: &Config) -> Result<(), LifecycleError> {
    if is_initialized(config) {
        return Err(LifecycleError::AlreadyInitialized(config.data_dir.clone()));
    }

    let store = AtomicFileStore::new(&config.data_dir);
    std::fs::create_dir_all(store.scratch_dir())?;

    store.write(LOG_FILE, b"")?;
    store.write(COMMIT_FILE, b"0")?;
    store.write(TOPIC_FILE, config.default_topic.as_bytes())?;

    info!("Initialized state at {}", config.data_dir.display());
    Ok(())
}

/// Recover persisted state and build the handle sessions share
pub fn startup(config: &Config) -> Result<SharedState, LifecycleError> {
    if !is_initialized(config) {
        return Err(LifecycleError::NotInitialized(config.data_dir.clone()));
    }

    // 1. Discard interrupted atomic writes
    let store = AtomicFileStore::new(&config.data_dir);
    store.clear_scratch()?;

    // 2. Recover the transcript (truncates to the last commit)
    let log = match config.persistence {
        Persistence::Disk => Transcript::Durable(DurableLog::open(store.clone())?),
        Persistence::Memory => Transcript::Volatile(VolatileLog::new()),
    };

    // 3. Topic, presence, static page
    let topic = DurableScalar::open(store, TOPIC_FILE, None)?;
    let presence = PresenceRegistry::with_max_suffix(config.uniqueness, config.max_handle_suffix);
    let asset = match &config.asset {
        Some(path) => load_asset(path)?,
        None => StaticAsset::empty(),
    };

    let mut state = AppState::new(log, topic, presence, asset, config.announcements);
    state.announce_restart()?;

    info!(
        "Loaded state: {} transcript bytes, topic {:?}",
        state.snapshot(crate::state::Resource::Log).len(),
        state.snapshot(crate::state::Resource::Topic)
    );

    Ok(SharedState::new(state, config.long_poll_timeout))
}

/// `init` when needed, then `startup`
pub fn open_or_init(config: &Config) -> Result<SharedState, LifecycleError> {
    if !is_initialized(config) {
        init(config)?;
    }
    startup(config)
}

fn load_asset(path: &Path) -> Result<StaticAsset, LifecycleError> {
    StaticAsset::load(path).map_err(|e| LifecycleError::Asset(path.to_path_buf(), e))
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
