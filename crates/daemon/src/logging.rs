// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup for the embedding process

use crate::config::Config;
use crate::lifecycle::LifecycleError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber
///
/// Logs go to `config.log_file` when set, otherwise to stderr. `RUST_LOG`
/// overrides the default `info` filter. Keep the returned guard alive for as
/// long as logs should be flushed.
pub fn setup(config: &Config) -> Result<WorkerGuard, LifecycleError> {
    let (writer, guard) = match &config.log_file {
        Some(path) => {
            let dir = path.parent().ok_or_else(|| missing_file_name(path))?;
            let file = path.file_name().ok_or_else(|| missing_file_name(path))?;
            std::fs::create_dir_all(dir)?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file))
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer))
        .try_init()?;

    Ok(guard)
}

fn missing_file_name(path: &std::path::Path) -> LifecycleError {
    LifecycleError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        format!("log file path has no file name: {}", path.display()),
    ))
}
