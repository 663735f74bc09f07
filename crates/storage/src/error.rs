// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage errors

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in storage operations
///
/// Every variant is fatal to the owning process; recovery happens on restart.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed commit offset in {path}: {content:?}")]
    MalformedCommitOffset { path: PathBuf, content: String },
    #[error("commit offset {committed} is past the end of the log ({len} bytes)")]
    CommitBeyondEnd { committed: u64, len: u64 },
    #[error("{path} is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },
    #[error("log refuses appends after an earlier append failed")]
    Poisoned,
}

impl StorageError {
    /// True when the error is a missing file
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Attach the offending path to an `io::Error`
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &Path) -> Result<T, StorageError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T, StorageError> {
        self.map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
