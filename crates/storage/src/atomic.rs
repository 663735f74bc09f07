// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic-replace file store
//!
//! Values are written to a scratch file, synced, and renamed over the target,
//! so a reader (or a restart after a crash) sees either the old content or the
//! new content and never a mix of both.

use crate::error::{IoResultExt, StorageError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Scratch directory, relative to the store root
pub const SCRATCH_DIR: &str = "tmp";

/// Crash-safe single-value files under one root directory
///
/// The scratch directory must live on the same filesystem as the targets.
#[derive(Debug, Clone)]
pub struct AtomicFileStore {
    root: PathBuf,
    scratch: PathBuf,
}

impl AtomicFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let scratch = root.join(SCRATCH_DIR);
        Self { root, scratch }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch
    }

    /// Resolve a name relative to the store root
    pub fn path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }

    /// Replace the contents of `name` atomically and durably
    pub fn write(&self, name: impl AsRef<Path>, content: &[u8]) -> Result<(), StorageError> {
        let target = self.path(name);

        // NamedTempFile removes itself on drop, so every early return cleans up
        let mut tmp = tempfile::Builder::new()
            .prefix("tmp.")
            .tempfile_in(&self.scratch)
            .at(&self.scratch)?;
        tmp.write_all(content).at(tmp.path())?;
        tmp.as_file().sync_data().at(tmp.path())?;
        self.sync_dirs(&self.scratch)?;

        tmp.persist(&target).map_err(|e| StorageError::Io {
            path: target.clone(),
            source: e.error,
        })?;

        if let Some(parent) = target.parent() {
            self.sync_dirs(parent)?;
        }
        tracing::trace!(path = %target.display(), bytes = content.len(), "atomic write");
        Ok(())
    }

    /// Read the full contents of `name`
    pub fn read(&self, name: impl AsRef<Path>) -> Result<Vec<u8>, StorageError> {
        let path = self.path(name);
        fs::read(&path).at(&path)
    }

    /// Like `read`, but a missing file is `Ok(None)`
    pub fn read_optional(
        &self,
        name: impl AsRef<Path>,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        match self.read(name) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Read `name` as UTF-8 text
    pub fn read_string(&self, name: impl AsRef<Path>) -> Result<String, StorageError> {
        let path = self.path(name);
        let bytes = fs::read(&path).at(&path)?;
        String::from_utf8(bytes).map_err(|_| StorageError::InvalidUtf8 { path })
    }

    /// Remove leftovers of interrupted writes
    ///
    /// Only plain files are removed. Returns how many were found.
    pub fn clear_scratch(&self) -> Result<usize, StorageError> {
        fs::create_dir_all(&self.scratch).at(&self.scratch)?;

        let mut removed = 0;
        for entry in fs::read_dir(&self.scratch).at(&self.scratch)? {
            let entry = entry.at(&self.scratch)?;
            let path = entry.path();
            if entry.file_type().at(&path)?.is_dir() {
                continue;
            }
            fs::remove_file(&path).at(&path)?;
            removed += 1;
        }

        if removed > 0 {
            tracing::warn!(removed, dir = %self.scratch.display(), "removed interrupted writes");
        }
        Ok(removed)
    }

    /// Sync `dir` and each parent up to and including the store root
    fn sync_dirs(&self, dir: &Path) -> Result<(), StorageError> {
        let mut current = Some(dir);
        while let Some(dir) = current {
            if !dir.starts_with(&self.root) {
                break;
            }
            File::open(dir).and_then(|f| f.sync_all()).at(dir)?;
            if dir == self.root {
                break;
            }
            current = dir.parent();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
