// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only transcript log
//!
//! ## Durability
//!
//! The log file (`chats`) is paired with a commit record (`.chatsize`) holding
//! the number of bytes known to be durable. An append:
//!
//! 1. writes `line\n` to the end of the log and syncs it
//! 2. atomically replaces the commit record with the new length
//!
//! Step 2 is the commit point. On open, anything past the recorded length is
//! the tail of an append that never committed and is truncated away.

use crate::atomic::AtomicFileStore;
use crate::error::{IoResultExt, StorageError};
use huddle_core::{WaitQueue, Waiter};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Log file name, relative to the store root
pub const LOG_FILE: &str = "chats";
/// Commit record name, relative to the store root
pub const COMMIT_FILE: &str = ".chatsize";

/// Capabilities shared by the disk-backed and in-memory transcripts
pub trait TranscriptLog {
    /// Append one entry
    ///
    /// Newlines in `line` are dropped, so one call is always one entry.
    fn append(&mut self, line: &str) -> Result<(), StorageError>;

    /// Every committed entry, newline-terminated
    fn snapshot(&self) -> &str;

    /// Resolves after the next successful append
    fn on_next(&mut self) -> Waiter;
}

/// Disk-backed transcript with commit-offset recovery
#[derive(Debug)]
pub struct DurableLog {
    store: AtomicFileStore,
    path: PathBuf,
    commit_name: PathBuf,
    file: File,
    committed: u64,
    cache: String,
    waiters: WaitQueue,
    poisoned: bool,
}

impl DurableLog {
    /// Open the log at its default location in `store`
    pub fn open(store: AtomicFileStore) -> Result<Self, StorageError> {
        Self::open_at(store, LOG_FILE, COMMIT_FILE)
    }

    /// Open (recovering) a log with explicit file names
    ///
    /// A missing commit record means nothing was ever committed.
    pub fn open_at(
        store: AtomicFileStore,
        log_name: impl AsRef<Path>,
        commit_name: impl AsRef<Path>,
    ) -> Result<Self, StorageError> {
        let path = store.path(log_name);
        let commit_name = commit_name.as_ref().to_path_buf();
        let committed = read_commit_offset(&store, &commit_name)?;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .at(&path)?;

        let len = file.metadata().at(&path)?.len();
        if committed > len {
            return Err(StorageError::CommitBeyondEnd { committed, len });
        }
        if committed < len {
            tracing::warn!(
                path = %path.display(),
                discarded = len - committed,
                "truncating uncommitted log tail"
            );
            file.set_len(committed).at(&path)?;
            file.sync_all().at(&path)?;
        }

        let mut bytes = Vec::with_capacity(committed as usize);
        file.seek(SeekFrom::Start(0)).at(&path)?;
        file.read_to_end(&mut bytes).at(&path)?;
        let cache = String::from_utf8(bytes).map_err(|_| StorageError::InvalidUtf8 {
            path: path.clone(),
        })?;

        tracing::info!(path = %path.display(), committed, "transcript recovered");

        Ok(Self {
            store,
            path,
            commit_name,
            file,
            committed,
            cache,
            waiters: WaitQueue::new(),
            poisoned: false,
        })
    }

    /// Bytes known to be durable
    pub fn committed(&self) -> u64 {
        self.committed
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write, sync, then publish the new length
    fn commit(&mut self, record: &str) -> Result<(), StorageError> {
        self.file.write_all(record.as_bytes()).at(&self.path)?;
        self.file.sync_data().at(&self.path)?;

        let len = self.committed + record.len() as u64;
        self.store
            .write(&self.commit_name, len.to_string().as_bytes())?;
        self.committed = len;
        Ok(())
    }
}

impl TranscriptLog for DurableLog {
    fn append(&mut self, line: &str) -> Result<(), StorageError> {
        if self.poisoned {
            return Err(StorageError::Poisoned);
        }

        let record = entry(line);
        if let Err(e) = self.commit(&record) {
            // The file may now hold bytes past `committed`; only a restart can discard them
            self.poisoned = true;
            tracing::error!(path = %self.path.display(), error = %e, "transcript append failed");
            return Err(e);
        }

        self.cache.push_str(&record);
        tracing::debug!(committed = self.committed, "transcript append");
        self.waiters.signal();
        Ok(())
    }

    fn snapshot(&self) -> &str {
        &self.cache
    }

    fn on_next(&mut self) -> Waiter {
        self.waiters.wait()
    }
}

/// `line` as a newline-terminated record with embedded newlines removed
fn entry(line: &str) -> String {
    let mut record: String = line.chars().filter(|&c| c != '\n').collect();
    record.push('\n');
    record
}

fn read_commit_offset(store: &AtomicFileStore, name: &Path) -> Result<u64, StorageError> {
    let Some(bytes) = store.read_optional(name)? else {
        return Ok(0);
    };
    let content = String::from_utf8_lossy(&bytes).into_owned();

    content
        .trim()
        .parse()
        .map_err(|_| StorageError::MalformedCommitOffset {
            path: store.path(name),
            content,
        })
}

/// In-memory transcript, lost on restart
#[derive(Debug, Default)]
pub struct VolatileLog {
    cache: String,
    waiters: WaitQueue,
}

impl VolatileLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TranscriptLog for VolatileLog {
    fn append(&mut self, line: &str) -> Result<(), StorageError> {
        self.cache.push_str(&entry(line));
        self.waiters.signal();
        Ok(())
    }

    fn snapshot(&self) -> &str {
        &self.cache
    }

    fn on_next(&mut self) -> Waiter {
        self.waiters.wait()
    }
}

/// Transcript variant chosen at startup
#[derive(Debug)]
pub enum Transcript {
    Durable(DurableLog),
    Volatile(VolatileLog),
}

impl TranscriptLog for Transcript {
    fn append(&mut self, line: &str) -> Result<(), StorageError> {
        match self {
            Transcript::Durable(log) => log.append(line),
            Transcript::Volatile(log) => log.append(line),
        }
    }

    fn snapshot(&self) -> &str {
        match self {
            Transcript::Durable(log) => log.snapshot(),
            Transcript::Volatile(log) => log.snapshot(),
        }
    }

    fn on_next(&mut self) -> Waiter {
        match self {
            Transcript::Durable(log) => log.on_next(),
            Transcript::Volatile(log) => log.on_next(),
        }
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
