// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for state engine integration tests.

#![allow(dead_code)]

use huddle_daemon::Config;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

/// Fresh data directory with announcements off, so transcripts hold only what a test writes.
pub fn setup_test_env() -> (TempDir, Config) {
    let temp = tempfile::tempdir().unwrap();
    let config = Config {
        announcements: false,
        ..Config::for_data_dir(temp.path().join("var"))
    };
    (temp, config)
}

/// Simulate a crash after the log bytes were synced but before the commit record moved.
pub fn tear_log(config: &Config, tail: &str) {
    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(config.data_dir.join("chats"))
        .unwrap();
    file.write_all(tail.as_bytes()).unwrap();
    file.sync_all().unwrap();
}

/// Simulate a crash in the middle of an atomic write.
pub fn abandon_scratch_file(config: &Config, content: &[u8]) {
    fs::write(config.data_dir.join("tmp").join("tmp.crashed"), content).unwrap();
}

pub fn read(config: &Config, name: impl AsRef<Path>) -> String {
    fs::read_to_string(config.data_dir.join(name)).unwrap()
}
