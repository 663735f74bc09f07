// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use std::fs;
use std::time::Duration;

fn store() -> (tempfile::TempDir, AtomicFileStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = AtomicFileStore::new(dir.path());
    fs::create_dir_all(store.scratch_dir()).unwrap();
    (dir, store)
}

/// Bytes hit the log file but the process died before the commit record moved
fn crash_after_data_sync(store: &AtomicFileStore, tail: &str) {
    let mut file = OpenOptions::new()
        .append(true)
        .open(store.path(LOG_FILE))
        .unwrap();
    file.write_all(tail.as_bytes()).unwrap();
    file.sync_all().unwrap();
}

#[test]
fn first_open_starts_empty() {
    let (_dir, store) = store();

    let log = DurableLog::open(store.clone()).unwrap();
    assert_eq!(log.snapshot(), "");
    assert_eq!(log.committed(), 0);
    assert!(store.path(LOG_FILE).exists());
}

#[test]
fn append_updates_snapshot_and_commit_record() {
    let (_dir, store) = store();
    let mut log = DurableLog::open(store.clone()).unwrap();

    log.append("alice: hi").unwrap();

    assert_eq!(log.snapshot(), "alice: hi\n");
    assert_eq!(log.committed(), 10);
    assert_eq!(store.read_string(COMMIT_FILE).unwrap(), "10");
    assert_eq!(fs::read_to_string(log.path()).unwrap(), "alice: hi\n");
}

#[test]
fn reopen_restores_committed_entries() {
    let (_dir, store) = store();
    {
        let mut log = DurableLog::open(store.clone()).unwrap();
        log.append("alice: hi").unwrap();
        log.append("bob: hey").unwrap();
    }

    let log = DurableLog::open(store).unwrap();
    assert_eq!(log.snapshot(), "alice: hi\nbob: hey\n");
    assert_eq!(log.committed(), 19);
}

#[test]
fn uncommitted_tail_is_truncated() {
    let (_dir, store) = store();
    {
        let mut log = DurableLog::open(store.clone()).unwrap();
        log.append("alice: hi").unwrap();
    }
    crash_after_data_sync(&store, "bob: lost\n");

    let log = DurableLog::open(store.clone()).unwrap();
    assert_eq!(log.snapshot(), "alice: hi\n");
    assert_eq!(fs::read_to_string(store.path(LOG_FILE)).unwrap(), "alice: hi\n");
}

#[test]
fn appends_after_recovery_follow_committed_bytes() {
    let (_dir, store) = store();
    {
        let mut log = DurableLog::open(store.clone()).unwrap();
        log.append("one").unwrap();
    }
    crash_after_data_sync(&store, "partial");

    let mut log = DurableLog::open(store.clone()).unwrap();
    log.append("two").unwrap();
    drop(log);

    let log = DurableLog::open(store).unwrap();
    assert_eq!(log.snapshot(), "one\ntwo\n");
}

#[test]
fn recovery_is_idempotent() {
    let (_dir, store) = store();
    {
        let mut log = DurableLog::open(store.clone()).unwrap();
        log.append("one").unwrap();
    }
    crash_after_data_sync(&store, "junk");

    let first = DurableLog::open(store.clone()).unwrap();
    let first_snapshot = first.snapshot().to_string();
    let first_committed = first.committed();
    drop(first);
    let file_after_first = fs::read(store.path(LOG_FILE)).unwrap();

    let second = DurableLog::open(store.clone()).unwrap();
    assert_eq!(second.snapshot(), first_snapshot);
    assert_eq!(second.committed(), first_committed);
    assert_eq!(fs::read(store.path(LOG_FILE)).unwrap(), file_after_first);
}

#[test]
fn malformed_commit_record_is_fatal() {
    let (_dir, store) = store();
    store.write(COMMIT_FILE, b"ten").unwrap();

    let err = DurableLog::open(store).unwrap_err();
    assert!(matches!(err, StorageError::MalformedCommitOffset { ref content, .. } if content == "ten"));
}

#[test]
fn commit_past_end_is_fatal() {
    let (_dir, store) = store();
    fs::write(store.path(LOG_FILE), b"abc\n").unwrap();
    store.write(COMMIT_FILE, b"99").unwrap();

    let err = DurableLog::open(store).unwrap_err();
    assert!(matches!(
        err,
        StorageError::CommitBeyondEnd {
            committed: 99,
            len: 4
        }
    ));
}

#[test]
fn failed_commit_poisons_log() {
    let (_dir, store) = store();
    let mut log = DurableLog::open(store.clone()).unwrap();
    fs::remove_dir(store.scratch_dir()).unwrap();

    assert!(log.append("lost").is_err());
    assert_eq!(log.snapshot(), "");

    fs::create_dir(store.scratch_dir()).unwrap();
    assert!(matches!(log.append("next"), Err(StorageError::Poisoned)));
    drop(log);

    let log = DurableLog::open(store).unwrap();
    assert_eq!(log.snapshot(), "");
}

#[test]
fn embedded_newlines_stay_in_one_entry() {
    let (_dir, store) = store();
    let mut durable = DurableLog::open(store.clone()).unwrap();
    let mut volatile = VolatileLog::new();

    durable.append("mallory: hi\nbob: I quit").unwrap();
    volatile.append("mallory: hi\nbob: I quit").unwrap();

    assert_eq!(durable.snapshot(), "mallory: hibob: I quit\n");
    assert_eq!(volatile.snapshot(), durable.snapshot());
    assert_eq!(durable.committed(), 23);

    drop(durable);
    let reopened = DurableLog::open(store).unwrap();
    assert_eq!(reopened.snapshot().lines().count(), 1);
}

#[tokio::test]
async fn append_wakes_waiters() {
    let (_dir, store) = store();
    let mut log = DurableLog::open(store).unwrap();

    let waiter = log.on_next();
    log.append("hello").unwrap();
    tokio::time::timeout(Duration::from_millis(20), waiter)
        .await
        .unwrap();
}

#[tokio::test]
async fn volatile_log_appends_and_signals() {
    let mut log = VolatileLog::new();

    let waiter = log.on_next();
    log.append("alice: hi").unwrap();
    tokio::time::timeout(Duration::from_millis(20), waiter)
        .await
        .unwrap();
    assert_eq!(log.snapshot(), "alice: hi\n");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn crash_recovery_keeps_exactly_committed_appends(
        lines in proptest::collection::vec("[a-z :]{0,12}", 0..8),
        tail in "[a-z]{0,16}",
    ) {
        let (_dir, store) = store();
        let mut expected = String::new();
        {
            let mut log = DurableLog::open(store.clone()).unwrap();
            for line in &lines {
                log.append(line).unwrap();
                expected.push_str(line);
                expected.push('\n');
            }
        }
        crash_after_data_sync(&store, &tail);

        let log = DurableLog::open(store).unwrap();
        prop_assert_eq!(log.snapshot(), expected.as_str());
        prop_assert_eq!(log.committed(), expected.len() as u64);
    }
}
