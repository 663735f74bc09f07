// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::asset::StaticAsset;
use huddle_core::{PresenceRegistry, UniquenessPolicy};
use huddle_storage::{AtomicFileStore, DurableScalar, VolatileLog, TOPIC_FILE};
use tokio::time::timeout;

const SHORT: Duration = Duration::from_millis(50);

fn shared(
    long_poll_timeout: Option<Duration>,
) -> (tempfile::TempDir, SharedState<VolatileLog>) {
    let dir = tempfile::tempdir().unwrap();
    let store = AtomicFileStore::new(dir.path());
    std::fs::create_dir_all(store.scratch_dir()).unwrap();
    let topic = DurableScalar::open(store, TOPIC_FILE, Some("Random chatter")).unwrap();
    let state = AppState::new(
        VolatileLog::new(),
        topic,
        PresenceRegistry::new(UniquenessPolicy::Unique),
        StaticAsset::empty(),
        false,
    );
    (dir, SharedState::new(state, long_poll_timeout))
}

#[tokio::test]
async fn await_next_returns_new_snapshot() {
    let (_dir, state) = shared(None);

    let next = state.await_next(Resource::Log);
    tokio::pin!(next);

    // The first poll registers the waiter; nothing has happened yet
    assert!(timeout(Duration::from_millis(5), &mut next).await.is_err());

    state.post("alice", "hi").unwrap();
    let snapshot = timeout(SHORT, next).await.unwrap();
    assert_eq!(snapshot.as_deref(), Some("alice: hi\n"));
}

#[tokio::test]
async fn every_waiting_reader_sees_the_update() {
    let (_dir, state) = shared(None);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let waiter = state.with(|s| s.watch(Resource::Topic));
            let state = state.clone();
            tokio::spawn(async move {
                waiter.await;
                state.snapshot(Resource::Topic)
            })
        })
        .collect();

    state.set_topic("bob", "deploys").unwrap();
    for reader in readers {
        let topic = timeout(SHORT, reader).await.unwrap().unwrap();
        assert_eq!(topic, "deploys");
    }
}

#[tokio::test]
async fn await_next_times_out() {
    let (_dir, state) = shared(Some(Duration::from_millis(10)));

    assert_eq!(state.await_next(Resource::Presence).await, None);

    // A timed-out reader does not hold up later signals
    state.join("carol", None).unwrap();
    assert_eq!(state.snapshot(Resource::Presence), "carol\n");
}

#[tokio::test]
async fn join_and_leave_through_handle() {
    let (_dir, state) = shared(None);

    let waiter = state.with(|s| s.watch(Resource::Presence));
    let handle = state.join("dave", None).unwrap();
    timeout(SHORT, waiter).await.unwrap();
    assert_eq!(handle, "dave");

    state.leave(&handle).unwrap();
    assert_eq!(state.snapshot(Resource::Presence), "");
}

#[test]
fn clones_share_state() {
    let (_dir, state) = shared(None);
    let other = state.clone();

    state.append("raw line").unwrap();
    assert_eq!(other.snapshot(Resource::Log), "raw line\n");
}
