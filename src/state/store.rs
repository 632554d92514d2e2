// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-writer store for the published device status.

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::types::{RELAY_COUNT, RelayState};

use super::DeviceStatus;

/// Owner of the published [`DeviceStatus`].
///
/// `publish` is the parse-and-publish critical section from the
/// concurrency design: the lock covers sequencing, wholesale replacement,
/// and the watch notification, so two completing fetches can never
/// interleave a partial write. Last writer wins by completion order.
#[derive(Debug)]
pub(crate) struct StatusStore {
    current: Mutex<DeviceStatus>,
    tx: watch::Sender<DeviceStatus>,
}

impl StatusStore {
    pub(crate) fn new() -> Self {
        let initial = DeviceStatus::default();
        let (tx, _) = watch::channel(initial.clone());
        Self {
            current: Mutex::new(initial),
            tx,
        }
    }

    /// Returns a clone of the current status.
    pub(crate) fn snapshot(&self) -> DeviceStatus {
        self.current.lock().clone()
    }

    /// Creates a watch receiver for status updates.
    pub(crate) fn watch(&self) -> watch::Receiver<DeviceStatus> {
        self.tx.subscribe()
    }

    /// Replaces the published status with a new snapshot built from
    /// `relays`, bumping the sequence number. Returns the new status.
    pub(crate) fn publish(&self, relays: [RelayState; RELAY_COUNT as usize]) -> DeviceStatus {
        let mut current = self.current.lock();
        let next = DeviceStatus::from_fetch(relays, current.seq() + 1);
        *current = next.clone();
        // Ignore send errors (no receivers)
        let _ = self.tx.send(next.clone());
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RelayId;

    #[test]
    fn new_store_is_unfetched() {
        let store = StatusStore::new();
        let status = store.snapshot();
        assert_eq!(status.seq(), 0);
        assert!(status.fetched_at().is_none());
    }

    #[test]
    fn publish_replaces_wholesale_and_bumps_seq() {
        let store = StatusStore::new();

        let first = store.publish([RelayState::On, RelayState::On]);
        assert_eq!(first.seq(), 1);
        assert!(first.is_on(RelayId::one()));
        assert!(first.is_on(RelayId::two()));

        // A later sparse-looking response still replaces everything
        let second = store.publish([RelayState::Off, RelayState::Off]);
        assert_eq!(second.seq(), 2);
        assert!(!second.is_on(RelayId::one()));
        assert!(!second.is_on(RelayId::two()));
        assert_eq!(store.snapshot(), second);
    }

    #[tokio::test]
    async fn watch_receives_published_status() {
        let store = StatusStore::new();
        let mut rx = store.watch();

        store.publish([RelayState::On, RelayState::Off]);

        rx.changed().await.unwrap();
        let status = rx.borrow().clone();
        assert!(status.is_on(RelayId::one()));
        assert_eq!(status.seq(), 1);
    }
}
