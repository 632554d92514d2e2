// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Published device status snapshots.

use chrono::{DateTime, Utc};

use crate::types::{RELAY_COUNT, RelayId, RelayState};

/// A consistent snapshot of every relay's last known state.
///
/// The status always reflects one successfully parsed server response in
/// its entirety. It is replaced wholesale by the poller and never merged
/// field-by-field, so a reader can never observe a mix of two responses.
/// It is also never mutated optimistically: a dispatched toggle does not
/// touch it, only the follow-up fetch does.
///
/// A fresh status has `seq() == 0` and `fetched_at() == None`, meaning no
/// fetch has succeeded yet; all relays read as off.
///
/// # Examples
///
/// ```
/// use relayctl::state::DeviceStatus;
/// use relayctl::types::RelayId;
///
/// let status = DeviceStatus::default();
/// assert!(!status.is_on(RelayId::one()));
/// assert_eq!(status.seq(), 0);
/// assert!(status.fetched_at().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceStatus {
    relays: [RelayState; RELAY_COUNT as usize],
    seq: u64,
    fetched_at: Option<DateTime<Utc>>,
}

impl DeviceStatus {
    /// Creates a snapshot from relay states and a sequence number,
    /// stamped with the current time.
    pub(crate) fn from_fetch(relays: [RelayState; RELAY_COUNT as usize], seq: u64) -> Self {
        Self {
            relays,
            seq,
            fetched_at: Some(Utc::now()),
        }
    }

    /// Returns the state of a single relay.
    #[must_use]
    pub fn relay(&self, relay: RelayId) -> RelayState {
        self.relays[relay.slot()]
    }

    /// Returns `true` if the given relay is on.
    #[must_use]
    pub fn is_on(&self, relay: RelayId) -> bool {
        self.relay(relay).is_on()
    }

    /// Returns all relay states as `(id, state)` pairs in relay order.
    #[must_use]
    pub fn all(&self) -> Vec<(RelayId, RelayState)> {
        RelayId::all().map(|r| (r, self.relay(r))).collect()
    }

    /// Monotonic sequence number of the fetch that produced this
    /// snapshot. Zero means no fetch has succeeded yet.
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Wall-clock time of the fetch that produced this snapshot, if any.
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}
