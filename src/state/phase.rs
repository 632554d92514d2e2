// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-relay command state machine.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::types::RelayId;

/// Phase of a relay's command state machine.
///
/// Each relay moves `Idle -> AwaitingAuth -> Dispatching -> Idle`.
/// `AwaitingAuth` can fall back to `Idle` directly when authentication is
/// denied or cancelled; `Dispatching` returns to `Idle` on every dispatch
/// outcome. A relay accepts a new toggle request only while `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayPhase {
    /// No command pending; toggle requests are accepted.
    #[default]
    Idle,
    /// The authentication gate is prompting for this relay.
    AwaitingAuth,
    /// A toggle command is in flight for this relay.
    Dispatching,
}

impl RelayPhase {
    /// Returns `true` if the relay accepts a new toggle request.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl std::fmt::Display for RelayPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::AwaitingAuth => "awaiting-auth",
            Self::Dispatching => "dispatching",
        };
        write!(f, "{s}")
    }
}

/// Pending-command table keyed by relay.
///
/// An absent entry means `Idle`. The lock is only ever held for the
/// duration of a lookup or transition, never across an await, so a relay
/// whose command hangs on the network cannot block another relay's
/// transitions.
#[derive(Debug, Default)]
pub(crate) struct PendingTable {
    phases: Mutex<HashMap<RelayId, RelayPhase>>,
}

impl PendingTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the current phase of a relay.
    pub(crate) fn phase(&self, relay: RelayId) -> RelayPhase {
        self.phases
            .lock()
            .get(&relay)
            .copied()
            .unwrap_or(RelayPhase::Idle)
    }

    /// Claims a relay for a new command.
    ///
    /// Returns `false` if the relay already has a pending command, in
    /// which case the table is unchanged.
    pub(crate) fn begin(&self, relay: RelayId) -> bool {
        use std::collections::hash_map::Entry;

        match self.phases.lock().entry(relay) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(RelayPhase::AwaitingAuth);
                true
            }
        }
    }

    /// Advances a claimed relay to a new phase.
    pub(crate) fn advance(&self, relay: RelayId, phase: RelayPhase) {
        self.phases.lock().insert(relay, phase);
    }

    /// Resolves a relay's pending command, returning it to `Idle`.
    pub(crate) fn clear(&self, relay: RelayId) {
        self.phases.lock().remove(&relay);
    }
}
