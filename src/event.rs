// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core events and the broadcast bus carrying them.

use tokio::sync::broadcast;

use crate::dispatch::DispatchResult;
use crate::state::{DeviceStatus, RelayPhase};
use crate::types::RelayId;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Events emitted by the sync core.
///
/// These notify subscribers (typically a presentation layer) about status
/// publishes, fetch failures, relay state-machine transitions, and
/// dispatch outcomes. Every error carried here is a human-readable status
/// signal, never fatal.
#[derive(Debug, Clone)]
pub enum CoreEvent {
    /// A fetch succeeded and the published status was replaced.
    StatusUpdated {
        /// The new status snapshot.
        status: DeviceStatus,
    },

    /// A fetch failed; the previously published status is kept.
    FetchFailed {
        /// Human-readable failure description.
        reason: String,
    },

    /// A relay's command state machine changed phase.
    PhaseChanged {
        /// The relay whose phase changed.
        relay: RelayId,
        /// The new phase.
        phase: RelayPhase,
    },

    /// A toggle dispatch completed with the given result.
    DispatchCompleted {
        /// The relay the command targeted.
        relay: RelayId,
        /// How the dispatch ended.
        result: DispatchResult,
    },
}

impl CoreEvent {
    /// Creates a status updated event.
    #[must_use]
    pub fn status_updated(status: DeviceStatus) -> Self {
        Self::StatusUpdated { status }
    }

    /// Creates a fetch failed event.
    #[must_use]
    pub fn fetch_failed(reason: impl Into<String>) -> Self {
        Self::FetchFailed {
            reason: reason.into(),
        }
    }

    /// Creates a phase changed event.
    #[must_use]
    pub fn phase_changed(relay: RelayId, phase: RelayPhase) -> Self {
        Self::PhaseChanged { relay, phase }
    }

    /// Creates a dispatch completed event.
    #[must_use]
    pub fn dispatch_completed(relay: RelayId, result: DispatchResult) -> Self {
        Self::DispatchCompleted { relay, result }
    }

    /// Returns `true` if this event reports a fetch outcome.
    #[must_use]
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::StatusUpdated { .. } | Self::FetchFailed { .. })
    }
}

/// Broadcast bus for [`CoreEvent`]s.
///
/// Uses tokio's broadcast channel so multiple subscribers each receive
/// every event. The bus has a fixed capacity; a slow subscriber that
/// falls behind receives a `RecvError::Lagged` and loses its oldest
/// events, without affecting other subscribers.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to core events.
    ///
    /// The receiver sees all events published after the subscription is
    /// created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// If there are no subscribers, the event is silently discarded.
    pub fn publish(&self, event: CoreEvent) {
        // Ignore errors (no subscribers)
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
