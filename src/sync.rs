// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The synchronization core.
//!
//! [`SyncCore`] owns the two shared resources of the system, the
//! published [`DeviceStatus`] and the per-relay pending-command table,
//! and sequences every access to them. The status poller and the command
//! dispatcher only reach them through the core's handles.
//!
//! Per relay, toggles move through `Idle -> AwaitingAuth -> Dispatching
//! -> Idle`. A relay with a command in flight refuses further toggles;
//! different relays proceed independently. The pending entry is cleared
//! on every exit path, including cancellation of the calling future, so
//! a relay can never be left stuck outside idle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{broadcast, watch};

use crate::auth::{AuthGate, AuthOutcome, Authenticator, PinPrompt};
use crate::dispatch::{CommandDispatcher, DispatchResult};
use crate::error::{AuthError, Error, Result};
use crate::event::{CoreEvent, EventBus};
use crate::poller::StatusPoller;
use crate::state::{DeviceStatus, PendingTable, RelayPhase, StatusStore};
use crate::transport::Transport;
use crate::types::RelayId;

/// Configuration for the sync core.
///
/// # Examples
///
/// ```
/// use relayctl::sync::SyncConfig;
/// use std::time::Duration;
///
/// let config = SyncConfig::new().with_poll_interval(Duration::from_secs(5));
/// assert_eq!(config.poll_interval(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct SyncConfig {
    poll_interval: Duration,
}

impl SyncConfig {
    /// Default status poll interval.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets the status poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Returns the status poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Orchestrator for status polling and gated command dispatch.
///
/// # Examples
///
/// ```no_run
/// use relayctl::auth::{AuthGate, AuthOutcome, Authenticator, Credential, NoPinFallback};
/// use relayctl::sync::{SyncConfig, SyncCore};
/// use relayctl::transport::HttpTransport;
/// use relayctl::types::RelayId;
///
/// struct AlwaysGranted;
///
/// impl Authenticator for AlwaysGranted {
///     async fn authenticate(&self, _relay: RelayId) -> AuthOutcome {
///         AuthOutcome::Granted(Credential::Verified)
///     }
/// }
///
/// # async fn example() -> relayctl::error::Result<()> {
/// let transport = HttpTransport::new("192.168.4.1")?;
/// let gate = AuthGate::new(AlwaysGranted, NoPinFallback);
/// let core = SyncCore::new(transport, gate, SyncConfig::new());
///
/// // Read the latest snapshot
/// let status = core.status();
///
/// // Toggle relay 1 (authenticated, then dispatched)
/// let result = core.request_toggle(RelayId::one()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SyncCore<T, A, P> {
    gate: AuthGate<A, P>,
    dispatcher: CommandDispatcher<T>,
    poller: StatusPoller,
    store: Arc<StatusStore>,
    pending: PendingTable,
    events: EventBus,
    closed: AtomicBool,
}

impl<T, A, P> SyncCore<T, A, P>
where
    T: Transport + 'static,
    A: Authenticator,
    P: PinPrompt,
{
    /// Creates the core and activates the status poller.
    ///
    /// The first status fetch fires immediately; subsequent fetches run
    /// every [`SyncConfig::poll_interval`]. Must be called from within a
    /// tokio runtime.
    #[must_use]
    pub fn new(transport: T, gate: AuthGate<A, P>, config: SyncConfig) -> Self {
        let transport = Arc::new(transport);
        let store = Arc::new(StatusStore::new());
        let events = EventBus::new();

        let poller = StatusPoller::spawn(
            Arc::clone(&transport),
            Arc::clone(&store),
            events.clone(),
            config.poll_interval(),
        );

        Self {
            gate,
            dispatcher: CommandDispatcher::new(transport),
            poller,
            store,
            pending: PendingTable::new(),
            events,
            closed: AtomicBool::new(false),
        }
    }

    // =========================================================================
    // Reads & subscriptions
    // =========================================================================

    /// Returns the latest published status snapshot.
    #[must_use]
    pub fn status(&self) -> DeviceStatus {
        self.store.snapshot()
    }

    /// Creates a watch receiver that always holds the latest status.
    #[must_use]
    pub fn watch_status(&self) -> watch::Receiver<DeviceStatus> {
        self.store.watch()
    }

    /// Subscribes to core events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.events.subscribe()
    }

    /// Returns the current phase of a relay's command state machine.
    #[must_use]
    pub fn relay_phase(&self, relay: RelayId) -> RelayPhase {
        self.pending.phase(relay)
    }

    /// Returns `true` once the core has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Requests one authenticated toggle of `relay`.
    ///
    /// Runs the authentication gate, dispatches on success, and triggers
    /// an immediate out-of-cycle status fetch when the server accepts.
    /// The returned [`DispatchResult`] reports how the dispatch ended;
    /// the published status is never mutated here.
    ///
    /// # Errors
    ///
    /// - [`Error::RelayBusy`] if `relay` already has a command pending.
    /// - [`Error::Auth`] if the gate denies or no factor is usable; the
    ///   pending command is discarded and nothing is sent.
    /// - [`Error::Closed`] if the core was closed; an authentication
    ///   result arriving after close is discarded.
    pub async fn request_toggle(&self, relay: RelayId) -> Result<DispatchResult> {
        if self.is_closed() {
            return Err(Error::Closed);
        }

        if !self.pending.begin(relay) {
            tracing::debug!(%relay, "toggle refused, command already pending");
            return Err(Error::RelayBusy { relay });
        }
        let guard = PhaseGuard {
            pending: &self.pending,
            events: &self.events,
            relay,
        };
        self.events
            .publish(CoreEvent::phase_changed(relay, RelayPhase::AwaitingAuth));
        tracing::debug!(%relay, "toggle requested, awaiting authentication");

        let outcome = self.gate.authenticate(relay).await;

        if self.is_closed() {
            // Core torn down while the prompt was up: discard the result
            return Err(Error::Closed);
        }

        let credential = match outcome {
            AuthOutcome::Granted(credential) => credential,
            AuthOutcome::Denied => return Err(AuthError::Denied.into()),
            AuthOutcome::Unavailable => return Err(AuthError::Unavailable.into()),
        };

        self.pending.advance(relay, RelayPhase::Dispatching);
        self.events
            .publish(CoreEvent::phase_changed(relay, RelayPhase::Dispatching));

        let result = self.dispatcher.send(relay, &credential).await;

        // Relay returns to idle before the follow-up fetch lands
        drop(guard);

        if result.is_accepted() {
            self.poller.fetch_now();
        }
        self.events
            .publish(CoreEvent::dispatch_completed(relay, result.clone()));

        Ok(result)
    }

    /// Requests one out-of-cycle status fetch.
    pub fn fetch_now(&self) {
        self.poller.fetch_now();
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Closes the core.
    ///
    /// The poller stops immediately (no further tick fires), and any
    /// toggle request suspended in its authentication prompt discards the
    /// prompt's result instead of dispatching. Idempotent.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.poller.stop();
            tracing::debug!("sync core closed");
        }
    }
}

/// Clears a relay's pending entry on every exit path.
///
/// Dropping the guard, including when the owning future is cancelled
/// mid-await, returns the relay to `Idle` and announces it.
struct PhaseGuard<'a> {
    pending: &'a PendingTable,
    events: &'a EventBus,
    relay: RelayId,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.pending.clear(self.relay);
        self.events
            .publish(CoreEvent::phase_changed(self.relay, RelayPhase::Idle));
    }
}
