// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic status polling.
//!
//! One background task owns both the fixed-period tick and the
//! out-of-cycle [`fetch_now`](StatusPoller::fetch_now) trigger. Because
//! every fetch-parse-publish step runs inside that single task, a
//! triggered fetch can never interleave with a scheduled one, and
//! triggering never reschedules the periodic timer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::error::{ParseError, TransportError};
use crate::event::{CoreEvent, EventBus};
use crate::response::StatusResponse;
use crate::state::StatusStore;
use crate::transport::Transport;

/// Outcome of a single status fetch.
///
/// Only `Updated` touches the published status; `Unreachable` and
/// `Malformed` keep the previous snapshot so a dropped packet does not
/// flicker the display to unknown.
#[derive(Debug)]
pub enum FetchResult {
    /// The body parsed; the published status is replaced wholesale.
    Updated(StatusResponse),
    /// The server could not be reached or answered non-2xx.
    Unreachable(TransportError),
    /// The server answered 2xx but the body was not valid status data.
    Malformed(ParseError),
}

/// Handle to the background polling task.
///
/// The poller starts fetching when spawned (the first tick fires
/// immediately) and keeps going until [`stop`](Self::stop) or drop.
#[derive(Debug)]
pub struct StatusPoller {
    trigger: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl StatusPoller {
    /// Spawns the polling task.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn<T>(
        transport: Arc<T>,
        store: Arc<StatusStore>,
        events: EventBus,
        period: Duration,
    ) -> Self
    where
        T: Transport + 'static,
    {
        let trigger = Arc::new(Notify::new());
        let task_trigger = Arc::clone(&trigger);

        let handle = tokio::spawn(async move {
            tracing::debug!(period_ms = period.as_millis(), "status poller started");

            let mut ticker = interval(period);
            // A fetch that outlives the period delays its tick; skip the
            // backlog instead of bursting when it finally returns.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    () = task_trigger.notified() => {}
                }

                let result = fetch_once(transport.as_ref()).await;
                publish(&store, &events, result);
            }
        });

        Self { trigger, handle }
    }

    /// Requests one out-of-cycle fetch.
    ///
    /// The fetch runs on the polling task as soon as it is free; the
    /// scheduled cadence is unaffected. Multiple requests while a fetch
    /// is in flight coalesce into one.
    pub fn fetch_now(&self) {
        self.trigger.notify_one();
    }

    /// Stops the polling task immediately. No further tick fires.
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Returns `true` while the polling task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Performs one fetch-and-parse step without publishing.
pub(crate) async fn fetch_once<T: Transport>(transport: &T) -> FetchResult {
    match transport.fetch_status().await {
        Ok(body) => match serde_json::from_str::<StatusResponse>(&body) {
            Ok(response) => FetchResult::Updated(response),
            Err(err) => FetchResult::Malformed(ParseError::Json(err)),
        },
        Err(err) => FetchResult::Unreachable(err),
    }
}

/// Applies a fetch result to the store. This is the only writer of the
/// published status.
fn publish(store: &StatusStore, events: &EventBus, result: FetchResult) {
    match result {
        FetchResult::Updated(response) => {
            let status = store.publish(response.relay_states());
            tracing::debug!(seq = status.seq(), "status updated");
            events.publish(CoreEvent::status_updated(status));
        }
        FetchResult::Unreachable(err) => {
            tracing::warn!(error = %err, "status fetch failed, keeping last status");
            events.publish(CoreEvent::fetch_failed(err.to_string()));
        }
        FetchResult::Malformed(err) => {
            tracing::warn!(error = %err, "status body malformed, keeping last status");
            events.publish(CoreEvent::fetch_failed(err.to_string()));
        }
    }
}
