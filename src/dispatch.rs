// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Toggle command dispatch.

use std::sync::Arc;

use crate::auth::Credential;
use crate::command::ToggleCommand;
use crate::error::TransportError;
use crate::transport::Transport;
use crate::types::RelayId;

/// Outcome of a single dispatch attempt.
///
/// A `Rejected` or `Unreachable` result guarantees this call did not
/// change the server-observable relay state (best effort; the server is
/// authoritative), and the dispatcher never retries on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// The server accepted the command. The caller should trigger an
    /// immediate out-of-cycle status fetch.
    Accepted,
    /// The server refused the command (wrong PIN, server-side policy).
    Rejected {
        /// The HTTP status code the server answered with.
        status: u16,
    },
    /// The command never reached the server (timeout, connection error).
    Unreachable {
        /// Human-readable description of the network failure.
        reason: String,
    },
}

impl DispatchResult {
    /// Returns `true` if the command was accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Sends toggle commands over a transport.
///
/// The dispatcher sends exactly one request per call and interprets the
/// outcome; it holds no state of its own and never touches the published
/// status.
#[derive(Debug)]
pub struct CommandDispatcher<T> {
    transport: Arc<T>,
}

impl<T: Transport> CommandDispatcher<T> {
    /// Creates a dispatcher over the given transport.
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Sends one toggle for `relay`, authorized by `credential`.
    ///
    /// The PIN rides in the payload only when the credential carries one.
    pub async fn send(&self, relay: RelayId, credential: &Credential) -> DispatchResult {
        let command = ToggleCommand::new(relay, credential);

        match self.transport.send_toggle(&command).await {
            Ok(()) => {
                tracing::debug!(%relay, "toggle accepted");
                DispatchResult::Accepted
            }
            Err(TransportError::Status { status }) => {
                tracing::warn!(%relay, status, "toggle rejected by server");
                DispatchResult::Rejected { status }
            }
            Err(err) => {
                tracing::warn!(%relay, error = %err, "toggle unreachable");
                DispatchResult::Unreachable {
                    reason: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Transport stub that records sent commands and answers from a
    /// script.
    struct ScriptedTransport {
        sent: Mutex<Vec<ToggleCommand>>,
        reply: Mutex<Option<TransportError>>,
    }

    impl ScriptedTransport {
        fn accepting() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                reply: Mutex::new(None),
            }
        }

        fn failing(err: TransportError) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                reply: Mutex::new(Some(err)),
            }
        }
    }

    impl Transport for ScriptedTransport {
        async fn fetch_status(&self) -> Result<String, TransportError> {
            Ok("{}".to_string())
        }

        async fn send_toggle(&self, command: &ToggleCommand) -> Result<(), TransportError> {
            self.sent.lock().push(command.clone());
            match self.reply.lock().take() {
                None => Ok(()),
                Some(err) => Err(err),
            }
        }
    }

    #[tokio::test]
    async fn accepted_on_success() {
        let transport = Arc::new(ScriptedTransport::accepting());
        let dispatcher = CommandDispatcher::new(Arc::clone(&transport));

        let result = dispatcher
            .send(RelayId::one(), &Credential::Verified)
            .await;

        assert!(result.is_accepted());
        let sent = transport.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].relay(), 1);
        assert!(!sent[0].has_pin());
    }

    #[tokio::test]
    async fn pin_credential_reaches_the_wire() {
        let transport = Arc::new(ScriptedTransport::accepting());
        let dispatcher = CommandDispatcher::new(Arc::clone(&transport));

        dispatcher
            .send(RelayId::two(), &Credential::Pin("4321".to_string()))
            .await;

        let sent = transport.sent.lock();
        assert!(sent[0].has_pin());
    }

    #[tokio::test]
    async fn non_success_status_is_rejected() {
        let transport = Arc::new(ScriptedTransport::failing(TransportError::Status {
            status: 403,
        }));
        let dispatcher = CommandDispatcher::new(transport);

        let result = dispatcher
            .send(RelayId::one(), &Credential::Verified)
            .await;

        assert_eq!(result, DispatchResult::Rejected { status: 403 });
    }

    #[tokio::test]
    async fn network_failure_is_unreachable() {
        let transport = Arc::new(ScriptedTransport::failing(TransportError::InvalidAddress(
            "down".to_string(),
        )));
        let dispatcher = CommandDispatcher::new(transport);

        let result = dispatcher
            .send(RelayId::one(), &Credential::Verified)
            .await;

        assert!(matches!(result, DispatchResult::Unreachable { .. }));
        assert!(!result.is_accepted());
    }
}
