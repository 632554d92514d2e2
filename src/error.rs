// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `relayctl` library.
//!
//! This module provides the error hierarchy for handling failures across
//! the library: transport communication, response parsing, authentication,
//! and orchestration.

use thiserror::Error;

use crate::types::RelayId;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur while
/// synchronizing with or commanding a relay module. None of them is fatal
/// to the running process: the status poller self-heals on its next tick,
/// and a failed toggle leaves the relay's state machine back at idle.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during transport communication.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error occurred while parsing a server response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during the authentication gate.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// A toggle was requested while the relay already has a command in
    /// flight.
    #[error("relay {relay} already has a command in flight")]
    RelayBusy {
        /// The relay that was busy.
        relay: RelayId,
    },

    /// The sync core has been closed.
    #[error("sync core is closed")]
    Closed,
}

/// Errors related to HTTP transport communication.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request failed at the network layer (connection refused,
    /// timeout, DNS failure).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("server returned HTTP {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl TransportError {
    /// Returns `true` if the failure happened at the network layer, as
    /// opposed to the server answering with a failure status.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

/// Errors related to parsing status responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The body parsed but did not have the expected shape.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to the authentication gate.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// The user failed or cancelled authentication.
    #[error("authentication denied")]
    Denied,

    /// No authentication factor is usable on this platform.
    #[error("no authentication method available")]
    Unavailable,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_busy_display() {
        let err = Error::RelayBusy {
            relay: RelayId::one(),
        };
        assert_eq!(err.to_string(), "relay 1 already has a command in flight");
    }

    #[test]
    fn transport_status_display() {
        let err = TransportError::Status { status: 403 };
        assert_eq!(err.to_string(), "server returned HTTP 403");
        assert!(!err.is_unreachable());
    }

    #[test]
    fn error_from_auth_error() {
        let err: Error = AuthError::Denied.into();
        assert!(matches!(err, Error::Auth(AuthError::Denied)));
        assert_eq!(err.to_string(), "auth error: authentication denied");
    }

    #[test]
    fn error_from_parse_error() {
        let parse_err = ParseError::UnexpectedFormat("not an object".to_string());
        let err: Error = parse_err.into();
        assert_eq!(
            err.to_string(),
            "parse error: unexpected response format: not an object"
        );
    }
}
