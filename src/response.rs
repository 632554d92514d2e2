// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status document parsing.

use serde::Deserialize;

use crate::types::{RELAY_COUNT, RelayState};

/// Parsed body of `GET /api/status`.
///
/// The server treats the document as optionally sparse: a relay field it
/// does not mention is off, not an error. A body that is not a JSON
/// object fails deserialization and is reported as malformed by the
/// poller.
///
/// # Examples
///
/// ```
/// use relayctl::response::StatusResponse;
/// use relayctl::types::RelayState;
///
/// let response: StatusResponse = serde_json::from_str(r#"{"relay1":true}"#).unwrap();
/// assert_eq!(
///     response.relay_states(),
///     [RelayState::On, RelayState::Off]
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct StatusResponse {
    /// State of relay 1; absent means off.
    #[serde(rename = "relay1", default)]
    relay1: bool,

    /// State of relay 2; absent means off.
    #[serde(rename = "relay2", default)]
    relay2: bool,
}

impl StatusResponse {
    /// Returns the relay states in relay order.
    #[must_use]
    pub fn relay_states(&self) -> [RelayState; RELAY_COUNT as usize] {
        [self.relay1.into(), self.relay2.into()]
    }
}
