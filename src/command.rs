// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Toggle command payloads.

use serde::Serialize;

use crate::auth::Credential;
use crate::types::RelayId;

/// Payload of `POST /api/toggle`.
///
/// The `pin` field is present only when the authentication gate fell back
/// to the secondary factor; a strong-factor success sends the bare relay
/// index.
///
/// # Examples
///
/// ```
/// use relayctl::auth::Credential;
/// use relayctl::command::ToggleCommand;
/// use relayctl::types::RelayId;
///
/// let cmd = ToggleCommand::new(RelayId::one(), &Credential::Verified);
/// assert_eq!(serde_json::to_string(&cmd).unwrap(), r#"{"relay":1}"#);
///
/// let cmd = ToggleCommand::new(RelayId::two(), &Credential::Pin("1234".into()));
/// assert_eq!(
///     serde_json::to_string(&cmd).unwrap(),
///     r#"{"relay":2,"pin":"1234"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleCommand {
    relay: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pin: Option<String>,
}

impl ToggleCommand {
    /// Builds the payload for a toggle of `relay` authorized by
    /// `credential`.
    #[must_use]
    pub fn new(relay: RelayId, credential: &Credential) -> Self {
        Self {
            relay: relay.value(),
            pin: credential.pin().map(str::to_string),
        }
    }

    /// Returns the targeted relay index.
    #[must_use]
    pub fn relay(&self) -> u8 {
        self.relay
    }

    /// Returns `true` if the payload carries a PIN.
    #[must_use]
    pub fn has_pin(&self) -> bool {
        self.pin.is_some()
    }
}
