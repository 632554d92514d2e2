// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relay addressing and state types.

use std::fmt;
use std::str::FromStr;

/// Number of relays exposed by the module.
///
/// The wire contract and all per-relay tables are sized by this constant;
/// supporting a larger board means raising it, not changing semantics.
pub const RELAY_COUNT: u8 = 2;

/// Identifier of a single relay on the module.
///
/// Relays are indexed from 1, matching the server's `relay` field.
///
/// # Examples
///
/// ```
/// use relayctl::types::RelayId;
///
/// let relay = RelayId::new(1).unwrap();
/// assert_eq!(relay.value(), 1);
///
/// // Out-of-range indices are rejected
/// assert!(RelayId::new(0).is_none());
/// assert!(RelayId::new(3).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelayId(u8);

impl RelayId {
    /// Maximum valid relay index.
    pub const MAX: u8 = RELAY_COUNT;

    /// Creates a new relay identifier.
    ///
    /// Returns `None` if `index` is 0 or greater than [`RELAY_COUNT`].
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index == 0 || index > Self::MAX {
            None
        } else {
            Some(Self(index))
        }
    }

    /// The first relay.
    #[must_use]
    pub const fn one() -> Self {
        Self(1)
    }

    /// The second relay.
    #[must_use]
    pub const fn two() -> Self {
        Self(2)
    }

    /// Returns the numeric index (1-based).
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns the zero-based index for table lookups.
    #[must_use]
    pub(crate) const fn slot(&self) -> usize {
        (self.0 - 1) as usize
    }

    /// Iterates over all relay identifiers in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=Self::MAX).map(Self)
    }
}

impl fmt::Display for RelayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// On/off state of a single relay.
///
/// # Examples
///
/// ```
/// use relayctl::types::RelayState;
///
/// assert_eq!(RelayState::On.as_str(), "ON");
/// assert_eq!(RelayState::from(false), RelayState::Off);
/// assert!(RelayState::On.is_on());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelayState {
    /// Relay contact is open.
    #[default]
    Off,
    /// Relay contact is closed.
    On,
}

impl RelayState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Returns `true` if the relay is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<bool> for RelayState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl FromStr for RelayState {
    type Err = InvalidRelayState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OFF" | "0" | "FALSE" => Ok(Self::Off),
            "ON" | "1" | "TRUE" => Ok(Self::On),
            _ => Err(InvalidRelayState(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid relay state string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid relay state: {0}")]
pub struct InvalidRelayState(String);
