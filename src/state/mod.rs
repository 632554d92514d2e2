// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared state owned by the sync core.
//!
//! This module provides the two pieces of shared mutable state in the
//! library: the published [`DeviceStatus`] snapshot and the per-relay
//! [`RelayPhase`] pending-command table. Both are only ever touched
//! through the core's handles.

mod device_status;
mod phase;
mod store;

pub use device_status::DeviceStatus;
pub use phase::RelayPhase;

pub(crate) use phase::PendingTable;
pub(crate) use store::StatusStore;
