// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport layer for communicating with the relay module.
//!
//! The sync core consumes transport as a capability: anything that can
//! fetch the status document and post a toggle command. The production
//! implementation is [`HttpTransport`]; tests substitute their own.

mod http;

pub use http::{HttpConfig, HttpTransport};

use std::future::Future;

use crate::command::ToggleCommand;
use crate::error::TransportError;

/// Capability trait for reaching the relay module.
///
/// Returned futures carry an explicit `Send` bound because the status
/// poller drives `fetch_status` from a spawned background task.
pub trait Transport: Send + Sync {
    /// Fetches the raw status document (`GET /api/status`).
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] on network-layer failure and
    /// [`TransportError::Status`] when the server answers non-2xx.
    fn fetch_status(&self) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Sends a toggle command (`POST /api/toggle`).
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] on network-layer failure and
    /// [`TransportError::Status`] when the server refuses the command.
    fn send_toggle(
        &self,
        command: &ToggleCommand,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn fetch_status(&self) -> impl Future<Output = Result<String, TransportError>> + Send {
        (**self).fetch_status()
    }

    fn send_toggle(
        &self,
        command: &ToggleCommand,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        (**self).send_toggle(command)
    }
}
