// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `relayctl` - A Rust library for synchronizing with and commanding
//! networked relay modules.
//!
//! The library maintains a live view of the relays exposed by a small
//! HTTP server and issues authenticated toggle commands against them.
//! Its heart is the [`sync::SyncCore`]: a periodic status poller coupled
//! with a gated dispatch pipeline that never lets a command race ahead of
//! stale status, gates every toggle behind an authentication step, and
//! degrades gracefully when the network drops.
//!
//! # What it gives you
//!
//! - **Status polling**: a fixed-interval fetch of `GET /api/status`
//!   with wholesale snapshot replacement, plus an out-of-cycle refresh
//!   after every accepted command
//! - **Gated toggles**: strong-factor authentication with PIN fallback
//!   in front of `POST /api/toggle`
//! - **Per-relay sequencing**: at most one command in flight per relay,
//!   while different relays dispatch concurrently
//! - **Subscriptions**: a watch channel with the latest snapshot and a
//!   broadcast event stream for presentation layers
//!
//! # Quick Start
//!
//! ```no_run
//! use relayctl::auth::{AuthGate, AuthOutcome, Authenticator, Credential, NoPinFallback};
//! use relayctl::sync::{SyncConfig, SyncCore};
//! use relayctl::transport::HttpTransport;
//! use relayctl::types::RelayId;
//!
//! // The strong factor is a platform capability; any implementation of
//! // `Authenticator` will do. This one waves everybody through.
//! struct AlwaysGranted;
//!
//! impl Authenticator for AlwaysGranted {
//!     async fn authenticate(&self, _relay: RelayId) -> AuthOutcome {
//!         AuthOutcome::Granted(Credential::Verified)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> relayctl::error::Result<()> {
//!     let transport = HttpTransport::new("192.168.4.1")?;
//!     let gate = AuthGate::new(AlwaysGranted, NoPinFallback);
//!
//!     // Polling starts immediately
//!     let core = SyncCore::new(transport, gate, SyncConfig::new());
//!
//!     // Watch status updates
//!     let mut status = core.watch_status();
//!     tokio::spawn(async move {
//!         while status.changed().await.is_ok() {
//!             let snapshot = status.borrow().clone();
//!             println!("relay 1 is {}", snapshot.relay(RelayId::one()));
//!         }
//!     });
//!
//!     // Toggle relay 1 (authenticate, dispatch, refresh)
//!     let result = core.request_toggle(RelayId::one()).await?;
//!     println!("dispatch ended as {result:?}");
//!
//!     core.close();
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod command;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod poller;
pub mod response;
pub mod state;
pub mod sync;
pub mod transport;
pub mod types;

pub use auth::{AuthGate, AuthOutcome, Authenticator, Credential, NoPinFallback, PinEntry, PinPrompt};
pub use command::ToggleCommand;
pub use dispatch::{CommandDispatcher, DispatchResult};
pub use error::{AuthError, Error, ParseError, Result, TransportError};
pub use event::{CoreEvent, EventBus};
pub use poller::{FetchResult, StatusPoller};
pub use response::StatusResponse;
pub use state::{DeviceStatus, RelayPhase};
pub use sync::{SyncConfig, SyncCore};
pub use transport::{HttpConfig, HttpTransport, Transport};
pub use types::{RELAY_COUNT, RelayId, RelayState};
