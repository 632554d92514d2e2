// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authentication gate for toggle commands.
//!
//! Every mutating command passes through an [`AuthGate`] before dispatch.
//! The gate composes two platform capabilities, both modeled as traits so
//! the core never depends on a concrete prompt implementation:
//!
//! - [`Authenticator`]: the strong factor (typically a platform
//!   biometric prompt), yielding a three-way [`AuthOutcome`].
//! - [`PinPrompt`]: the secondary factor, an interactive PIN entry
//!   yielding a three-way [`PinEntry`].
//!
//! The gate tries the strong factor first. If the capability reports it
//! is not usable (`Unavailable`), the gate falls back to the PIN prompt.
//! A submitted PIN is granted without local validation; the server is the
//! authority on whether the PIN is correct. Nothing is retried here: one
//! denial or cancellation ends the request's authentication attempt.

use std::future::Future;

use crate::types::RelayId;

/// Credential obtained by the authentication gate.
///
/// `Verified` means the strong factor succeeded; nothing rides in the
/// toggle payload. `Pin` carries the secondary-factor value, which is
/// attached to the payload for the server to validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// The strong factor succeeded.
    Verified,
    /// A PIN was supplied via the fallback prompt.
    Pin(String),
}

impl Credential {
    /// Returns the PIN value, if this credential carries one.
    #[must_use]
    pub fn pin(&self) -> Option<&str> {
        match self {
            Self::Verified => None,
            Self::Pin(pin) => Some(pin),
        }
    }
}

/// Result of an authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Authentication succeeded; the credential travels with the command.
    Granted(Credential),
    /// The user failed or cancelled authentication.
    Denied,
    /// The factor is not usable on this platform (not enrolled, no
    /// hardware). Signals the caller to fall back, not an end-user error.
    Unavailable,
}

/// Result of a secondary-factor PIN prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinEntry {
    /// The user entered a PIN.
    Submitted(String),
    /// The user dismissed the prompt.
    Cancelled,
    /// No PIN prompt can be presented.
    Unavailable,
}

/// Strong-factor authentication capability.
///
/// Implementations may present a blocking interactive prompt; the future
/// is the suspension point. The returned future must be `Send` because
/// toggle requests are routinely driven from spawned tasks.
pub trait Authenticator: Send + Sync {
    /// Prompts the user to authenticate a command for `relay`.
    fn authenticate(&self, relay: RelayId) -> impl Future<Output = AuthOutcome> + Send;
}

/// Secondary-factor PIN entry capability.
pub trait PinPrompt: Send + Sync {
    /// Prompts the user for a PIN to authorize a command for `relay`.
    fn request_pin(&self, relay: RelayId) -> impl Future<Output = PinEntry> + Send;
}

impl<A: Authenticator> Authenticator for std::sync::Arc<A> {
    fn authenticate(&self, relay: RelayId) -> impl Future<Output = AuthOutcome> + Send {
        (**self).authenticate(relay)
    }
}

impl<P: PinPrompt> PinPrompt for std::sync::Arc<P> {
    fn request_pin(&self, relay: RelayId) -> impl Future<Output = PinEntry> + Send {
        (**self).request_pin(relay)
    }
}

/// A [`PinPrompt`] for deployments without a secondary factor.
///
/// Always reports [`PinEntry::Unavailable`], so a strong-factor
/// `Unavailable` surfaces to the caller instead of falling back.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPinFallback;

impl PinPrompt for NoPinFallback {
    async fn request_pin(&self, _relay: RelayId) -> PinEntry {
        PinEntry::Unavailable
    }
}

/// The authentication gate in front of the command dispatcher.
///
/// # Examples
///
/// ```no_run
/// use relayctl::auth::{AuthGate, AuthOutcome, Authenticator, NoPinFallback};
/// use relayctl::types::RelayId;
///
/// struct AlwaysGranted;
///
/// impl Authenticator for AlwaysGranted {
///     async fn authenticate(&self, _relay: RelayId) -> AuthOutcome {
///         AuthOutcome::Granted(relayctl::auth::Credential::Verified)
///     }
/// }
///
/// # async fn example() {
/// let gate = AuthGate::new(AlwaysGranted, NoPinFallback);
/// let outcome = gate.authenticate(RelayId::one()).await;
/// assert!(matches!(outcome, AuthOutcome::Granted(_)));
/// # }
/// ```
#[derive(Debug)]
pub struct AuthGate<A, P> {
    primary: A,
    fallback: P,
}

impl<A, P> AuthGate<A, P>
where
    A: Authenticator,
    P: PinPrompt,
{
    /// Creates a gate from a strong factor and a PIN fallback.
    pub fn new(primary: A, fallback: P) -> Self {
        Self { primary, fallback }
    }

    /// Runs the gate for one toggle request.
    ///
    /// Strong factor first; on `Unavailable`, the PIN prompt. A cancelled
    /// PIN prompt is `Denied` (the pending command is discarded by the
    /// caller and nothing is sent). `Unavailable` is only returned when
    /// neither factor can be presented.
    pub async fn authenticate(&self, relay: RelayId) -> AuthOutcome {
        match self.primary.authenticate(relay).await {
            AuthOutcome::Granted(credential) => AuthOutcome::Granted(credential),
            AuthOutcome::Denied => {
                tracing::debug!(%relay, "strong factor denied");
                AuthOutcome::Denied
            }
            AuthOutcome::Unavailable => {
                tracing::debug!(%relay, "strong factor unavailable, falling back to PIN");
                match self.fallback.request_pin(relay).await {
                    PinEntry::Submitted(pin) => AuthOutcome::Granted(Credential::Pin(pin)),
                    PinEntry::Cancelled => AuthOutcome::Denied,
                    PinEntry::Unavailable => AuthOutcome::Unavailable,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedAuthenticator(AuthOutcome);

    impl Authenticator for FixedAuthenticator {
        async fn authenticate(&self, _relay: RelayId) -> AuthOutcome {
            self.0.clone()
        }
    }

    struct FixedPinPrompt(PinEntry);

    impl PinPrompt for FixedPinPrompt {
        async fn request_pin(&self, _relay: RelayId) -> PinEntry {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn granted_strong_factor_skips_fallback() {
        let gate = AuthGate::new(
            FixedAuthenticator(AuthOutcome::Granted(Credential::Verified)),
            FixedPinPrompt(PinEntry::Submitted("should not be used".to_string())),
        );

        let outcome = gate.authenticate(RelayId::one()).await;
        assert_eq!(outcome, AuthOutcome::Granted(Credential::Verified));
    }

    #[tokio::test]
    async fn denied_strong_factor_does_not_fall_back() {
        let gate = AuthGate::new(
            FixedAuthenticator(AuthOutcome::Denied),
            FixedPinPrompt(PinEntry::Submitted("1234".to_string())),
        );

        let outcome = gate.authenticate(RelayId::one()).await;
        assert_eq!(outcome, AuthOutcome::Denied);
    }

    #[tokio::test]
    async fn unavailable_falls_back_to_pin() {
        let gate = AuthGate::new(
            FixedAuthenticator(AuthOutcome::Unavailable),
            FixedPinPrompt(PinEntry::Submitted("1234".to_string())),
        );

        let outcome = gate.authenticate(RelayId::one()).await;
        assert_eq!(
            outcome,
            AuthOutcome::Granted(Credential::Pin("1234".to_string()))
        );
    }

    #[tokio::test]
    async fn cancelled_pin_is_denied() {
        let gate = AuthGate::new(
            FixedAuthenticator(AuthOutcome::Unavailable),
            FixedPinPrompt(PinEntry::Cancelled),
        );

        let outcome = gate.authenticate(RelayId::one()).await;
        assert_eq!(outcome, AuthOutcome::Denied);
    }

    #[tokio::test]
    async fn no_usable_factor_is_unavailable() {
        let gate = AuthGate::new(FixedAuthenticator(AuthOutcome::Unavailable), NoPinFallback);

        let outcome = gate.authenticate(RelayId::one()).await;
        assert_eq!(outcome, AuthOutcome::Unavailable);
    }

    #[test]
    fn credential_pin_accessor() {
        assert_eq!(Credential::Verified.pin(), None);
        assert_eq!(Credential::Pin("9876".to_string()).pin(), Some("9876"));
    }
}
