// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests for the sync core against a wiremock server.

use std::time::Duration;

use relayctl::auth::{AuthGate, AuthOutcome, Authenticator, Credential, NoPinFallback, PinEntry, PinPrompt};
use relayctl::sync::{SyncConfig, SyncCore};
use relayctl::transport::HttpTransport;
use relayctl::types::RelayId;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

/// Strong factor that always succeeds.
struct AlwaysGranted;

impl Authenticator for AlwaysGranted {
    async fn authenticate(&self, _relay: RelayId) -> AuthOutcome {
        AuthOutcome::Granted(Credential::Verified)
    }
}

/// Strong factor that is not enrolled.
struct NotEnrolled;

impl Authenticator for NotEnrolled {
    async fn authenticate(&self, _relay: RelayId) -> AuthOutcome {
        AuthOutcome::Unavailable
    }
}

/// PIN prompt the user always answers.
struct EntersPin(&'static str);

impl PinPrompt for EntersPin {
    async fn request_pin(&self, _relay: RelayId) -> PinEntry {
        PinEntry::Submitted(self.0.to_string())
    }
}

async fn mount_status(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Long poll interval: only the startup fetch and explicit refreshes run
/// within the test window.
fn quiet_config() -> SyncConfig {
    SyncConfig::new().with_poll_interval(Duration::from_secs(60))
}

#[tokio::test]
async fn sparse_status_body_defaults_missing_relays_to_off() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, serde_json::json!({ "relay1": true })).await;

    let transport = HttpTransport::new(mock_server.uri()).unwrap();
    let core = SyncCore::new(
        transport,
        AuthGate::new(AlwaysGranted, NoPinFallback),
        quiet_config(),
    );

    let mut status = core.watch_status();
    let snapshot = tokio::time::timeout(WAIT, status.wait_for(|s| s.seq() >= 1))
        .await
        .expect("startup fetch should land")
        .unwrap()
        .clone();

    assert!(snapshot.is_on(RelayId::one()));
    assert!(!snapshot.is_on(RelayId::two()));
    core.close();
}

#[tokio::test]
async fn accepted_toggle_triggers_immediate_refresh() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, serde_json::json!({ "relay1": true })).await;

    Mock::given(method("POST"))
        .and(path("/api/toggle"))
        .and(body_json(serde_json::json!({ "relay": 1 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(mock_server.uri()).unwrap();
    let core = SyncCore::new(
        transport,
        AuthGate::new(AlwaysGranted, NoPinFallback),
        quiet_config(),
    );

    let mut status = core.watch_status();
    tokio::time::timeout(WAIT, status.wait_for(|s| s.seq() >= 1))
        .await
        .unwrap()
        .unwrap();

    let result = core.request_toggle(RelayId::one()).await.unwrap();
    assert!(result.is_accepted());

    // The refresh is out-of-cycle: the 60 s tick is nowhere near
    let snapshot = tokio::time::timeout(WAIT, status.wait_for(|s| s.seq() >= 2))
        .await
        .expect("accepted toggle should refresh status")
        .unwrap()
        .clone();
    assert!(snapshot.is_on(RelayId::one()));
    core.close();
}

#[tokio::test]
async fn pin_fallback_credential_rides_in_the_payload() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, serde_json::json!({})).await;

    Mock::given(method("POST"))
        .and(path("/api/toggle"))
        .and(body_json(serde_json::json!({ "relay": 2, "pin": "4321" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(mock_server.uri()).unwrap();
    let core = SyncCore::new(
        transport,
        AuthGate::new(NotEnrolled, EntersPin("4321")),
        quiet_config(),
    );

    let result = core.request_toggle(RelayId::two()).await.unwrap();
    assert!(result.is_accepted());
    core.close();
}

#[tokio::test]
async fn rejected_toggle_leaves_status_untouched() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, serde_json::json!({ "relay1": true })).await;

    Mock::given(method("POST"))
        .and(path("/api/toggle"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(mock_server.uri()).unwrap();
    let core = SyncCore::new(
        transport,
        AuthGate::new(AlwaysGranted, NoPinFallback),
        quiet_config(),
    );

    let mut status = core.watch_status();
    let before = tokio::time::timeout(WAIT, status.wait_for(|s| s.seq() >= 1))
        .await
        .unwrap()
        .unwrap()
        .clone();

    let result = core.request_toggle(RelayId::one()).await.unwrap();
    assert!(!result.is_accepted());
    assert!(core.relay_phase(RelayId::one()).is_idle());

    // No refresh follows a rejected dispatch
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(core.status(), before);
    core.close();
}

#[tokio::test]
async fn poller_self_heals_after_server_error() {
    let mock_server = MockServer::start().await;

    // First fetch fails, subsequent fetches succeed
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_status(&mock_server, serde_json::json!({ "relay2": true })).await;

    let transport = HttpTransport::new(mock_server.uri()).unwrap();
    let core = SyncCore::new(
        transport,
        AuthGate::new(AlwaysGranted, NoPinFallback),
        SyncConfig::new().with_poll_interval(Duration::from_millis(50)),
    );

    let mut status = core.watch_status();
    let snapshot = tokio::time::timeout(WAIT, status.wait_for(|s| s.seq() >= 1))
        .await
        .expect("poller should recover on a later tick")
        .unwrap()
        .clone();
    assert!(snapshot.is_on(RelayId::two()));
    core.close();
}
