// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport implementation.

use std::time::Duration;

use reqwest::Client;

use crate::command::ToggleCommand;
use crate::error::TransportError;
use crate::transport::Transport;

/// Path of the status document.
const STATUS_PATH: &str = "/api/status";
/// Path of the toggle endpoint.
const TOGGLE_PATH: &str = "/api/toggle";

/// Configuration for reaching a relay module over HTTP.
///
/// HTTP is stateless here: each fetch and each command is an independent
/// request. The module's base address, port, and request timeout are the
/// only knobs; the endpoint paths are fixed by the wire contract.
///
/// # Examples
///
/// ```
/// use relayctl::transport::HttpConfig;
/// use std::time::Duration;
///
/// // Typical access-point deployment
/// let config = HttpConfig::new("192.168.4.1");
///
/// // With all options
/// let config = HttpConfig::new("relay.local")
///     .with_port(8080)
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: u16,
    timeout: Duration,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new configuration for the specified host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.port == Self::DEFAULT_PORT {
            format!("http://{}", self.host)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    /// Creates an [`HttpTransport`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_transport(self) -> Result<HttpTransport, TransportError> {
        let base_url = self.base_url();

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(TransportError::Http)?;

        Ok(HttpTransport { base_url, client })
    }
}

/// HTTP transport for a relay module.
///
/// # Examples
///
/// ```no_run
/// use relayctl::transport::{HttpTransport, Transport};
///
/// # async fn example() -> Result<(), relayctl::error::TransportError> {
/// let transport = HttpTransport::new("192.168.4.1")?;
/// let body = transport.fetch_status().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    /// Creates a transport for the specified host with default settings.
    ///
    /// A bare host gets an `http://` scheme prefixed; a full URL is used
    /// as-is.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, TransportError> {
        let host = host.into();
        if host.is_empty() {
            return Err(TransportError::InvalidAddress(
                "host must not be empty".to_string(),
            ));
        }

        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host
        } else {
            format!("http://{host}")
        };

        let client = Client::builder()
            .timeout(HttpConfig::DEFAULT_TIMEOUT)
            .build()
            .map_err(TransportError::Http)?;

        Ok(Self { base_url, client })
    }

    /// Returns the base URL of the module.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn check_status(response: &reqwest::Response) -> Result<(), TransportError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
            })
        }
    }
}

impl Transport for HttpTransport {
    async fn fetch_status(&self) -> Result<String, TransportError> {
        let url = format!("{}{STATUS_PATH}", self.base_url);

        tracing::debug!(url = %url, "Fetching status");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(TransportError::Http)?;

        Self::check_status(&response)?;

        let body = response.text().await.map_err(TransportError::Http)?;

        tracing::debug!(body = %body, "Received status");

        Ok(body)
    }

    async fn send_toggle(&self, command: &ToggleCommand) -> Result<(), TransportError> {
        let url = format!("{}{TOGGLE_PATH}", self.base_url);

        tracing::debug!(url = %url, relay = %command.relay(), "Sending toggle");

        let response = self
            .client
            .post(&url)
            .json(command)
            .send()
            .await
            .map_err(TransportError::Http)?;

        Self::check_status(&response)?;

        Ok(())
    }
}
