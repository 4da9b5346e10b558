// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP protocol implementation for Sonoff DIY devices.

use std::time::Duration;

use parking_lot::Mutex;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;

use crate::command::Payload;
use crate::error::{ConnectionError, Error, ProtocolError};
use crate::protocol::Protocol;
use crate::protocol::envelope::{RequestEnvelope, ResponseEnvelope};

// ============================================================================
// HttpConfig - Connection parameters
// ============================================================================

/// Configuration for an HTTP connection to a Sonoff DIY device.
///
/// # Examples
///
/// ```
/// use sonoff_diy::protocol::HttpConfig;
/// use std::time::Duration;
///
/// // Simple configuration
/// let config = HttpConfig::new("192.168.1.100");
/// assert_eq!(config.port(), 8081);
///
/// // With all options
/// let config = HttpConfig::new("192.168.1.100")
///     .with_device_id("100090ab1a")
///     .with_port(8888)
///     .with_timeout(Duration::from_secs(5))
///     .with_user_agent("MyHome/1.0");
/// assert_eq!(config.url("info"), "http://192.168.1.100:8888/zeroconf/info");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: u16,
    device_id: String,
    timeout: Duration,
    user_agent: String,
    session: Option<Client>,
}

impl HttpConfig {
    /// Default port of the DIY-mode API.
    pub const DEFAULT_PORT: u16 = 8081;
    /// Default timeout for a whole request.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);
    /// Default `User-Agent` header.
    pub const DEFAULT_USER_AGENT: &'static str =
        concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
    /// Path under which every endpoint lives.
    pub const BASE_PATH: &'static str = "zeroconf";
    /// `Accept` header sent with every request.
    pub const ACCEPT: &'static str = "application/json, */*";

    /// Creates a new HTTP configuration for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the device
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            device_id: String::new(),
            timeout: Self::DEFAULT_TIMEOUT,
            user_agent: Self::DEFAULT_USER_AGENT.to_string(),
            session: None,
        }
    }

    /// Sets the device ID sent in every request.
    ///
    /// Real devices reject requests for another ID; leaving it empty only
    /// works with firmware that does not check it.
    #[must_use]
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
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

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Reuses an existing HTTP session instead of creating one.
    ///
    /// A supplied session is never released by this library.
    #[must_use]
    pub fn with_session(mut self, session: Client) -> Self {
        self.session = Some(session);
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

    /// Returns the device ID.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns `true` if an external session was supplied.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        // IPv6 literals must be bracketed in URLs.
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    /// Builds the URL of an endpoint.
    #[must_use]
    pub fn url(&self, sub_path: &str) -> String {
        endpoint_url(&self.base_url(), sub_path)
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// No network activity happens here; without a supplied session the
    /// client creates its own on the first request.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::InvalidAddress`] if the host is empty.
    pub fn into_client(self) -> Result<HttpClient, ConnectionError> {
        if self.host.trim().is_empty() {
            return Err(ConnectionError::InvalidAddress(
                "host is required".to_string(),
            ));
        }

        let base_url = self.base_url();
        let session = match self.session {
            Some(client) => Session::Shared(client),
            None => Session::Owned(Mutex::new(None)),
        };

        Ok(HttpClient {
            base_url,
            device_id: self.device_id,
            timeout: self.timeout,
            user_agent: self.user_agent,
            session,
        })
    }
}

fn endpoint_url(base_url: &str, sub_path: &str) -> String {
    format!(
        "{base_url}/{}/{}",
        HttpConfig::BASE_PATH,
        sub_path.trim_start_matches('/')
    )
}

// ============================================================================
// HttpClient - Request/response exchange
// ============================================================================

/// HTTP session used by an [`HttpClient`].
#[derive(Debug)]
enum Session {
    /// Supplied by the caller; reused and never released here.
    Shared(Client),
    /// Created on first use and released by [`HttpClient::close`].
    Owned(Mutex<Option<Client>>),
}

/// HTTP client for communicating with a Sonoff DIY device.
///
/// Each call is a single `POST` to `/zeroconf/<endpoint>`. Nothing is
/// retried: transport failures surface as [`ConnectionError`] and the caller
/// decides whether to try again.
///
/// # Examples
///
/// ```no_run
/// use sonoff_diy::protocol::{HttpConfig, Protocol};
/// use sonoff_diy::command::QueryCommand;
///
/// # async fn example() -> sonoff_diy::Result<()> {
/// let client = HttpConfig::new("192.168.1.100")
///     .with_device_id("100090ab1a")
///     .into_client()?;
/// let info = client.send_command(&QueryCommand::Info).await?;
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpClient {
    base_url: String,
    device_id: String,
    timeout: Duration,
    user_agent: String,
    session: Session,
}

impl HttpClient {
    /// Returns the base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `true` if the session is created and released by this client.
    #[must_use]
    pub fn owns_session(&self) -> bool {
        matches!(self.session, Session::Owned(_))
    }

    /// Returns `true` if an owned session is currently open.
    ///
    /// Always `true` for a supplied session.
    #[must_use]
    pub fn has_open_session(&self) -> bool {
        match &self.session {
            Session::Shared(_) => true,
            Session::Owned(slot) => slot.lock().is_some(),
        }
    }

    fn build_url(&self, sub_path: &str) -> String {
        endpoint_url(&self.base_url, sub_path)
    }

    /// Returns the session, creating the owned one if needed.
    fn session(&self) -> Result<Client, ConnectionError> {
        match &self.session {
            Session::Shared(client) => Ok(client.clone()),
            Session::Owned(slot) => {
                let mut slot = slot.lock();
                if let Some(client) = slot.as_ref() {
                    return Ok(client.clone());
                }
                let client = Client::builder().build()?;
                tracing::debug!(base_url = %self.base_url, "Opened HTTP session");
                *slot = Some(client.clone());
                Ok(client)
            }
        }
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    fn transport_error(&self, err: reqwest::Error) -> ConnectionError {
        if err.is_timeout() {
            ConnectionError::Timeout(self.timeout_ms())
        } else {
            ConnectionError::Http(err)
        }
    }

    /// Performs the HTTP exchange and returns the content type and body.
    async fn exchange(
        &self,
        session: &Client,
        url: &str,
        envelope: &RequestEnvelope<'_>,
    ) -> Result<(String, String), ConnectionError> {
        let response = session
            .post(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, HttpConfig::ACCEPT)
            .json(envelope)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectionError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        Ok((content_type, body))
    }
}

impl Protocol for HttpClient {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    async fn send_raw(&self, sub_path: &str, payload: Payload) -> Result<Option<Value>, Error> {
        let url = self.build_url(sub_path);
        let session = self.session()?;
        let envelope = RequestEnvelope::new(&self.device_id, &payload);

        tracing::debug!(url = %url, "Sending HTTP request");

        let (content_type, body) =
            tokio::time::timeout(self.timeout, self.exchange(&session, &url, &envelope))
                .await
                .map_err(|_| ConnectionError::Timeout(self.timeout_ms()))??;

        tracing::debug!(body = %body, "Received HTTP response");

        if !content_type.contains("application/json") {
            return Err(ProtocolError::UnexpectedContentType { content_type, body }.into());
        }

        let envelope: ResponseEnvelope = body.parse()?;
        Ok(envelope.into_data()?)
    }

    fn close(&self) {
        if let Session::Owned(slot) = &self.session
            && slot.lock().take().is_some()
        {
            tracing::debug!(base_url = %self.base_url, "Closed HTTP session");
        }
    }
}
