// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP device builder.

use std::time::Duration;

use crate::device::Device;
use crate::error::Error;
use crate::protocol::{HttpClient, HttpConfig};
use crate::state::DeviceSnapshot;

/// Builder for creating HTTP-based devices.
///
/// This builder can be created in two ways:
/// - `Device::http("host")` - Simple host string
/// - `Device::http_config(HttpConfig::new("host").with_port(8888))` - Prepared configuration
///
/// # Examples
///
/// ```no_run
/// use sonoff_diy::Device;
/// use std::time::Duration;
///
/// # async fn example() -> sonoff_diy::Result<()> {
/// // Fetch the initial state while building
/// let (device, snapshot) = Device::http("192.168.1.100")
///     .with_device_id("100090ab1a")
///     .build()
///     .await?;
///
/// // No network access until the first command
/// let device = Device::http("192.168.1.100")
///     .with_device_id("100090ab1a")
///     .with_timeout(Duration::from_secs(5))
///     .build_without_probe()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpDeviceBuilder {
    config: HttpConfig,
}

impl HttpDeviceBuilder {
    /// Creates a new builder with the specified HTTP configuration.
    pub(crate) fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Sets the device ID.
    #[must_use]
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.config = self.config.with_device_id(device_id);
        self
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config = self.config.with_user_agent(user_agent);
        self
    }

    /// Reuses an existing HTTP session.
    #[must_use]
    pub fn with_session(mut self, session: reqwest::Client) -> Self {
        self.config = self.config.with_session(session);
        self
    }

    /// Returns the configuration built so far.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Builds the device and fetches its initial snapshot.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the initial fetch
    /// fails.
    pub async fn build(self) -> Result<(Device<HttpClient>, DeviceSnapshot), Error> {
        let device = self.build_without_probe()?;
        match device.fetch_snapshot().await {
            Ok(snapshot) => Ok((device, snapshot)),
            Err(e) => {
                device.close();
                Err(e)
            }
        }
    }

    /// Builds the device without contacting it.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub fn build_without_probe(self) -> Result<Device<HttpClient>, Error> {
        let client = self.config.into_client()?;
        Ok(Device::new(client))
    }
}
