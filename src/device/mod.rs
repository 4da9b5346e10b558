// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level device abstraction for Sonoff DIY devices.
//!
//! [`Device`] turns the raw endpoints into named operations and keeps the
//! last snapshot it fetched.
//!
//! ```no_run
//! use sonoff_diy::Device;
//!
//! # async fn example() -> sonoff_diy::Result<()> {
//! let device = Device::http("192.168.1.100")
//!     .with_device_id("100090ab1a")
//!     .build_without_probe()?;
//!
//! let snapshot = device.fetch_snapshot().await?;
//! if snapshot.is_on() {
//!     device.turn_off().await?;
//! }
//!
//! device.close();
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "http")]
mod http_builder;

#[cfg(feature = "http")]
pub use http_builder::HttpDeviceBuilder;

use parking_lot::RwLock;
use serde_json::Value;

use crate::command::{
    OtaCommand, PulseCommand, QueryCommand, StartupCommand, SwitchCommand, WifiCommand,
};
use crate::error::{Error, ProtocolError};
use crate::protocol::Protocol;
use crate::state::DeviceSnapshot;
use crate::types::{PowerOnState, SwitchState};

/// A Sonoff DIY device.
///
/// The type parameter `P` is the transport, [`HttpClient`] for real devices.
///
/// Operations are single requests and are not serialized against each
/// other. Callers that need read-modify-write atomicity, such as
/// [`set_pulse_width`](Self::set_pulse_width), must serialize calls
/// themselves.
///
/// [`HttpClient`]: crate::protocol::HttpClient
#[derive(Debug)]
pub struct Device<P: Protocol> {
    protocol: P,
    snapshot: RwLock<Option<DeviceSnapshot>>,
}

impl<P: Protocol> Device<P> {
    /// Creates a device on top of a transport.
    pub fn new(protocol: P) -> Self {
        Self {
            protocol,
            snapshot: RwLock::new(None),
        }
    }

    /// Returns the device ID.
    #[must_use]
    pub fn device_id(&self) -> &str {
        self.protocol.device_id()
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Returns the snapshot from the last successful fetch.
    ///
    /// Returns `None` before the first fetch and after a failed one.
    #[must_use]
    pub fn snapshot(&self) -> Option<DeviceSnapshot> {
        self.snapshot.read().clone()
    }

    /// Releases the transport's resources.
    ///
    /// With an owned HTTP session the session is dropped; a session supplied
    /// by the caller is left untouched.
    pub fn close(&self) {
        self.protocol.close();
    }

    // ========== State ==========

    /// Fetches device information and signal strength.
    ///
    /// The result replaces the held snapshot. On failure the held snapshot
    /// is cleared before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns error if either request fails, or
    /// [`ProtocolError::NoData`] if the device sent no information.
    pub async fn fetch_snapshot(&self) -> Result<DeviceSnapshot, Error> {
        match self.read_snapshot().await {
            Ok(snapshot) => {
                tracing::debug!(device_id = %self.device_id(), "Refreshed device snapshot");
                *self.snapshot.write() = Some(snapshot.clone());
                Ok(snapshot)
            }
            Err(e) => {
                tracing::debug!(
                    device_id = %self.device_id(),
                    error = %e,
                    "Cleared device snapshot"
                );
                *self.snapshot.write() = None;
                Err(e)
            }
        }
    }

    async fn read_snapshot(&self) -> Result<DeviceSnapshot, Error> {
        let info = self.protocol.send_command(&QueryCommand::Info).await?;
        let signal = self
            .protocol
            .send_command(&QueryCommand::SignalStrength)
            .await?;

        let mut fields = match info {
            Some(Value::Object(fields)) => fields,
            Some(other) => return Err(ProtocolError::UnexpectedData(other).into()),
            None => return Err(ProtocolError::NoData.into()),
        };

        match signal {
            Some(Value::Object(extra)) => fields.extend(extra),
            Some(other) => return Err(ProtocolError::UnexpectedData(other).into()),
            None => {}
        }

        Ok(DeviceSnapshot::from_fields(self.device_id(), &fields))
    }

    // ========== Power Control ==========

    /// Turns the relay on.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn turn_on(&self) -> Result<(), Error> {
        self.set_switch(SwitchState::On).await
    }

    /// Turns the relay off.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn turn_off(&self) -> Result<(), Error> {
        self.set_switch(SwitchState::Off).await
    }

    /// Sets the relay state.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_switch(&self, state: SwitchState) -> Result<(), Error> {
        self.protocol.send_command(&SwitchCommand(state)).await?;
        Ok(())
    }

    /// Sets the relay state applied after a reboot.
    ///
    /// String input goes through [`PowerOnState`]'s `FromStr`, which rejects
    /// anything but `off`, `on` and `restore` before a request is made.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_power_on_state(&self, state: PowerOnState) -> Result<(), Error> {
        self.protocol.send_command(&StartupCommand(state)).await?;
        Ok(())
    }

    // ========== Pulse ==========

    /// Enables pulse (inching) mode, optionally with a new width.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn pulse_on(&self, width_ms: Option<u32>) -> Result<(), Error> {
        self.protocol
            .send_command(&PulseCommand::On { width_ms })
            .await?;
        Ok(())
    }

    /// Disables pulse mode.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn pulse_off(&self) -> Result<(), Error> {
        self.protocol.send_command(&PulseCommand::Off).await?;
        Ok(())
    }

    /// Sets the pulse width, keeping pulse mode as it is.
    ///
    /// The firmware needs the pulse state with every width change, so the
    /// current state is fetched first.
    ///
    /// # Errors
    ///
    /// Returns error if fetching the snapshot or the command fails.
    pub async fn set_pulse_width(&self, width_ms: u32) -> Result<(), Error> {
        let snapshot = self.fetch_snapshot().await?;
        let cmd = PulseCommand::Set {
            state: snapshot.pulse_state(),
            width_ms,
        };
        self.protocol.send_command(&cmd).await?;
        Ok(())
    }

    // ========== Network ==========

    /// Moves the device to another Wi-Fi network.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_wifi(
        &self,
        ssid: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<(), Error> {
        let cmd = WifiCommand::new(ssid, password);
        tracing::debug!(ssid = %cmd.ssid(), "Changing Wi-Fi network");
        self.protocol.send_command(&cmd).await?;
        Ok(())
    }

    // ========== OTA ==========

    /// Unlocks OTA updates through the vendor service.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails, notably code 503 when the device
    /// cannot reach the vendor service.
    pub async fn unlock_ota(&self) -> Result<(), Error> {
        self.protocol.send_command(&OtaCommand::Unlock).await?;
        Ok(())
    }

    /// Starts flashing the firmware image at `url`.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails, notably code 403 while OTA is
    /// still locked.
    pub async fn flash_ota(
        &self,
        url: impl Into<String>,
        sha256: impl Into<String>,
    ) -> Result<(), Error> {
        self.protocol
            .send_command(&OtaCommand::flash(url, sha256))
            .await?;
        Ok(())
    }
}

// ========== HTTP Device Entry Point ==========

#[cfg(feature = "http")]
impl Device<crate::protocol::HttpClient> {
    /// Creates a builder for an HTTP device from a host string.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sonoff_diy::Device;
    ///
    /// # async fn example() -> sonoff_diy::Result<()> {
    /// let (device, snapshot) = Device::http("192.168.1.100")
    ///     .with_device_id("100090ab1a")
    ///     .build()
    ///     .await?;
    /// println!("{} is on: {}", device.device_id(), snapshot.is_on());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn http(host: impl Into<String>) -> HttpDeviceBuilder {
        HttpDeviceBuilder::new(crate::protocol::HttpConfig::new(host))
    }

    /// Creates a builder for an HTTP device from an `HttpConfig`.
    #[must_use]
    pub fn http_config(config: crate::protocol::HttpConfig) -> HttpDeviceBuilder {
        HttpDeviceBuilder::new(config)
    }
}
